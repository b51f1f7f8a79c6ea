//! macOS workstation provisioning engine.
//!
//! Runs a fixed, ordered pipeline of steps on a fresh Mac: Command Line
//! Tools, Homebrew, the Brewfile bundle, preference imports, one application
//! fetched from a remote archive, static config copies and VS Code
//! extensions. Every step checks whether it is already satisfied, so the
//! whole pipeline is safe to re-run.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate `conf/provision.toml` and the data files it names
//! - **[`resources`]**: idempotent `check + apply` primitives (imports, copies, installs)
//! - **[`tasks`]**: the named, ordered steps wired to resources, and their driver
//! - **[`commands`]**: the `provision` entry point and the pipeline loop
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod resources;
pub mod tasks;
