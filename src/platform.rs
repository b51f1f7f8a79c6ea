//! Host platform detection and well-known tool locations.
use std::fmt;
use std::path::PathBuf;

/// Homebrew's install location on Apple Silicon.
pub const HOMEBREW_ARM64: &str = "/opt/homebrew/bin/brew";

/// Homebrew's install location on Intel Macs.
pub const HOMEBREW_X86_64: &str = "/usr/local/bin/brew";

/// Detected operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// macOS, the only supported target.
    MacOs,
    /// Anything else.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Other => write!(f, "{}", std::env::consts::OS),
        }
    }
}

/// Detected CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// arm64 (Apple Silicon).
    AppleSilicon,
    /// `x86_64` (Intel).
    Intel,
}

/// Platform information for the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        let os = if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            Os::Other
        };
        let arch = if cfg!(target_arch = "aarch64") {
            Arch::AppleSilicon
        } else {
            Arch::Intel
        };
        Self { os, arch }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Whether this is macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// The two places Homebrew installs itself, native architecture first.
    #[must_use]
    pub fn homebrew_candidates(&self) -> [PathBuf; 2] {
        match self.arch {
            Arch::AppleSilicon => [PathBuf::from(HOMEBREW_ARM64), PathBuf::from(HOMEBREW_X86_64)],
            Arch::Intel => [PathBuf::from(HOMEBREW_X86_64), PathBuf::from(HOMEBREW_ARM64)],
        }
    }
}
