//! Platform detection
//!
//! Uses the same OS names as `uname`-style tooling:
//! - macOS → `"darwin"`
//! - Linux → `"linux"`
//! - Windows → `"windows"`
//!
//! Used to pick platform-specific generator arguments from the config file.

use std::sync::LazyLock;

/// Current platform information (cached)
///
/// # Example
/// ```
/// use buildwrap_core::platform::CURRENT_PLATFORM;
///
/// let section = format!("generator.{}", CURRENT_PLATFORM.os);
/// assert!(section.starts_with("generator."));
/// ```
pub static CURRENT_PLATFORM: LazyLock<Platform> = LazyLock::new(Platform::detect);

/// Platform information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS: "darwin" (macOS), "linux", "windows", "unknown"
    pub os: &'static str,
}

impl Platform {
    /// Detect the platform the binary was built for
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    const fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "darwin"
        }

        #[cfg(target_os = "linux")]
        {
            "linux"
        }

        #[cfg(target_os = "windows")]
        {
            "windows"
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            "unknown"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_matches_cached() {
        assert_eq!(Platform::detect(), *CURRENT_PLATFORM);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_name() {
        assert_eq!(CURRENT_PLATFORM.os, "linux");
    }
}
