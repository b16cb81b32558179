//! Platform-specific helpers.

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the git executable name for the current platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_command_matches_platform() {
        if cfg!(windows) {
            assert_eq!(get_git_command(), "git.exe");
        } else {
            assert_eq!(get_git_command(), "git");
        }
    }
}
