//! Directory resolution abstraction for platform-specific paths.
//!
//! The installer only needs one directory: where the executable goes. The
//! [`BaseDirs`] trait lets tests substitute their own locations.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::{Path, PathBuf};

/// Environment variable overriding the bin directory.
pub const INSTALL_DIR_ENV: &str = "SPEECHLY_INSTALL_DIR";

/// Source of platform base directories.
pub trait BaseDirs {
    /// The directory user executables are installed into.
    fn bin_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn bin_dir(&self) -> Option<PathBuf> {
        let dirs = directories_next::BaseDirs::new()?;
        // `executable_dir` is only defined on Linux; elsewhere use the
        // XDG-style `~/.local/bin`.
        dirs.executable_dir()
            .map(Path::to_path_buf)
            .or_else(|| Some(dirs.home_dir().join(".local").join("bin")))
    }
}

/// Resolve the bin directory for this run.
///
/// Precedence: `explicit` (the `--bin-dir` flag), then
/// [`INSTALL_DIR_ENV`], then [`BaseDirs::bin_dir`].
///
/// # Errors
///
/// Returns [`InstallerError::BinDirUnavailable`] if no source yields a
/// directory, or [`InstallerError::NonUtf8Path`] if the chosen directory is
/// not valid UTF-8.
pub fn resolve_bin_dir(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_owned());
    }
    let candidate = std::env::var_os(INSTALL_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs.bin_dir())
        .ok_or(InstallerError::BinDirUnavailable {
            env_var: INSTALL_DIR_ENV,
        })?;
    Utf8PathBuf::try_from(candidate).map_err(|e| InstallerError::NonUtf8Path {
        path: e.into_path_buf().display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDirs(Option<PathBuf>);

    impl BaseDirs for FixedDirs {
        fn bin_dir(&self) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    #[test]
    fn explicit_directory_wins() {
        temp_env::with_var(INSTALL_DIR_ENV, Some("/from/env"), || {
            let dirs = FixedDirs(Some(PathBuf::from("/from/dirs")));
            let resolved =
                resolve_bin_dir(Some(Utf8Path::new("/from/flag")), &dirs).expect("resolved");
            assert_eq!(resolved, Utf8PathBuf::from("/from/flag"));
        });
    }

    #[test]
    fn environment_beats_platform_default() {
        temp_env::with_var(INSTALL_DIR_ENV, Some("/from/env"), || {
            let dirs = FixedDirs(Some(PathBuf::from("/from/dirs")));
            let resolved = resolve_bin_dir(None, &dirs).expect("resolved");
            assert_eq!(resolved, Utf8PathBuf::from("/from/env"));
        });
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        temp_env::with_var(INSTALL_DIR_ENV, Some(""), || {
            let dirs = FixedDirs(Some(PathBuf::from("/from/dirs")));
            let resolved = resolve_bin_dir(None, &dirs).expect("resolved");
            assert_eq!(resolved, Utf8PathBuf::from("/from/dirs"));
        });
    }

    #[test]
    fn missing_everything_is_an_error() {
        temp_env::with_var_unset(INSTALL_DIR_ENV, || {
            let result = resolve_bin_dir(None, &FixedDirs(None));
            assert!(matches!(
                result,
                Err(InstallerError::BinDirUnavailable { .. })
            ));
        });
    }

    #[test]
    fn system_bin_dir_is_absolute_when_available() {
        // Skip in environments without a home directory (e.g., CI containers).
        let Some(bin) = SystemBaseDirs.bin_dir() else {
            return;
        };
        assert!(bin.is_absolute(), "bin dir {} is relative", bin.display());
    }
}
