//! Unpacking of `.tar.gz` release archives.
//!
//! Every entry path is checked before anything is written and link entries
//! are refused, so an archive cannot place files outside the extraction
//! directory.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path};

/// Unpacks a downloaded archive into a directory.
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactExtractor {
    /// Unpack `archive_path` below `dest_dir`.
    ///
    /// On success the archive-relative paths of the regular files written
    /// are returned in archive order.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::PathTraversal`] for an absolute or `..` entry,
    /// [`ExtractionError::LinkEntry`] for a symbolic or hard link,
    /// [`ExtractionError::EmptyArchive`] when no regular file was found and
    /// [`ExtractionError::Io`] for read, decompression or write failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path)
    -> Result<Vec<String>, ExtractionError>;
}

/// Reasons an archive could not be unpacked.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Reading, decompressing or writing failed.
    #[error("cannot unpack archive: {0}")]
    Io(#[from] std::io::Error),

    /// An entry would land outside the extraction directory.
    #[error("archive entry {path} escapes the extraction directory")]
    PathTraversal {
        /// The entry path as stored in the archive.
        path: String,
    },

    /// The archive holds a symbolic or hard link.
    #[error("archive entry {path} is a link")]
    LinkEntry {
        /// The entry path as stored in the archive.
        path: String,
    },

    /// The archive holds directories but no regular file.
    #[error("archive holds no files")]
    EmptyArchive,
}

/// [`ArtefactExtractor`] for gzip-compressed tarballs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarGzExtractor;

impl ArtefactExtractor for TarGzExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let reader = GzDecoder::new(BufReader::new(File::open(archive_path)?));
        let files = unpack_tar(reader, dest_dir)?;
        log::debug!(
            "unpacked {} file(s) from {} into {}",
            files.len(),
            archive_path.display(),
            dest_dir.display()
        );
        Ok(files)
    }
}

fn unpack_tar(reader: impl Read, dest_dir: &Path) -> Result<Vec<String>, ExtractionError> {
    let mut tarball = tar::Archive::new(reader);
    tarball.set_preserve_permissions(true);

    let mut files = Vec::new();
    for next in tarball.entries()? {
        let mut item = next?;
        let relative = item.path()?.into_owned();
        ensure_contained(&relative)?;

        let kind = item.header().entry_type();
        if kind.is_symlink() || kind.is_hard_link() {
            return Err(ExtractionError::LinkEntry {
                path: relative.display().to_string(),
            });
        }
        if !item.unpack_in(dest_dir)? {
            return Err(ExtractionError::PathTraversal {
                path: relative.display().to_string(),
            });
        }

        if kind.is_file() {
            log::trace!("unpacked {}", relative.display());
            files.push(relative.to_string_lossy().into_owned());
        }
    }

    if files.is_empty() {
        Err(ExtractionError::EmptyArchive)
    } else {
        Ok(files)
    }
}

/// Reject entry paths that are absolute or climb with `..`.
fn ensure_contained(relative: &Path) -> Result<(), ExtractionError> {
    let contained = !relative.is_absolute()
        && relative.components().all(|part| {
            !matches!(
                part,
                Component::ParentDir | Component::Prefix(_) | Component::RootDir
            )
        });
    if contained {
        Ok(())
    } else {
        Err(ExtractionError::PathTraversal {
            path: relative.display().to_string(),
        })
    }
}
