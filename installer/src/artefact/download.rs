//! Fetching release archives over HTTPS.
//!
//! The pipeline only sees [`ArtefactDownloader`]; tests substitute a mock or
//! an in-memory stub. Each archive is requested exactly once.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Upper bound on a single archive transfer, connection setup included.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

const USER_AGENT: &str = concat!("speechly-installer/", env!("CARGO_PKG_VERSION"));

/// Source of release archive bytes.
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Fetch `url` and write the body to `dest`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`DownloadError::NotFound`] when the server answers 404,
    /// [`DownloadError::HttpError`] for any other transport or status failure
    /// and [`DownloadError::Io`] when `dest` cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;
}

/// Reasons an archive could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request failed or the server answered with an error status.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// Transport or status description.
        reason: String,
    },

    /// The server has no archive at this URL.
    #[error("archive not found: {url}")]
    NotFound {
        /// Requested URL.
        url: String,
    },

    /// The destination file could not be written.
    #[error("cannot write downloaded archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloader backed by a process-wide `ureq` agent.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpDownloader;

impl ArtefactDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        log::debug!("requesting {url}");
        let response = agent()
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| classify(url, &err))?;
        let mut body = response.into_body().into_reader();
        let written = write_body(&mut body, dest).map_err(|failure| match failure {
            BodyError::Read(err) => DownloadError::HttpError {
                url: url.to_owned(),
                reason: err.to_string(),
            },
            BodyError::Write(err) => DownloadError::Io(err),
        })?;
        log::debug!("wrote {written} bytes to {}", dest.display());
        Ok(written)
    }
}

/// Distinguishes a broken response stream from a local write failure.
enum BodyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

fn write_body(body: &mut dyn Read, dest: &Path) -> Result<u64, BodyError> {
    let mut file = File::create(dest).map_err(BodyError::Write)?;
    let mut buffer = [0_u8; 64 * 1024];
    let mut written = 0_u64;
    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(BodyError::Read(err)),
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        file.write_all(chunk).map_err(BodyError::Write)?;
        written += read as u64;
    }
    file.sync_all().map_err(BodyError::Write)?;
    Ok(written)
}

fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(DOWNLOAD_TIMEOUT))
                .build(),
        )
    })
}

fn classify(url: &str, err: &ureq::Error) -> DownloadError {
    if matches!(err, ureq::Error::StatusCode(404)) {
        return DownloadError::NotFound {
            url: url.to_owned(),
        };
    }
    DownloadError::HttpError {
        url: url.to_owned(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const URL: &str = "https://downloads.example.test/speechly.tar.gz";

    #[test]
    fn missing_archive_is_not_found() {
        let mapped = classify(URL, &ureq::Error::StatusCode(404));
        assert!(matches!(mapped, DownloadError::NotFound { ref url } if url == URL));
    }

    #[rstest]
    #[case::forbidden(403)]
    #[case::bad_gateway(502)]
    fn other_statuses_are_http_errors(#[case] status: u16) {
        let DownloadError::HttpError { url, reason } =
            classify(URL, &ureq::Error::StatusCode(status))
        else {
            panic!("status {status} was not an HTTP error");
        };
        assert_eq!(url, URL);
        assert!(reason.contains(&status.to_string()), "reason: {reason}");
    }

    #[test]
    fn body_is_copied_to_destination() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dest = temp.path().join("archive.tar.gz");
        let payload = vec![7_u8; 200_000];

        let written = write_body(&mut payload.as_slice(), &dest)
            .unwrap_or_else(|_| panic!("body write failed"));

        assert_eq!(written, 200_000);
        assert_eq!(std::fs::read(&dest).expect("read"), payload);
    }

    #[test]
    fn unwritable_destination_is_a_write_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dest = temp.path().join("missing").join("archive.tar.gz");
        let result = write_body(&mut b"data".as_slice(), &dest);
        assert!(matches!(result, Err(BodyError::Write(_))));
    }
}
