//! Integrity verification for downloaded archives.
//!
//! The downloaded bytes are streamed through SHA-256 and compared with the
//! digest recorded in the release descriptor. A mismatch is terminal: the
//! pipeline stops before anything is extracted.

use crate::descriptor::sha256_digest::Sha256Digest;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reasons an archive failed verification.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The computed digest differs from the recorded one.
    #[error("checksum mismatch: expected {expected}, actual {actual}")]
    Mismatch {
        /// Digest recorded in the descriptor.
        expected: Sha256Digest,
        /// Digest of the bytes on disk.
        actual: Sha256Digest,
    },

    /// The archive could not be read back from disk.
    #[error("cannot read archive for hashing: {0}")]
    Io(#[from] io::Error),
}

/// Hash everything `reader` yields.
///
/// # Errors
///
/// Propagates read errors from `reader`.
pub fn sha256_reader(reader: &mut dyn Read) -> io::Result<Sha256Digest> {
    let mut hasher = Sha256::new();
    io::copy(reader, &mut hasher)?;
    Ok(Sha256Digest::from_bytes(&hasher.finalize().into()))
}

/// Hash the file at `path`.
///
/// # Errors
///
/// Fails when the file cannot be opened or read.
pub fn compute_sha256(path: &Path) -> io::Result<Sha256Digest> {
    sha256_reader(&mut File::open(path)?)
}

/// Check the file at `path` against `expected`.
///
/// # Errors
///
/// [`VerificationError::Mismatch`] when the digests differ and
/// [`VerificationError::Io`] when the file cannot be read.
///
/// # Examples
///
/// ```
/// use speechly_installer::artefact::verification::verify_checksum;
/// use speechly_installer::descriptor::sha256_digest::Sha256Digest;
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("empty");
/// std::fs::write(&path, b"")?;
/// let empty: Sha256Digest =
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".try_into()?;
/// assert!(verify_checksum(&empty, &path).is_ok());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn verify_checksum(expected: &Sha256Digest, path: &Path) -> Result<(), VerificationError> {
    let actual = compute_sha256(path)?;
    if actual == *expected {
        log::debug!("{} matches {actual}", path.display());
        return Ok(());
    }
    Err(VerificationError::Mismatch {
        expected: expected.clone(),
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sha256_hex;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn reader_digest_matches_known_vector() {
        let digest = sha256_reader(&mut b"abc".as_slice()).expect("in-memory read");
        assert_eq!(digest.as_str(), ABC_SHA256);
    }

    #[test]
    fn large_input_matches_one_shot_digest() {
        let data = vec![7u8; 70_000];
        let digest = sha256_reader(&mut data.as_slice()).expect("in-memory read");
        assert_eq!(digest.as_str(), sha256_hex(&data));
    }

    #[test]
    fn matching_file_verifies() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("archive.tar.gz");
        std::fs::write(&path, b"abc").expect("write");
        let expected = Sha256Digest::try_from(ABC_SHA256).expect("valid");
        assert!(verify_checksum(&expected, &path).is_ok());
    }

    #[test]
    fn every_single_byte_mutation_fails_verification() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("archive.tar.gz");
        let original = b"speechly release archive".to_vec();
        let expected = Sha256Digest::try_from(sha256_hex(&original)).expect("valid");

        for index in 0..original.len() {
            let mut mutated = original.clone();
            mutated[index] ^= 0x01;
            std::fs::write(&path, &mutated).expect("write");
            let result = verify_checksum(&expected, &path);
            assert!(
                matches!(result, Err(VerificationError::Mismatch { .. })),
                "mutation at byte {index} was not detected"
            );
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let expected = Sha256Digest::try_from(ABC_SHA256).expect("valid");
        let result = verify_checksum(&expected, &dir.path().join("absent"));
        assert!(matches!(result, Err(VerificationError::Io(_))));
    }
}
