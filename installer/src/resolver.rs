//! Platform resolution: pick the one descriptor entry that serves the host.
//!
//! There is no fallback. A host without an entry is an
//! [`InstallerError::UnsupportedPlatform`], even when a "close" entry exists
//! (for example an Intel Linux archive on an ARM Linux host).

use crate::descriptor::release::{PlatformEntry, ReleaseDescriptor};
use crate::error::{InstallerError, Result};
use crate::platform::HostPlatform;

/// Select the platform entry matching `host`.
///
/// Descriptor construction guarantees entries never overlap, so at most one
/// entry can match.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] when no entry matches.
///
/// # Examples
///
/// ```
/// use speechly_installer::descriptor::builtin::speechly_release;
/// use speechly_installer::platform::{Cpu, HostPlatform, Os};
/// use speechly_installer::resolver::resolve_entry;
///
/// let release = speechly_release().expect("valid");
/// let entry = resolve_entry(&release, HostPlatform::new(Os::Linux, Cpu::Intel))
///     .expect("linux/intel is supported");
/// assert_eq!(entry.archive_name(), "speechly_0.0.2_Linux_x86_64.tar.gz");
/// ```
pub fn resolve_entry(
    descriptor: &ReleaseDescriptor,
    host: HostPlatform,
) -> Result<&PlatformEntry> {
    let entry = descriptor
        .platforms()
        .iter()
        .find(|entry| entry.matches(host))
        .ok_or_else(|| unsupported(descriptor, &host.to_string()))?;
    log::debug!(
        "resolved {host} to {} ({})",
        entry.platform_label(),
        entry.archive_name()
    );
    Ok(entry)
}

/// Build the error reported for a host the descriptor does not serve.
///
/// `host` is free-form so that undetectable hosts (an OS or architecture
/// outside the platform vocabulary) are reported the same way.
#[must_use]
pub fn unsupported(descriptor: &ReleaseDescriptor, host: &str) -> InstallerError {
    InstallerError::UnsupportedPlatform {
        host: host.to_owned(),
        supported: supported_platforms(descriptor),
    }
}

/// Comma-separated list of the platforms a descriptor serves.
#[must_use]
pub fn supported_platforms(descriptor: &ReleaseDescriptor) -> String {
    descriptor
        .platforms()
        .iter()
        .map(PlatformEntry::platform_label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::builtin::speechly_release;
    use crate::platform::{Cpu, CpuRequirement, Os};
    use rstest::rstest;

    #[rstest]
    #[case::macos_intel(Os::MacOs, Cpu::Intel, "speechly_0.0.2_macOS_x86_64.tar.gz")]
    #[case::macos_arm(Os::MacOs, Cpu::Arm, "speechly_0.0.2_macOS_x86_64.tar.gz")]
    #[case::linux_intel(Os::Linux, Cpu::Intel, "speechly_0.0.2_Linux_x86_64.tar.gz")]
    fn resolves_supported_hosts(#[case] os: Os, #[case] cpu: Cpu, #[case] archive: &str) {
        let release = speechly_release().expect("valid");
        let entry = resolve_entry(&release, HostPlatform::new(os, cpu)).expect("supported");
        assert_eq!(entry.archive_name(), archive);
    }

    #[rstest]
    #[case::linux_arm(Os::Linux, Cpu::Arm)]
    #[case::windows_intel(Os::Windows, Cpu::Intel)]
    #[case::windows_arm(Os::Windows, Cpu::Arm)]
    fn rejects_unsupported_hosts(#[case] os: Os, #[case] cpu: Cpu) {
        let release = speechly_release().expect("valid");
        let host = HostPlatform::new(os, cpu);
        let err = resolve_entry(&release, host).expect_err("unsupported");
        match err {
            InstallerError::UnsupportedPlatform { host: reported, supported } => {
                assert_eq!(reported, host.to_string());
                assert_eq!(supported, "macos/any, linux/intel");
            }
            other => panic!("expected UnsupportedPlatform, got {other:?}"),
        }
    }

    #[test]
    fn every_host_resolves_to_at_most_one_entry() {
        let release = ReleaseDescriptor::builder("tool", "1.0.0", "tool")
            .entry(Os::MacOs, CpuRequirement::Any, "https://example.test/m.tgz", &"a".repeat(64))
            .entry(Os::Linux, CpuRequirement::Intel, "https://example.test/li.tgz", &"b".repeat(64))
            .entry(Os::Linux, CpuRequirement::Arm, "https://example.test/la.tgz", &"c".repeat(64))
            .build()
            .expect("valid");

        for os in Os::ALL {
            for cpu in [Cpu::Intel, Cpu::Arm] {
                let host = HostPlatform::new(os, cpu);
                let matching = release.platforms().iter().filter(|e| e.matches(host)).count();
                assert!(matching <= 1, "{host} matched {matching} entries");
                assert_eq!(resolve_entry(&release, host).is_ok(), matching == 1);
            }
        }
    }
}
