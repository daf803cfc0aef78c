//! The speechly release this installer ships with.
//!
//! Values are copied verbatim from the published `0.0.2` release; the macOS
//! archive is served to every macOS CPU and Linux is Intel-only.

use super::error::Result;
use super::release::ReleaseDescriptor;
use crate::platform::{CpuRequirement, Os};

/// Package name of the built-in release.
pub const NAME: &str = "speechly";
/// Version of the built-in release.
pub const VERSION: &str = "0.0.2";
/// Project homepage.
pub const HOMEPAGE: &str = "https://www.speechly.com/";

/// Archive served to every macOS host.
pub const MACOS_URL: &str =
    "https://github.com/speechly/cli/releases/download/v0.0.2/speechly_0.0.2_macOS_x86_64.tar.gz";
/// SHA-256 of the macOS archive.
pub const MACOS_SHA256: &str = "5c0b6360fdf9567c5343e873a59128cb4bec6ca09cb1bbfead5b8cea9dd59ed1";
/// Archive served to Intel Linux hosts.
pub const LINUX_X86_64_URL: &str =
    "https://github.com/speechly/cli/releases/download/v0.0.2/speechly_0.0.2_Linux_x86_64.tar.gz";
/// SHA-256 of the Intel Linux archive.
pub const LINUX_X86_64_SHA256: &str = "73a91fba8177995352fd924d4161ed83d3134f4e9250df5fea8a8856cb0f256e";

/// Return the built-in speechly release descriptor.
///
/// # Errors
///
/// Never fails for the constants above; the `Result` keeps the single
/// validation path through [`DescriptorBuilder::build`](super::release::DescriptorBuilder::build).
///
/// # Examples
///
/// ```
/// use speechly_installer::descriptor::builtin::speechly_release;
///
/// let release = speechly_release().expect("built-in descriptor is valid");
/// assert_eq!(release.version(), "0.0.2");
/// assert_eq!(release.install_target(), "speechly");
/// ```
pub fn speechly_release() -> Result<ReleaseDescriptor> {
    ReleaseDescriptor::builder(NAME, VERSION, NAME)
        .desc("")
        .homepage(HOMEPAGE)
        .entry(Os::MacOs, CpuRequirement::Any, MACOS_URL, MACOS_SHA256)
        .entry(
            Os::Linux,
            CpuRequirement::Intel,
            LINUX_X86_64_URL,
            LINUX_X86_64_SHA256,
        )
        .build()
}
