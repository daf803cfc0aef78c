//! Text the installer shows to people and scripts.
//!
//! Progress and result messages go to stderr; `show` and `formula` write
//! their documents to stdout.

use crate::descriptor::release::ReleaseDescriptor;
use crate::pipeline::{InstallOutcome, InstallPlan};
use crate::resolver::supported_platforms;
use camino::Utf8Path;
use std::ffi::OsStr;
use std::fmt::Display;
use std::io::Write;

/// Write one line to stderr, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; a closed stderr must not fail the install.
    }
}

/// Final line of a successful install.
#[must_use]
pub fn success_message(descriptor: &ReleaseDescriptor, outcome: &InstallOutcome) -> String {
    format!(
        "Installed {descriptor} ({}) to {}",
        outcome.entry.platform_label(),
        outcome.installed_path
    )
}

/// Suggest adding `bin_dir` to `PATH` when it is not already listed.
///
/// `path_var` is the raw value of the `PATH` environment variable.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use speechly_installer::output::path_hint;
/// use std::ffi::OsStr;
///
/// let bin = Utf8Path::new("/opt/speechly/bin");
/// assert!(path_hint(bin, Some(OsStr::new("/usr/bin"))).is_some());
/// assert!(path_hint(bin, Some(OsStr::new("/usr/bin:/opt/speechly/bin"))).is_none());
/// ```
#[must_use]
pub fn path_hint(bin_dir: &Utf8Path, path_var: Option<&OsStr>) -> Option<String> {
    let listed = path_var.is_some_and(|value| {
        std::env::split_paths(value).any(|entry| entry == bin_dir.as_std_path())
    });
    if listed {
        return None;
    }
    Some(format!(
        concat!(
            "{0} is not on your PATH. Add it to your shell configuration:\n\n",
            "  # bash/zsh (~/.bashrc, ~/.zshrc)\n",
            "  export PATH=\"{0}:$PATH\"\n\n",
            "  # fish (~/.config/fish/config.fish)\n",
            "  fish_add_path \"{0}\""
        ),
        bin_dir
    ))
}

/// Report printed by `--dry-run` instead of installing.
///
///
/// ```
/// use camino::Utf8Path;
/// use speechly_installer::descriptor::builtin::speechly_release;
/// use speechly_installer::output::DryRunInfo;
/// use speechly_installer::pipeline::{InstallConfig, plan};
/// use speechly_installer::platform::{Cpu, HostPlatform, Os};
///
/// let release = speechly_release().expect("valid");
/// let config = InstallConfig {
///     descriptor: &release,
///     host: HostPlatform::new(Os::Linux, Cpu::Intel),
///     bin_dir: Utf8Path::new("/home/user/.local/bin"),
///     quiet: false,
/// };
/// let plan = plan(&config).expect("supported");
/// let info = DryRunInfo {
///     descriptor: &release,
///     plan: &plan,
///     verbosity: 0,
///     quiet: false,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("speechly_0.0.2_Linux_x86_64.tar.gz"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Release being planned.
    pub descriptor: &'a ReleaseDescriptor,
    /// Resolved entry and destination.
    pub plan: &'a InstallPlan,
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// `-q` was given.
    pub quiet: bool,
}

impl DryRunInfo<'_> {
    /// Multi-line report, without a trailing newline.
    #[must_use]
    pub fn display_text(&self) -> String {
        let entry = &self.plan.entry;
        let output = if self.quiet {
            "quiet".to_owned()
        } else {
            format!("verbosity {}", self.verbosity)
        };
        [
            "Dry run: nothing will be downloaded or written".to_owned(),
            String::new(),
            format!("Release: {}", self.descriptor),
            format!("Host platform: {}", self.plan.host),
            format!("Platform entry: {}", entry.platform_label()),
            format!("Archive: {}", entry.url()),
            format!("SHA-256: {}", entry.sha256()),
            format!("Destination: {}", self.plan.destination),
            format!("Output: {output}"),
        ]
        .join("\n")
    }
}

/// Render a descriptor for people.
#[must_use]
pub fn describe_human(descriptor: &ReleaseDescriptor) -> String {
    let mut lines = vec![format!("{descriptor}")];
    if !descriptor.desc().is_empty() {
        lines.push(descriptor.desc().to_owned());
    }
    if let Some(homepage) = descriptor.homepage() {
        lines.push(format!("Homepage: {homepage}"));
    }
    lines.push(format!("Installs: {}", descriptor.install_target()));
    lines.push(format!("Platforms: {}", supported_platforms(descriptor)));
    for entry in descriptor.platforms() {
        lines.push(format!("  {}", entry.platform_label()));
        lines.push(format!("    url:    {}", entry.url()));
        lines.push(format!("    sha256: {}", entry.sha256()));
    }
    lines.join("\n")
}

/// Render a descriptor as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn describe_json(descriptor: &ReleaseDescriptor) -> serde_json::Result<String> {
    serde_json::to_string_pretty(descriptor)
}
