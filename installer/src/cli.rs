//! Command-line surface of `speechly-installer`.
//!
//! Running the binary without a subcommand installs; `show` and `formula`
//! only read the release descriptor.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install the prebuilt speechly command-line tool.
#[derive(Parser, Debug)]
#[command(name = "speechly-installer")]
#[command(version, about, args_conflicts_with_subcommands = true)]
#[command(long_about = concat!(
    "Install the prebuilt speechly command-line tool.\n\n",
    "The installer picks the release archive built for this machine, downloads it, ",
    "checks its SHA-256 digest against the release descriptor and copies the ",
    "`speechly` executable into a bin directory. Hosts without a published archive ",
    "are rejected; nothing is built from source.",
))]
#[command(after_help = concat!(
    "SUPPORTED PLATFORMS (built-in release 0.0.2):\n",
    "  macOS   any CPU (x86_64 archive)\n",
    "  Linux   x86_64\n\n",
    "USAGE EXAMPLES:\n",
    "  Install into the default bin directory:\n",
    "    $ speechly-installer\n\n",
    "  Install into a chosen directory:\n",
    "    $ speechly-installer --bin-dir ~/bin\n\n",
    "  Preview for another platform without downloading:\n",
    "    $ speechly-installer --dry-run --os linux --arch x86_64\n\n",
    "  Install from a release descriptor file:\n",
    "    $ speechly-installer --descriptor speechly.toml\n\n",
    "  Print the Homebrew formula:\n",
    "    $ speechly-installer formula\n\n",
    "The bin directory defaults to $SPEECHLY_INSTALL_DIR, then the platform ",
    "executable directory, then ~/.local/bin.",
))]
pub struct Cli {
    /// Selected subcommand, if any.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Flags for the implicit install.
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Subcommands of the installer.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download, verify and install the executable.
    Install(InstallArgs),

    /// Show the release descriptor.
    Show(ShowArgs),

    /// Print the Homebrew formula for the release.
    Formula(FormulaArgs),
}

/// Flags accepted by `install` and by the bare command.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Directory receiving the executable [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Release descriptor file to install from [default: built-in release].
    #[arg(short, long, value_name = "FILE")]
    pub descriptor: Option<Utf8PathBuf>,

    /// Install for this operating system instead of the detected one.
    #[arg(long, value_name = "OS", requires = "arch")]
    pub os: Option<String>,

    /// Install for this CPU architecture instead of the detected one.
    #[arg(long, value_name = "ARCH", requires = "os")]
    pub arch: Option<String>,

    /// Show what would be installed and exit without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Log more detail; repeat for debug (-vv) and trace (-vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Print nothing but errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Flags accepted by `show`.
#[derive(Parser, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Print the descriptor as JSON.
    #[arg(long)]
    pub json: bool,

    /// Release descriptor file to show [default: built-in release].
    #[arg(short, long, value_name = "FILE")]
    pub descriptor: Option<Utf8PathBuf>,
}

/// Flags accepted by `formula`.
#[derive(Parser, Debug, Clone, Default)]
pub struct FormulaArgs {
    /// Release descriptor file to render [default: built-in release].
    #[arg(short, long, value_name = "FILE")]
    pub descriptor: Option<Utf8PathBuf>,
}

impl InstallArgs {
    /// Host override as `(os, arch)` when both flags were given.
    ///
    /// # Examples
    ///
    /// ```
    /// use speechly_installer::cli::InstallArgs;
    ///
    /// let args = InstallArgs {
    ///     os: Some("linux".to_owned()),
    ///     arch: Some("x86_64".to_owned()),
    ///     ..InstallArgs::default()
    /// };
    /// assert_eq!(args.host_override(), Some(("linux", "x86_64")));
    /// assert_eq!(InstallArgs::default().host_override(), None);
    /// ```
    #[must_use]
    pub fn host_override(&self) -> Option<(&str, &str)> {
        self.os.as_deref().zip(self.arch.as_deref())
    }

    /// Logging level implied by `-v`/`-q`.
    ///
    /// Quiet and the default both log warnings only; each `-v` raises the
    /// level one step up to `trace`.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

impl Cli {
    /// Install flags in effect.
    ///
    /// These come from the `install` subcommand when it was named and from
    /// the top-level flags otherwise. Top-level flags cannot be combined
    /// with a subcommand, so under `show` and `formula` they are defaults.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        if let Some(Command::Install(args)) = &self.command {
            return args;
        }
        &self.install
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
