//! Speechly installer CLI entrypoint.
//!
//! This binary installs the prebuilt `speechly` executable for the host
//! platform, prints the release descriptor, or renders its Homebrew formula.

use camino::Utf8Path;
use clap::Parser;
use speechly_installer::cli::{Cli, Command, FormulaArgs, InstallArgs, ShowArgs};
use speechly_installer::descriptor::builtin::speechly_release;
use speechly_installer::descriptor::parser::{DescriptorParseError, load_descriptor};
use speechly_installer::descriptor::release::ReleaseDescriptor;
use speechly_installer::dirs::{BaseDirs, SystemBaseDirs, resolve_bin_dir};
use speechly_installer::error::{InstallerError, Result};
use speechly_installer::formula::render_formula;
use speechly_installer::output::{
    DryRunInfo, describe_human, describe_json, path_hint, success_message, write_stderr_line,
};
use speechly_installer::pipeline::{InstallConfig, install, plan};
use speechly_installer::platform::HostPlatform;
use speechly_installer::resolver::unsupported;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.install_args());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install the `env_logger` backend; `RUST_LOG` overrides the `-v` level.
fn init_logging(args: &InstallArgs) {
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::Show(args)) => run_show(args, stdout),
        Some(Command::Formula(args)) => run_formula(args, stdout),
        Some(Command::Install(_)) | None => {
            run_install(cli.install_args(), &SystemBaseDirs, stderr)
        }
    }
}

fn run_install(args: &InstallArgs, dirs: &dyn BaseDirs, stderr: &mut dyn Write) -> Result<()> {
    let descriptor = load_release(args.descriptor.as_deref())?;
    let host = resolve_host(args, &descriptor)?;
    let bin_dir = resolve_bin_dir(args.bin_dir.as_deref(), dirs)?;
    let config = InstallConfig {
        descriptor: &descriptor,
        host,
        bin_dir: &bin_dir,
        quiet: args.quiet,
    };

    // Dry-run mode: show what would be done without side effects
    if args.dry_run {
        let plan = plan(&config)?;
        let info = DryRunInfo {
            descriptor: &descriptor,
            plan: &plan,
            verbosity: args.verbosity,
            quiet: args.quiet,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let outcome = install(&config, stderr)?;
    if !args.quiet {
        write_stderr_line(stderr, success_message(&descriptor, &outcome));
        if let Some(hint) = path_hint(&bin_dir, std::env::var_os("PATH").as_deref()) {
            write_stderr_line(stderr, "");
            write_stderr_line(stderr, hint);
        }
    }
    Ok(())
}

fn run_show(args: &ShowArgs, stdout: &mut dyn Write) -> Result<()> {
    let descriptor = load_release(args.descriptor.as_deref())?;
    let text = if args.json {
        describe_json(&descriptor).map_err(|e| InstallerError::WriteFailed {
            source: std::io::Error::other(e),
        })?
    } else {
        describe_human(&descriptor)
    };
    writeln!(stdout, "{text}").map_err(|source| InstallerError::WriteFailed { source })
}

fn run_formula(args: &FormulaArgs, stdout: &mut dyn Write) -> Result<()> {
    let descriptor = load_release(args.descriptor.as_deref())?;
    stdout
        .write_all(render_formula(&descriptor).as_bytes())
        .map_err(|source| InstallerError::WriteFailed { source })
}

/// Load the descriptor at `path`, or the built-in release when absent.
fn load_release(path: Option<&Utf8Path>) -> Result<ReleaseDescriptor> {
    Ok(path.map_or_else(builtin_release, load_descriptor)?)
}

fn builtin_release() -> std::result::Result<ReleaseDescriptor, DescriptorParseError> {
    Ok(speechly_release()?)
}

/// Determine the host from `--os`/`--arch` or the running system.
///
/// A host outside the platform vocabulary is reported as unsupported, the
/// same as a known host without a descriptor entry.
fn resolve_host(args: &InstallArgs, descriptor: &ReleaseDescriptor) -> Result<HostPlatform> {
    args.host_override()
        .map_or_else(HostPlatform::detect, |(os, arch)| HostPlatform::parse(os, arch))
        .map_err(|e| unsupported(descriptor, &format!("{}/{}", e.os, e.arch)))
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            log::debug!("install failed: {err:?}");
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
