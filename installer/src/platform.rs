//! Host platform detection and the platform vocabulary of release descriptors.
//!
//! Formulas branch on two questions: which operating system is running, and
//! whether the CPU is an Intel or an ARM part. [`Os`], [`Cpu`] and
//! [`CpuRequirement`] model exactly those questions; [`HostPlatform`] is the
//! answer for the machine being installed on.

use crate::descriptor::error::DescriptorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating systems a platform entry can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Apple macOS.
    #[serde(rename = "macos")]
    MacOs,
    /// Linux.
    Linux,
    /// Microsoft Windows.
    Windows,
}

impl Os {
    /// Every operating system, in formula branch order.
    pub const ALL: [Self; 3] = [Self::MacOs, Self::Linux, Self::Windows];

    /// Return the lowercase identifier used in descriptor files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = DescriptorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "macos" | "mac" | "darwin" | "osx" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(DescriptorError::UnknownOs {
                value: value.to_owned(),
            }),
        }
    }
}

/// CPU families a host can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cpu {
    /// Intel-compatible (`x86`, `x86_64`).
    Intel,
    /// ARM (`arm`, `aarch64`).
    Arm,
}

impl Cpu {
    /// Return the lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intel => "intel",
            Self::Arm => "arm",
        }
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cpu {
    type Err = DescriptorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "intel" | "x86_64" | "amd64" | "x86" | "i386" | "i686" => Ok(Self::Intel),
            "arm" | "arm64" | "aarch64" => Ok(Self::Arm),
            _ => Err(DescriptorError::UnknownCpu {
                value: value.to_owned(),
            }),
        }
    }
}

/// The CPU constraint a platform entry places on the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuRequirement {
    /// Any CPU on the entry's operating system.
    #[default]
    Any,
    /// Intel-compatible CPUs only.
    Intel,
    /// ARM CPUs only.
    Arm,
}

impl CpuRequirement {
    /// Return whether a host with `cpu` satisfies this requirement.
    #[must_use]
    pub const fn admits(self, cpu: Cpu) -> bool {
        matches!(
            (self, cpu),
            (Self::Any, _) | (Self::Intel, Cpu::Intel) | (Self::Arm, Cpu::Arm)
        )
    }

    /// Return whether a single host CPU could satisfy both requirements.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Any, _) | (_, Self::Any) | (Self::Intel, Self::Intel) | (Self::Arm, Self::Arm)
        )
    }

    /// Return the lowercase identifier used in descriptor files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Intel => "intel",
            Self::Arm => "arm",
        }
    }
}

impl fmt::Display for CpuRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operating system and CPU of the machine being installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostPlatform {
    /// Host operating system.
    pub os: Os,
    /// Host CPU family.
    pub cpu: Cpu,
}

/// The running host reported an OS or architecture outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised host platform {os}/{arch}")]
pub struct UnrecognisedHost {
    /// The raw operating system name.
    pub os: String,
    /// The raw architecture name.
    pub arch: String,
}

impl HostPlatform {
    /// Construct a host platform from known parts.
    #[must_use]
    pub const fn new(os: Os, cpu: Cpu) -> Self {
        Self { os, cpu }
    }

    /// Detect the running host from `std::env::consts`.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognisedHost`] when the compile-time OS or
    /// architecture has no counterpart in [`Os`] or [`Cpu`].
    pub fn detect() -> Result<Self, UnrecognisedHost> {
        Self::parse(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Parse an OS and architecture pair as spelled by Rust, Go, or
    /// release archive names.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognisedHost`] if either part is not recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use speechly_installer::platform::{Cpu, HostPlatform, Os};
    ///
    /// let host = HostPlatform::parse("darwin", "amd64").expect("known platform");
    /// assert_eq!(host, HostPlatform::new(Os::MacOs, Cpu::Intel));
    /// ```
    pub fn parse(os: &str, arch: &str) -> Result<Self, UnrecognisedHost> {
        let unrecognised = || UnrecognisedHost {
            os: os.to_owned(),
            arch: arch.to_owned(),
        };
        let parsed_os = os.parse::<Os>().map_err(|_| unrecognised())?;
        let parsed_cpu = arch.parse::<Cpu>().map_err(|_| unrecognised())?;
        Ok(Self::new(parsed_os, parsed_cpu))
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.cpu)
    }
}
