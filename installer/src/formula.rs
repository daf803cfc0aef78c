//! Homebrew formula rendering.
//!
//! Emits the formula text a release pipeline would publish for a
//! descriptor, in the exact layout GoReleaser generates: header comment,
//! metadata, an `if OS.mac?` / `elsif OS.linux?` chain with optional CPU
//! guards, and a single `bin.install`. Windows entries have no formula
//! counterpart and are left out.

use crate::descriptor::release::{PlatformEntry, ReleaseDescriptor};
use crate::platform::{CpuRequirement, Os};

const HEADER: &str = "# This file was generated by GoReleaser. DO NOT EDIT.";

/// Render the Homebrew formula for `descriptor`.
///
/// # Examples
///
/// ```
/// use speechly_installer::descriptor::builtin::speechly_release;
/// use speechly_installer::formula::render_formula;
///
/// let formula = render_formula(&speechly_release().expect("valid"));
/// assert!(formula.starts_with("# This file was generated by GoReleaser."));
/// assert!(formula.contains("class Speechly < Formula"));
/// ```
#[must_use]
pub fn render_formula(descriptor: &ReleaseDescriptor) -> String {
    let mut lines: Vec<String> = vec![
        HEADER.to_owned(),
        format!("class {} < Formula", class_name(descriptor.name())),
        format!("  desc {}", ruby_string(descriptor.desc())),
        format!(
            "  homepage {}",
            ruby_string(descriptor.homepage().map_or("", |url| url.as_str()))
        ),
        format!("  version {}", ruby_string(descriptor.version())),
        "  bottle :unneeded".to_owned(),
        String::new(),
    ];

    let branches: Vec<(Os, Vec<&PlatformEntry>)> = [Os::MacOs, Os::Linux]
        .into_iter()
        .map(|os| (os, descriptor.platforms_for(os).collect::<Vec<_>>()))
        .filter(|(_, entries)| !entries.is_empty())
        .collect();

    if !branches.is_empty() {
        for (index, (os, entries)) in branches.iter().enumerate() {
            let keyword = if index == 0 { "if" } else { "elsif" };
            lines.push(format!("  {keyword} {}", os_predicate(*os)));
            push_branch(&mut lines, entries);
        }
        lines.push("  end".to_owned());
        lines.push(String::new());
    }

    lines.push("  def install".to_owned());
    lines.push(format!(
        "    bin.install {}",
        ruby_string(descriptor.install_target())
    ));
    lines.push("  end".to_owned());
    lines.push("end".to_owned());

    let mut formula = lines.join("\n");
    formula.push('\n');
    formula
}

/// Entries for one OS never overlap, so a CPU-agnostic entry is alone in
/// its branch and CPU-specific entries form one `if`/`elsif` chain.
fn push_branch(lines: &mut Vec<String>, entries: &[&PlatformEntry]) {
    let mut guarded = 0usize;
    for entry in entries {
        let Some(predicate) = cpu_predicate(entry.cpu()) else {
            push_source(lines, "    ", entry);
            continue;
        };
        let keyword = if guarded == 0 { "if" } else { "elsif" };
        lines.push(format!("    {keyword} {predicate}"));
        push_source(lines, "      ", entry);
        guarded += 1;
    }
    if guarded > 0 {
        lines.push("    end".to_owned());
    }
}

fn push_source(lines: &mut Vec<String>, indent: &str, entry: &PlatformEntry) {
    lines.push(format!("{indent}url {}", ruby_string(entry.url().as_str())));
    lines.push(format!(
        "{indent}sha256 {}",
        ruby_string(entry.sha256().as_str())
    ));
}

const fn os_predicate(os: Os) -> &'static str {
    match os {
        Os::MacOs => "OS.mac?",
        Os::Linux => "OS.linux?",
        Os::Windows => "OS.windows?",
    }
}

const fn cpu_predicate(cpu: CpuRequirement) -> Option<&'static str> {
    match cpu {
        CpuRequirement::Any => None,
        CpuRequirement::Intel => Some("Hardware::CPU.intel?"),
        CpuRequirement::Arm => Some("Hardware::CPU.arm?"),
    }
}

/// Derive the Ruby class name from a package name.
///
/// Words separated by `-` or `_` are capitalised and joined:
/// `speechly` becomes `Speechly`, `speechly-cli` becomes `SpeechlyCli`.
#[must_use]
pub fn class_name(package: &str) -> String {
    package
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Quote `value` as a double-quoted Ruby string literal.
fn ruby_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '#' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::builtin::speechly_release;
    use rstest::rstest;

    const SPEECHLY_FORMULA: &str = concat!(
        "# This file was generated by GoReleaser. DO NOT EDIT.\n",
        "class Speechly < Formula\n",
        "  desc \"\"\n",
        "  homepage \"https://www.speechly.com/\"\n",
        "  version \"0.0.2\"\n",
        "  bottle :unneeded\n",
        "\n",
        "  if OS.mac?\n",
        "    url \"https://github.com/speechly/cli/releases/download/v0.0.2/speechly_0.0.2_macOS_x86_64.tar.gz\"\n",
        "    sha256 \"5c0b6360fdf9567c5343e873a59128cb4bec6ca09cb1bbfead5b8cea9dd59ed1\"\n",
        "  elsif OS.linux?\n",
        "    if Hardware::CPU.intel?\n",
        "      url \"https://github.com/speechly/cli/releases/download/v0.0.2/speechly_0.0.2_Linux_x86_64.tar.gz\"\n",
        "      sha256 \"73a91fba8177995352fd924d4161ed83d3134f4e9250df5fea8a8856cb0f256e\"\n",
        "    end\n",
        "  end\n",
        "\n",
        "  def install\n",
        "    bin.install \"speechly\"\n",
        "  end\n",
        "end\n",
    );

    #[test]
    fn renders_builtin_release_byte_for_byte() {
        let release = speechly_release().expect("valid");
        assert_eq!(render_formula(&release), SPEECHLY_FORMULA);
    }

    #[test]
    fn renders_cpu_chain_and_skips_windows() {
        let release = ReleaseDescriptor::builder("tool", "1.0.0", "tool")
            .entry(Os::Linux, CpuRequirement::Intel, "https://example.test/li.tgz", &"a".repeat(64))
            .entry(Os::Linux, CpuRequirement::Arm, "https://example.test/la.tgz", &"b".repeat(64))
            .entry(Os::Windows, CpuRequirement::Any, "https://example.test/w.zip", &"c".repeat(64))
            .build()
            .expect("valid");

        let formula = render_formula(&release);
        assert!(formula.contains("  if OS.linux?\n    if Hardware::CPU.intel?\n"));
        assert!(formula.contains(
            "      sha256 \"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\"\n    elsif Hardware::CPU.arm?\n"
        ));
        assert!(formula.contains("    end\n  end\n"));
        assert!(!formula.contains("elsif OS."));
        assert!(!formula.contains("w.zip"));
        assert!(formula.contains("  homepage \"\"\n"));
    }

    #[test]
    fn windows_only_release_has_no_platform_chain() {
        let release = ReleaseDescriptor::builder("tool", "1.0.0", "tool.exe")
            .entry(Os::Windows, CpuRequirement::Any, "https://example.test/w.zip", &"c".repeat(64))
            .build()
            .expect("valid");

        let formula = render_formula(&release);
        assert!(!formula.contains("OS."));
        assert!(formula.contains("  bottle :unneeded\n\n  def install\n"));
    }

    #[rstest]
    #[case::plain("speechly", "Speechly")]
    #[case::dashed("speechly-cli", "SpeechlyCli")]
    #[case::underscored("my_tool", "MyTool")]
    #[case::numbered("tool-2", "Tool2")]
    fn class_name_capitalises_words(#[case] package: &str, #[case] expected: &str) {
        assert_eq!(class_name(package), expected);
    }

    #[test]
    fn ruby_strings_escape_interpolation_and_quotes() {
        assert_eq!(ruby_string(r#"say "hi" #{x}"#), r#""say \"hi\" \#{x}""#);
    }
}
