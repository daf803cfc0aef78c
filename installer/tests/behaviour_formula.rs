//! BDD tests for Homebrew formula rendering.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use speechly_installer::descriptor::builtin::speechly_release;
use speechly_installer::descriptor::parser::load_descriptor;
use speechly_installer::descriptor::release::ReleaseDescriptor;
use speechly_installer::formula::render_formula;

#[derive(Default)]
struct FormulaWorld {
    _temp_dir: Option<tempfile::TempDir>,
    descriptor: Option<ReleaseDescriptor>,
    formula: Option<String>,
}

impl FormulaWorld {
    fn formula(&self) -> &str {
        self.formula.as_deref().expect("formula rendered")
    }
}

#[fixture]
fn world() -> FormulaWorld {
    FormulaWorld::default()
}

#[given("the built-in release")]
fn given_builtin_release(world: &mut FormulaWorld) {
    world.descriptor = Some(speechly_release().expect("built-in release is valid"));
}

#[given("a descriptor file for \"{name}\" with a Linux ARM archive")]
fn given_descriptor_file(world: &mut FormulaWorld, name: String) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp_dir.path().join("release.toml")).expect("UTF-8 path");
    let contents = format!(
        concat!(
            "name = \"{name}\"\n",
            "desc = \"Speechly CLI, edge channel\"\n",
            "version = \"0.3.0\"\n",
            "install = \"speechly\"\n\n",
            "[[platform]]\n",
            "os = \"linux\"\n",
            "cpu = \"arm\"\n",
            "url = \"https://example.test/v0.3.0/speechly_0.3.0_Linux_arm64.tar.gz\"\n",
            "sha256 = \"{sha}\"\n",
        ),
        name = name,
        sha = "c".repeat(64),
    );
    std::fs::write(&path, contents).expect("write descriptor");
    world.descriptor = Some(load_descriptor(&path).expect("valid descriptor"));
    world._temp_dir = Some(temp_dir);
}

#[when("the formula is rendered")]
fn when_formula_rendered(world: &mut FormulaWorld) {
    let descriptor = world.descriptor.as_ref().expect("descriptor set");
    world.formula = Some(render_formula(descriptor));
}

#[then("the formula declares class \"{class}\"")]
fn then_declares_class(world: &mut FormulaWorld, class: String) {
    let expected = format!("class {class} < Formula");
    assert!(
        world.formula().lines().any(|line| line == expected),
        "missing '{expected}' in:\n{}",
        world.formula()
    );
}

#[then("the formula contains the line \"{line}\"")]
fn then_contains_line(world: &mut FormulaWorld, line: String) {
    assert!(
        world.formula().lines().any(|candidate| candidate == line),
        "missing line '{line}' in:\n{}",
        world.formula()
    );
}

#[then("the formula does not contain \"{text}\"")]
fn then_does_not_contain(world: &mut FormulaWorld, text: String) {
    assert!(!world.formula().contains(&text), "found '{text}'");
}

#[then("the formula installs \"{target}\"")]
fn then_installs(world: &mut FormulaWorld, target: String) {
    let expected = format!("  def install\n    bin.install \"{target}\"\n  end\nend\n");
    assert!(world.formula().ends_with(&expected), "{}", world.formula());
}

#[scenario(
    path = "tests/features/formula.feature",
    name = "Built-in release renders the published formula"
)]
fn scenario_builtin_formula(world: FormulaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/formula.feature",
    name = "Descriptor file with an ARM Linux entry"
)]
fn scenario_descriptor_file_formula(world: FormulaWorld) {
    let _ = world;
}
