#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use configdict::{ConfigDictError, Document, Options};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn configdict_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("configdict").unwrap()
}

const WIDGETS: &str = r"
# Sample configuration
[DEFAULT]

in stock = yes

[widgets]

price = 110.00
size = large
description = %(size)s widgets

options = this \
        that \
        and \
        the other thing

[small widgets]
__parent__ = widgets
size = small
";

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
	let path = dir.join("sample.ini");
	fs::write(&path, content).unwrap();
	path
}

// ============================================================================
// Library tests
// ============================================================================

#[test]
fn test_default_section_and_own_values() {
	let doc: Document = "[DEFAULT]\nin_stock = yes\n\n[widgets]\nprice = 110.00".parse().unwrap();
	let widgets = doc.section("widgets").unwrap();
	assert_eq!(widgets.get("in_stock").unwrap(), Some("yes".to_string()));
	assert_eq!(widgets.get("price").unwrap(), Some("110.00".to_string()));
}

#[test]
fn test_interpolation() {
	let doc: Document = "[widgets]\nsize = large\ndescription = %(size)s widgets"
		.parse()
		.unwrap();
	assert_eq!(
		doc.get("widgets", "description").unwrap(),
		Some("large widgets".to_string())
	);
}

#[test]
fn test_keyerror_modes() {
	let source = "[widgets]\nsize = large\n";

	let strict = Options::new().keyerror(true).parse_str(source).unwrap();
	assert!(matches!(
		strict.get("widgets", "color"),
		Err(ConfigDictError::MissingKey { .. })
	));

	let lenient = Options::new().keyerror(false).parse_str(source).unwrap();
	assert_eq!(lenient.get("widgets", "color").unwrap(), None);
}

#[test]
fn test_parent_inherits_interpolation_and_defaults() {
	let doc: Document = WIDGETS.parse().unwrap();
	let small = doc.section("small widgets").unwrap();

	// description comes from the parent but interpolates against this section
	assert_eq!(
		small.get("description").unwrap(),
		Some("small widgets".to_string())
	);
	assert_eq!(small.get("price").unwrap(), Some("110.00".to_string()));
	assert_eq!(small.get("In Stock").unwrap(), Some("yes".to_string()));
}

#[test]
fn test_caller_defaults_and_value_transforms() {
	let doc = Options::new()
		.default_value("currency", "USD")
		.value_transform("price", |v| format!("{} %", v))
		.value_transform_with("color", |v| Some(v.unwrap_or_else(|| "unpainted".to_string())))
		.parse_str(WIDGETS)
		.unwrap();
	let widgets = doc.section("widgets").unwrap();
	assert_eq!(widgets.get("currency").unwrap(), Some("USD".to_string()));
	assert_eq!(widgets.get("price").unwrap(), Some("110.00 %".to_string()));
	assert_eq!(widgets.get("color").unwrap(), Some("unpainted".to_string()));
}

#[test]
fn test_parse_file_and_round_trip() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	let doc = Document::from_file(&path).unwrap();
	let reparsed: Document = doc.to_ini_string().parse().unwrap();

	let names: Vec<_> = doc.section_names().collect();
	let renames: Vec<_> = reparsed.section_names().collect();
	assert_eq!(names, renames);

	for name in names {
		assert_eq!(
			doc.section(name).unwrap().resolved().unwrap(),
			reparsed.section(name).unwrap().resolved().unwrap()
		);
	}
}

#[test]
fn test_cycles_are_errors() {
	let doc: Document = "[a]\n__parent__ = b\n[b]\n__parent__ = a\n[c]\nx = %(y)s\ny = %(x)s\n"
		.parse()
		.unwrap();
	assert!(matches!(
		doc.get("a", "anything"),
		Err(ConfigDictError::CyclicReference { .. })
	));
	assert!(matches!(
		doc.get("c", "x"),
		Err(ConfigDictError::CyclicReference { .. })
	));
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	configdict_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Parse INI-style configuration files"));
}

#[test]
fn test_version_flag() {
	configdict_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("configdict"));
}

#[test]
fn test_no_args_shows_help() {
	configdict_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// get subcommand tests
// ============================================================================

#[test]
fn test_get_resolves_value() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("get")
		.arg(&path)
		.args(["widgets", "description"])
		.assert()
		.success()
		.stdout("large widgets\n");
}

#[test]
fn test_get_falls_back_to_default_section() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("get")
		.arg(&path)
		.args(["small widgets", "IN STOCK"])
		.assert()
		.success()
		.stdout("yes\n");
}

#[test]
fn test_get_caller_default() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("get")
		.arg(&path)
		.args(["widgets", "currency", "-D", "currency=EUR"])
		.assert()
		.success()
		.stdout("EUR\n");
}

#[test]
fn test_get_missing_key_prints_nothing() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("get")
		.arg(&path)
		.args(["widgets", "color"])
		.assert()
		.failure()
		.stdout("");
}

#[test]
fn test_get_missing_key_strict() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("get")
		.arg(&path)
		.args(["widgets", "color", "--strict"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("missing key 'color'"));
}

#[test]
fn test_get_invalid_default_argument() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("get")
		.arg(&path)
		.args(["widgets", "size", "-D", "novalue"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("KEY=VALUE"));
}

// ============================================================================
// show / fmt subcommand tests
// ============================================================================

#[test]
fn test_show_prints_stored_structure() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.arg("show")
		.arg(&path)
		.assert()
		.success()
		.stdout(predicate::str::contains("[widgets]"))
		.stdout(predicate::str::is_match(r#"options = ["']this that and the other thing["']"#).unwrap())
		.stdout(predicate::str::contains("%(size)s widgets"));
}

#[test]
fn test_show_resolved() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	configdict_cmd()
		.args(["show", "--resolved"])
		.arg(&path)
		.assert()
		.success()
		.stdout(predicate::str::is_match(r#"description = ["']large widgets["']"#).unwrap())
		.stdout(predicate::str::is_match("description = .small widgets").unwrap().not());
}

#[test]
fn test_fmt_round_trips() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), WIDGETS);

	let output = configdict_cmd().arg("fmt").arg(&path).output().unwrap();
	assert!(output.status.success());

	let text = String::from_utf8(output.stdout).unwrap();
	assert!(text.starts_with("[DEFAULT]\nin stock = yes\n\n[widgets]\n"));
	assert!(!text.contains('#'));

	let formatted_path = temp_dir.path().join("formatted.ini");
	fs::write(&formatted_path, &text).unwrap();
	configdict_cmd()
		.arg("fmt")
		.arg(&formatted_path)
		.assert()
		.success()
		.stdout(predicate::str::diff(text));
}

#[test]
fn test_syntax_error_reported() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_config(temp_dir.path(), "[widgets]\nsize = large\nthis is not valid\n");

	configdict_cmd()
		.arg("fmt")
		.arg(&path)
		.assert()
		.failure()
		.stderr(predicate::str::contains("cannot parse line 3: this is not valid"));
}

#[test]
fn test_missing_file_reported() {
	configdict_cmd()
		.args(["fmt", "/nonexistent/config.ini"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to load"));
}
