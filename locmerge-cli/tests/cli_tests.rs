use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn locmerge_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("locmerge"))
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

const MAIN_CATALOG: &str = r#"{
  "copyright": ["generated"],
  "version": "1.0.0.0",
  "contents": {
    "vs/base/common/errors": { "stackTrace.format": "{0}: {1}" }
  }
}"#;

#[test]
fn test_merge_writes_output_catalog() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    write(&repo, "src/sql/parts/grid.i18n.json", r#"{"copy": "Copy"}"#);
    write(&repo, "top.i18n.json", r#"{"ignored": "yes"}"#);
    let pack = dir.path().join("pack");
    write(&pack, "translations/main.i18n.json", MAIN_CATALOG);

    let output = locmerge_cmd()
        .args(["--resource-dir"])
        .arg(&repo)
        .arg("--langpack-dir")
        .arg(&pack)
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let text = fs::read_to_string(pack.join("translations/main.i18n.json.output")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["contents"]["sql/parts/grid"]["copy"], "Copy");
    assert!(json["contents"].get("top").is_none());
    // the master itself is untouched
    assert_eq!(
        fs::read_to_string(pack.join("translations/main.i18n.json")).unwrap(),
        MAIN_CATALOG
    );
}

#[test]
fn test_pathmap_action_writes_mapping_file() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    write(&repo, "src/sql/old/widget.i18n.json", r#"{"k": "v"}"#);
    let source = dir.path().join("code").join("sql");
    write(&source, "new/widget.ts", "export {}");
    let mapping = dir.path().join("mapping.json");

    let output = locmerge_cmd()
        .args(["--action", "pathmap", "--resource-dir"])
        .arg(&repo)
        .arg("--source-dir")
        .arg(&source)
        .arg("--path-mapping")
        .arg(&mapping)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&mapping).unwrap()).unwrap();
    assert_eq!(json["mappings"][0]["from"], "sql/old/widget");
    assert_eq!(json["mappings"][0]["to"], "sql/new/widget");
}

#[test]
fn test_convert_action_writes_one_file_per_group() {
    let dir = TempDir::new().unwrap();
    let drops = dir.path().join("drops");
    write(
        &drops,
        "src/fr/agent.xlf",
        r#"<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file original="extensions/agent/package" source-language="en" target-language="fr">
    <body>
      <trans-unit id="title"><source>Jobs</source><target>Travaux</target></trans-unit>
    </body>
  </file>
</xliff>"#,
    );
    let out = dir.path().join("out");

    let output = locmerge_cmd()
        .args(["--action", "convert", "--resource-dir"])
        .arg(&drops)
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("package.i18n.json")).unwrap()).unwrap();
    assert_eq!(json["version"], "1.0.0.0");
    assert_eq!(
        json["contents"]["extensions/agent/package"]["title"],
        "Travaux"
    );
}

#[test]
fn test_missing_inputs_exit_with_usage_code() {
    let output = locmerge_cmd()
        .args(["--action", "convert"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_action_is_rejected() {
    let output = locmerge_cmd()
        .args(["--action", "explode"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown mode"));
}

#[test]
fn test_missing_master_catalog_is_a_run_failure() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    write(&repo, "src/sql/a.i18n.json", r#"{"k": "v"}"#);

    let output = locmerge_cmd()
        .arg("--resource-dir")
        .arg(&repo)
        .arg("--langpack-dir")
        .arg(dir.path().join("missing"))
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));
}
