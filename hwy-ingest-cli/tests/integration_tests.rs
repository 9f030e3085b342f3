//! Drives the built `hwy-ingest` binary against on-disk fixture trees via
//! `assert_cmd`, exercising the process boundary (argument parsing, exit
//! codes, stdout format) rather than calling library functions directly.

use assert_cmd::Command;
use std::fs;
use std::path::Path;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn build_clean_tree(root: &Path) {
    write(&root.join("continents.csv"), "code;name\nNA;North America\n");
    write(&root.join("countries.csv"), "code;name\nUSA;United States\n");
    write(
        &root.join("regions.csv"),
        "code;name;country;continent;regiontype\nCA;California;USA;NA;state\n",
    );
    write(
        &root.join("systems.csv"),
        "system;country;fullname;color;tier;level\nusaca;USA;California;red;1;active\n",
    );
    write(
        &root.join("hwy_data/_systems/usaca.csv"),
        "system;region;route;banner;abbrev;city;root;altroutenames\nusaca;CA;SR;;;Anywhere;ca.sr001;\n",
    );
    write(
        &root.join("hwy_data/_systems/usaca_con.csv"),
        "system;route;banner;groupname;roots\nusaca;SR;;Anywhere;ca.sr001\n",
    );
    write(
        &root.join("hwy_data/CA/usaca/ca.sr001.wpt"),
        "A http://osm.org/?lat=34&lon=-118\nB http://osm.org/?lat=34.2&lon=-118\n",
    );
}

#[test]
fn clean_tree_exits_successfully_and_reports_no_errors() {
    let dir = tempfile::tempdir().unwrap();
    build_clean_tree(dir.path());

    let mut cmd = Command::cargo_bin("hwy-ingest").unwrap();
    let assert = cmd.arg(dir.path()).assert();
    assert
        .success()
        .stdout(predicates::str::contains("no config errors"))
        .stdout(predicates::str::contains("1 system(s) ingested"));
}

#[test]
fn json_format_emits_parseable_summary() {
    let dir = tempfile::tempdir().unwrap();
    build_clean_tree(dir.path());

    let mut cmd = Command::cargo_bin("hwy-ingest").unwrap();
    let output = cmd.arg(dir.path()).arg("--format").arg("json").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["systems"], 1);
    assert_eq!(parsed["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn missing_data_root_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("hwy-ingest").unwrap();
    let assert = cmd.arg(dir.path()).assert();
    assert.failure();
}

#[test]
fn missing_positional_argument_exits_nonzero() {
    let mut cmd = Command::cargo_bin("hwy-ingest").unwrap();
    cmd.assert().failure();
}
