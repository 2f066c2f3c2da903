use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rowcast() -> Command {
    #[allow(deprecated)]
    let cmd = Command::cargo_bin("rowcast").unwrap();
    cmd
}

const PEOPLE: &str = r#"[
  {"Name": "Ana", "Age": 30, "Pet": {"Name": "Rex"}},
  {"Name": "Bo", "Age": 5, "Pet": null},
  {"Age": 41, "Name": "Cy, Jr"}
]"#;

#[test]
fn test_encode_json_file_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("people.json");
    fs::write(&input, PEOPLE).unwrap();

    rowcast()
        .arg("encode")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout("Name,Age,Pet.Name\nAna,30,Rex\nBo,5,\n\"Cy, Jr\",41,\n");
}

#[test]
fn test_encode_jsonl_stdin_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.csv");

    rowcast()
        .args(["encode", "--input", "-", "--format", "jsonl", "--no-header"])
        .args(["--delimiter", "tab", "--output"])
        .arg(&output)
        .write_stdin("{\"id\": 1, \"tags\": [\"a\", \"b\"]}\n\n{\"id\": 2, \"tags\": [\"c\"]}\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content, "1\ta\tb\n2\tc\t\n");
}

#[test]
fn test_encode_separator_from_env() {
    rowcast()
        .args(["encode", "--input", "-"])
        .env("ROWCAST_SEPARATOR", "_")
        .write_stdin(r#"{"a": {"b": 1}}"#)
        .assert()
        .success()
        .stdout("a_b\n1\n");
}

#[test]
fn test_encode_options_from_env() {
    rowcast()
        .args(["encode", "--input", "-"])
        .env("ROWCAST_DELIMITER", ";")
        .env("ROWCAST_OMIT_HEADER", "1")
        .write_stdin(r#"[{"a": 1, "b": 2}]"#)
        .assert()
        .success()
        .stdout("1;2\n");
}

#[test]
fn test_encode_flags_override_env() {
    rowcast()
        .args(["encode", "--input", "-", "--delimiter", "tab"])
        .env("ROWCAST_DELIMITER", ";")
        .write_stdin(r#"[{"a": 1, "b": 2}]"#)
        .assert()
        .success()
        .stdout("a\tb\n1\t2\n");
}

#[test]
fn test_encode_first_record_with_mixed_list() {
    rowcast()
        .args(["encode", "--input", "-"])
        .write_stdin(r#"{"pets": [null, {"Name": "Rex"}]}"#)
        .assert()
        .success()
        .stdout("pets[0],pets[1]\n,\"{\"\"Name\"\":\"\"Rex\"\"}\"\n");
}

#[test]
fn test_encode_empty_input_fails() {
    rowcast()
        .args(["encode", "--input", "-", "--format", "jsonl"])
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("EMPTY_SOURCE"));
}

#[test]
fn test_encode_bad_jsonl_reports_line() {
    rowcast()
        .args(["encode", "--input", "-", "--format", "jsonl"])
        .write_stdin("{\"id\": 1}\nnot json\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_encode_rejects_bad_delimiter() {
    rowcast()
        .args(["encode", "--input", "-", "--delimiter", "ab"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid delimiter"));
}

#[test]
fn test_columns_lists_paths() {
    rowcast()
        .args(["columns", "--input", "-"])
        .write_stdin(r#"{"Title": "x", "Tags": ["a", "b"]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tags[1]"))
        .stdout(predicate::str::contains(".1[1]"));
}

#[test]
fn test_columns_json_output() {
    let output = rowcast()
        .args(["columns", "--input", "-", "--json"])
        .write_stdin(r#"{"Name": "Ana", "Pet": {"Name": "Rex"}}"#)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let columns = json.as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1]["name"], "Pet.Name");
    assert_eq!(columns[1]["path"], ".1.0");
}
