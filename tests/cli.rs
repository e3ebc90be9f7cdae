use assert_cmd::Command;
use std::io::Write;

fn script(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("should create a temp file");
    file.write_all(source.as_bytes()).expect("should write source to the temp file");
    file
}

#[test]
fn running_a_valid_program_exits_zero_and_prints_to_stdout() {
    let file = script("print 1 + 1;");

    Command::cargo_bin("ember")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn a_parse_error_exits_65_and_reports_to_stderr() {
    let file = script("1 +;");

    Command::cargo_bin("ember")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(65)
        .stdout("");
}

#[test]
fn a_runtime_error_exits_70() {
    let file = script("print 1 + \"x\";");

    Command::cargo_bin("ember")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(70);
}

#[test]
fn wrong_number_of_cli_arguments_exits_64() {
    Command::cargo_bin("ember")
        .unwrap()
        .arg("one")
        .arg("two")
        .assert()
        .code(64);
}

#[test]
fn a_missing_script_file_exits_64() {
    Command::cargo_bin("ember")
        .unwrap()
        .arg("/no/such/file.ember")
        .assert()
        .code(64);
}
