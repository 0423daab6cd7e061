use std::{
    fs,
    path::{Path, PathBuf},
};

use readson::batch::{BatchConfig, run};
use tempfile::TempDir;

const PEOPLE: &str = r#"[{"id": "a1", "name": "Ann"}, {"id": "b2", "name": "Bo"}]"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Cannot read {}: {e}", path.display()))
}

fn config(input: &Path, template: &Path) -> BatchConfig {
    BatchConfig { input: input.display().to_string(),
                  template: template.to_path_buf(),
                  ..BatchConfig::default() }
}

#[test]
fn one_document_per_record_next_to_the_source() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "people.v1.json", PEOPLE);
    let template = write(dir.path(), "card.md", "Name: $name$\n");

    let report = run(&config(&input, &template)).unwrap();

    assert_eq!(report.rendered, 2);
    assert_eq!(report.written, vec![dir.path().join("people0.md"), dir.path().join("people1.md")]);
    assert_eq!(read(&dir.path().join("people0.md")), "Name: Ann\n");
    assert_eq!(read(&dir.path().join("people1.md")), "Name: Bo\n");
}

#[test]
fn a_single_object_is_one_record() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "me.json", r#"{"name": "Ann"}"#);
    let template = write(dir.path(), "card.txt", "$name$");

    let report = run(&config(&input, &template)).unwrap();

    assert_eq!(report.written, vec![dir.path().join("me0.txt")]);
    assert_eq!(read(&dir.path().join("me0.txt")), "Ann");
}

#[test]
fn documents_named_after_a_field() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "people.json", PEOPLE);
    let template = write(dir.path(), "card.md", "$name$");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let config = BatchConfig { name_pattern: Some(format!("{}/id", out.display())),
                               ..config(&input, &template) };
    let report = run(&config).unwrap();

    assert_eq!(report.written, vec![out.join("a1.md"), out.join("b2.md")]);
    assert_eq!(read(&out.join("b2.md")), "Bo");
}

#[test]
fn field_names_stay_inside_the_directory() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(),
                      "people.json",
                      r#"[{"id": "../escape", "name": "Ann"}, {"id": "a/b", "name": "Bo"}]"#);
    let template = write(dir.path(), "card.md", "$name$");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let config = BatchConfig { name_pattern: Some(format!("{}/id", out.display())),
                               ..config(&input, &template) };
    let report = run(&config).unwrap();

    assert_eq!(report.written, vec![out.join(".._escape.md"), out.join("a_b.md")]);
    assert!(!dir.path().join("escape.md").exists());
}

#[test]
fn field_values_that_name_no_file_fail() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(),
                      "people.json",
                      r#"[{"id": "..", "name": "Ann"}, {"id": "ok", "name": "Bo"}]"#);
    let template = write(dir.path(), "card.md", "$name$");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let config = BatchConfig { name_pattern: Some(format!("{}/id", out.display())),
                               ..config(&input, &template) };
    assert!(run(&config).is_err());

    let config = BatchConfig { skip_errors: true,
                               ..config };
    let report = run(&config).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.written, vec![out.join("ok.md")]);
}

#[test]
fn single_output_concatenates_in_order() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "people.json", PEOPLE);
    let template = write(dir.path(), "row.csv", "$id$,$name$\n");

    let config = BatchConfig { output: Some(dir.path().join("all")),
                               ..config(&input, &template) };
    let report = run(&config).unwrap();

    assert_eq!(report.rendered, 2);
    assert_eq!(report.written, vec![dir.path().join("all.csv")]);
    assert_eq!(read(&dir.path().join("all.csv")), "a1,Ann\nb2,Bo\n");
}

#[test]
fn input_access_pattern_selects_records() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(),
                      "team.json",
                      r#"{"team": {"people": [{"name": "Ann"}, {"name": "Bo"}, {"name": "Cy"}]}}"#);
    let template = write(dir.path(), "t.txt", "$name$;");

    let config = BatchConfig { input: format!("{}->team->people", input.display()),
                               output: Some(dir.path().join("all")),
                               ..config(&input, &template) };
    run(&config).unwrap();
    assert_eq!(read(&dir.path().join("all.txt")), "Ann;Bo;Cy;");

    let config = BatchConfig { input: format!("{}->team->people[1]", input.display()),
                               ..config };
    run(&config).unwrap();
    assert_eq!(read(&dir.path().join("all.txt")), "Bo;");
}

#[test]
fn directories_and_globs() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write(&data, "b.json", r#"{"name": "Bo"}"#);
    write(&data, "a.json", r#"[{"name": "Ann"}, {"name": "Al"}]"#);
    write(&data, "notes.txt", r#"{"name": "ignored by the glob"}"#);
    let template = write(dir.path(), "t.txt", "$name$ ");
    let output = Some(dir.path().join("all"));

    let by_glob = BatchConfig { input: format!("{}/*.json", data.display()),
                                template: template.clone(),
                                output: output.clone(),
                                ..BatchConfig::default() };
    assert_eq!(run(&by_glob).unwrap().rendered, 3);
    assert_eq!(read(&dir.path().join("all.txt")), "Ann Al Bo ");

    let by_dir = BatchConfig { input: format!("{}/", data.display()),
                               ..by_glob.clone() };
    assert_eq!(run(&by_dir).unwrap().rendered, 4);
    assert_eq!(read(&dir.path().join("all.txt")), "Ann Al Bo ignored by the glob ");

    let one_char = BatchConfig { input: format!("{}/?.json", data.display()),
                                 ..by_glob };
    assert_eq!(run(&one_char).unwrap().rendered, 3);
}

#[test]
fn failing_record_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "people.json", r#"[{"name": "Ann"}, {"nick": "B"}]"#);
    let template = write(dir.path(), "card.md", "$name$");

    let err = run(&config(&input, &template)).unwrap_err();
    assert!(err.to_string().contains("Record 1"), "error was: {err}");
}

#[test]
fn failing_records_can_be_skipped() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(),
                      "people.json",
                      r#"[{"name": "Ann"}, {"nick": "B"}, {"name": "Cy"}]"#);
    let template = write(dir.path(), "card.md", "$name$");

    let config = BatchConfig { skip_errors: true,
                               ..config(&input, &template) };
    let report = run(&config).unwrap();

    assert_eq!(report.rendered, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.written, vec![dir.path().join("people0.md"), dir.path().join("people2.md")]);
    assert!(!dir.path().join("people1.md").exists());
}

#[test]
fn template_macros_are_expanded() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "p.json", r#"{"name": "Ann"}"#);
    let template = write(dir.path(),
                         "t.md",
                         "$$$ greeting Dear\n$greeting$ $name$,\n$$$ greeting Yours\n$greeting$\n");

    run(&config(&input, &template)).unwrap();

    assert_eq!(read(&dir.path().join("p0.md")), "Dear Ann,\nYours\n");
}

#[test]
fn functions_file_is_loaded_once_for_all_records() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "people.json", PEOPLE);
    let template = write(dir.path(), "t.txt", "$shout(name)$ ");
    let functions = write(dir.path(),
                          "f.lua",
                          "calls = 0\nfunction shout(s) calls = calls + 1 return s:upper() .. calls end\n");

    let config = BatchConfig { functions: Some(functions),
                               output: Some(dir.path().join("all")),
                               ..config(&input, &template) };
    run(&config).unwrap();

    assert_eq!(read(&dir.path().join("all.txt")), "ANN1 BO2 ");
}

#[test]
fn setup_errors() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "people.json", PEOPLE);
    let good = write(dir.path(), "good.md", "$name$");
    let bad = write(dir.path(), "bad.md", "$if name$");

    assert!(run(&config(&input, &bad)).is_err());
    assert!(run(&config(&input, &dir.path().join("none.md"))).is_err());
    assert!(run(&config(&dir.path().join("none.json"), &good)).is_err());

    let broken = write(dir.path(), "broken.json", "{ not json");
    assert!(run(&config(&broken, &good)).is_err());

    let missing_pattern = BatchConfig { input: format!("{}->nobody", input.display()),
                                        ..config(&input, &good) };
    assert!(run(&missing_pattern).is_err());

    let bad_script = write(dir.path(), "bad.lua", "function (");
    let with_script = BatchConfig { functions: Some(bad_script),
                                    ..config(&input, &good) };
    assert!(run(&with_script).is_err());
}
