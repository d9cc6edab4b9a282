use livetpl::test_utils::TestWorkspace;
use predicates::prelude::*;

use super::livetpl;

#[test]
fn test_engines_lists_builtins() {
    let ws = TestWorkspace::new().unwrap();
    livetpl(&ws)
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("handlebars"))
        .stdout(predicate::str::contains("tera"))
        .stdout(predicate::str::contains("html"));
}

#[test]
fn test_init_then_render_starter() {
    let ws = TestWorkspace::new().unwrap();
    livetpl(&ws).arg("init").arg(ws.path()).assert().success();

    livetpl(&ws)
        .arg("render")
        .arg(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, World!"))
        .stdout(predicate::str::contains("<li>Markup</li>"));
}

#[test]
fn test_init_refuses_existing_files() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "<p>mine</p>").unwrap();

    livetpl(&ws)
        .arg("init")
        .arg(ws.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(ws.read("template.html").unwrap(), "<p>mine</p>");
}

#[test]
fn test_render_html_engine_is_identity() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "<p>{{name}} {% raw %}</p>").unwrap();

    livetpl(&ws)
        .args(["render", "--engine", "html"])
        .arg(ws.path())
        .assert()
        .success()
        .stdout("<p>{{name}} {% raw %}</p>\n");
}

#[test]
fn test_render_tera() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "{% for i in items %}[{{ i }}]{% endfor %}").unwrap();
    ws.write("data.json", r#"{"items": [1, 2, 3]}"#).unwrap();

    livetpl(&ws)
        .args(["render", "-e", "tera"])
        .arg(ws.path())
        .assert()
        .success()
        .stdout("[1][2][3]\n");
}

#[test]
fn test_render_compile_error_fails() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "{{#if a}}x{{/each}}").unwrap();

    livetpl(&ws)
        .args(["render", "--engine", "handlebars"])
        .arg(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("handlebars"));
}

#[test]
fn test_render_missing_template_fails() {
    let ws = TestWorkspace::new().unwrap();

    livetpl(&ws)
        .arg("render")
        .arg(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workspace file not found"))
        .stderr(predicate::str::contains("livetpl init"));
}

#[test]
fn test_render_invalid_data_fails() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "{{name}}").unwrap();
    ws.write("data.json", "{invalid json").unwrap();

    livetpl(&ws)
        .arg("render")
        .arg(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sample data"));
}

#[test]
fn test_render_uses_persisted_engine() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "<b>{{name}}</b>").unwrap();
    ws.write_state(&[("engine", "html")]).unwrap();

    livetpl(&ws)
        .arg("render")
        .arg(ws.path())
        .assert()
        .success()
        .stdout("<b>{{name}}</b>\n");
}

#[test]
fn test_render_rejects_unknown_engine() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "x").unwrap();

    livetpl(&ws)
        .args(["render", "--engine", "mustache"])
        .arg(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mustache"));
}

#[test]
fn test_export_output_to_file() {
    let ws = TestWorkspace::new().unwrap();
    livetpl(&ws).arg("init").arg(ws.path()).assert().success();
    let out = ws.path().join("page.html");

    livetpl(&ws).arg("export").arg(ws.path()).arg("-o").arg(&out).assert().success();

    let html = std::fs::read_to_string(out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Hello World</title>"));
    assert!(html.contains("Hello, World!"));
    assert!(!html.contains("rel=\"icon\""));
}

#[test]
fn test_export_template_mode_to_stdout() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "<h1>{{title}}</h1>").unwrap();
    ws.write("data.json", r#"{"settings": {"favicon": "/icon.png"}}"#).unwrap();

    livetpl(&ws)
        .args(["export", "--mode", "template"])
        .arg(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>{{title}}</h1>"))
        .stdout(predicate::str::contains("<link rel=\"icon\" href=\"/icon.png\">"))
        .stdout(predicate::str::contains("<title>Untitled Template</title>"));
}

#[test]
fn test_export_output_falls_back_on_compile_error() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "{{#if a}}x{{/each}}").unwrap();

    livetpl(&ws)
        .args(["export", "--engine", "handlebars"])
        .arg(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("{{#if a}}x{{/each}}"));
}
