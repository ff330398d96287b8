// tests/error_handling.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use installer_shim::config::load_and_validate;
use installer_shim::errors::ShimError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_parsed() {
    let file = config_file(
        r#"
prompts = ["Hostname?", "Username?"]

[server]
bind = "0.0.0.0:9000"
index_page = "static/index.html"

[installer]
program = "./install.sh"
line_delay = "250ms"
error_marker = "FATAL"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.prompts, vec!["Hostname?", "Username?"]);
    assert_eq!(cfg.server.bind.port(), 9000);
    assert_eq!(cfg.server.index_page.to_str(), Some("static/index.html"));
    assert_eq!(cfg.installer.program.to_str(), Some("./install.sh"));
    assert_eq!(cfg.installer.line_delay, Duration::from_millis(250));
    assert_eq!(cfg.installer.error_marker, "FATAL");
}

#[test]
fn empty_file_uses_defaults() {
    let file = config_file("");

    let cfg = load_and_validate(file.path()).unwrap();

    assert!(cfg.prompts.is_empty());
    assert_eq!(cfg.server.bind.to_string(), "127.0.0.1:8000");
    assert_eq!(cfg.installer.program.to_str(), Some("./zi.sh"));
    assert_eq!(cfg.installer.line_delay, Duration::from_millis(100));
}

#[test]
fn invalid_bind_address_returns_config_error() {
    let file = config_file(
        r#"
[server]
bind = "localhost"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShimError::ConfigError(msg)) => {
            assert!(msg.contains("invalid bind address"));
            assert!(msg.contains("localhost"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn invalid_line_delay_returns_config_error() {
    let file = config_file(
        r#"
[installer]
line_delay = "fast"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShimError::ConfigError(msg)) => assert!(msg.contains("line_delay")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_keys_are_toml_errors() {
    let file = config_file(
        r#"
[installer]
programme = "./zi.sh"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShimError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_file_is_io_error() {
    match load_and_validate("/definitely/not/here/installer-shim.toml") {
        Err(ShimError::IoError(_)) => {}
        Err(e) => panic!("Expected IoError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
