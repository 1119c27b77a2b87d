use std::path::PathBuf;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ckpass_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn empty_object_yields_defaults() {
    let cfg = PassConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PassConfig::default());
    assert_eq!(cfg.capture_scale, 2.0);
    assert_eq!(cfg.date_format, "%-m/%-d/%Y");
    assert!(cfg.load_system_fonts);
    assert!(cfg.assets_dir.is_none());
}

#[test]
fn partial_config_overrides_fields() {
    let json = r#"{ "capture_scale": 3.0, "date_format": "%Y-%m-%d", "load_system_fonts": false }"#;
    let cfg = PassConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.capture_scale, 3.0);
    assert_eq!(cfg.date_format, "%Y-%m-%d");
    assert!(!cfg.load_system_fonts);
    assert_eq!(cfg.advisory_text, DEFAULT_ADVISORY);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PassConfig::from_reader(r#"{ "card_width": 500 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PassError::Validation(_)));
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{ "capture_scale": 0.0 }"#,
        r#"{ "capture_scale": -1.0 }"#,
        r#"{ "capture_scale": 9.0 }"#,
        r#"{ "date_format": "%Q" }"#,
        r#"{ "advisory_text": "   " }"#,
    ] {
        let err = PassConfig::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PassError::Validation(_)), "{json}");
    }
}

#[test]
fn from_path_resolves_relative_assets_dir() {
    let dir = temp_dir("config_rel");
    let path = dir.join("ckpass.json");
    std::fs::write(&path, r#"{ "assets_dir": "logos" }"#).unwrap();

    let cfg = PassConfig::from_path(&path).unwrap();
    assert_eq!(cfg.assets_dir, Some(dir.join("logos")));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn from_path_reports_missing_file() {
    let err = PassConfig::from_path("/definitely/not/here/ckpass.json").unwrap_err();
    assert!(err.to_string().contains("open config JSON"));
}

#[test]
fn pretty_json_round_trips() {
    let cfg = PassConfig {
        capture_scale: 1.5,
        ..PassConfig::default()
    };
    let text = cfg.to_json_pretty().unwrap();
    assert_eq!(PassConfig::from_reader(text.as_bytes()).unwrap(), cfg);
}
