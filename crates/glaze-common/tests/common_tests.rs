//! Integration tests for warnings and settings.

use glaze_common::warning::{clear_warnings, recorded_warnings, warn_once};
use glaze_common::{Settings, SettingsError};

#[test]
fn test_warnings_are_recorded_in_order() {
    clear_warnings();
    warn_once("CSS", "first");
    warn_once("color", "second");
    warn_once("CSS", "first");
    assert_eq!(
        recorded_warnings(),
        vec![
            "[CSS] first".to_string(),
            "[color] second".to_string(),
            "[CSS] first".to_string()
        ]
    );
    clear_warnings();
    assert!(recorded_warnings().is_empty());
}

#[test]
fn test_settings_default() {
    let settings = Settings::default();
    assert_eq!(settings.dpi, 96.0);
    assert_eq!(settings.font_size, 16.0);
}

#[test]
fn test_settings_partial_json_keeps_defaults() {
    let settings = Settings::from_json(r#"{ "dpi": 144 }"#).unwrap();
    assert_eq!(settings.dpi, 144.0);
    assert_eq!(settings.font_size, 16.0);
}

#[test]
fn test_settings_rejects_non_positive_dpi() {
    let err = Settings::from_json(r#"{ "dpi": 0 }"#).unwrap_err();
    assert!(matches!(err, SettingsError::NotPositive { name: "dpi", .. }));
}

#[test]
fn test_settings_rejects_malformed_json() {
    assert!(matches!(
        Settings::from_json("{ dpi: "),
        Err(SettingsError::Json(_))
    ));
}
