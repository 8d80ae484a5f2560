use crate::*;

// ========== Config ==========

#[test]
fn test_default_config() {
    let c = CodecConfig::default();
    assert_eq!(c.mode, Mode::Local);
    assert_eq!(c.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(c.min_compact_bytes, 512);
}

#[test]
fn test_config_from_json_partial() {
    let c = CodecConfig::from_json(r#"{"mode":"global"}"#).unwrap();
    assert_eq!(c.mode, Mode::Global);
    assert_eq!(c.max_depth, DEFAULT_MAX_DEPTH);
}

#[test]
fn test_config_from_json_full() {
    let c = CodecConfig::from_json(r#"{"mode":"local","max_depth":8,"min_compact_bytes":0}"#).unwrap();
    assert_eq!(c, CodecConfig::new(Mode::Local).with_max_depth(8).with_min_compact_bytes(0));
}

#[test]
fn test_config_rejects_zero_depth() {
    let err = CodecConfig::from_json(r#"{"max_depth":0}"#).unwrap_err();
    assert!(matches!(err, CodecError::InvalidConfig(_)));
}

#[test]
fn test_config_rejects_unknown_mode() {
    let err = CodecConfig::from_json(r#"{"mode":"zip"}"#).unwrap_err();
    assert!(matches!(err, CodecError::Serialization(_)));
}

#[test]
fn test_config_serde_roundtrip() {
    let c = CodecConfig::new(Mode::Global).with_max_depth(32);
    let json = serde_json::to_string(&c).unwrap();
    assert!(json.contains("\"global\""));
    let back: CodecConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn test_mode_display() {
    assert_eq!(Mode::Global.to_string(), "global");
    assert_eq!(Mode::Local.to_string(), "local");
}

// ========== Errors ==========

#[test]
fn test_unknown_id_is_malformed() {
    let err = CodecError::unknown_id("7");
    assert!(err.is_malformed());
    assert_eq!(err.to_string(), "Malformed compact node: id 7 has no entry");
}

#[test]
fn test_missing_field_message() {
    let err = CodecError::missing("descriptor");
    assert_eq!(err.to_string(), "Malformed compact node: missing `descriptor` field");
}

#[test]
fn test_depth_not_malformed() {
    let err = CodecError::DepthExceeded { limit: 4 };
    assert!(!err.is_malformed());
    assert!(err.to_string().contains("4"));
}
