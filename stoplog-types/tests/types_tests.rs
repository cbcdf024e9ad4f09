use chrono::NaiveDate;
use stoplog_types::{DeliveryLog, LogId, PaymentConfig, UserId, UserSession};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- LogId ---

#[test]
fn log_id_display_parse_roundtrip() {
    let id = LogId::new();
    let parsed: LogId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn log_id_parse_rejects_garbage() {
    let result = "not-a-uuid".parse::<LogId>();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("invalid log id"));
}

#[test]
fn log_ids_are_unique() {
    assert_ne!(LogId::new(), LogId::new());
}

#[test]
fn log_id_serde_is_transparent() {
    let id = LogId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
}

// --- UserId ---

#[test]
fn user_id_from_str_and_display() {
    let uid = UserId::from("driver-8842");
    assert_eq!(uid.as_str(), "driver-8842");
    assert_eq!(uid.to_string(), "driver-8842");
}

#[test]
fn user_id_accepts_non_uuid_subjects() {
    let uid = UserId::new("auth0|64f1c2");
    assert_eq!(uid.as_str(), "auth0|64f1c2");
}

// --- DeliveryLog ---

#[test]
fn new_log_has_zero_adjustments() {
    let log = DeliveryLog::new(date(2026, 3, 7), 95);
    assert_eq!(log.stops, 95);
    assert_eq!(log.extra, 0.0);
    assert_eq!(log.total, 0.0);
    assert!(log.notes.is_none());
}

#[test]
fn builders_set_extra_and_notes() {
    let log = DeliveryLog::new(date(2026, 3, 7), 95)
        .with_extra(12.5)
        .with_notes("van swap");
    assert_eq!(log.extra, 12.5);
    assert_eq!(log.notes.as_deref(), Some("van swap"));
}

#[test]
fn log_serializes_date_as_iso8601() {
    let log = DeliveryLog::new(date(2026, 3, 7), 95);
    let value = serde_json::to_value(&log).unwrap();
    assert_eq!(value["date"], "2026-03-07");
    assert_eq!(value["stops"], 95);
}

#[test]
fn log_deserializes_with_missing_optional_fields() {
    let json = format!(
        r#"{{"id":"{}","date":"2026-03-07","stops":40}}"#,
        LogId::new()
    );
    let log: DeliveryLog = serde_json::from_str(&json).unwrap();
    assert_eq!(log.stops, 40);
    assert_eq!(log.extra, 0.0);
    assert_eq!(log.total, 0.0);
    assert!(log.notes.is_none());
}

#[test]
fn log_json_roundtrip() {
    let log = DeliveryLog::new(date(2026, 11, 30), 130)
        .with_extra(5.0)
        .with_notes("holiday surge");
    let json = serde_json::to_string(&log).unwrap();
    let back: DeliveryLog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, log);
}

// --- PaymentConfig ---

#[test]
fn default_rate_schedule() {
    let config = PaymentConfig::default();
    assert_eq!(config.cutoff_point, 110);
    assert_eq!(config.rate_before_cutoff, 1.98);
    assert_eq!(config.rate_after_cutoff, 1.48);
}

#[test]
fn config_json_roundtrip() {
    let config = PaymentConfig {
        cutoff_point: 80,
        rate_before_cutoff: 2.10,
        rate_after_cutoff: 1.25,
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: PaymentConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

// --- UserSession ---

#[test]
fn authenticated_session_is_not_guest() {
    let session = UserSession::authenticated("driver-8842");
    assert_eq!(session.user_id.as_str(), "driver-8842");
    assert!(!session.is_guest);
}

#[test]
fn guest_session_is_guest() {
    let session = UserSession::guest("local-device");
    assert!(session.is_guest);
}
