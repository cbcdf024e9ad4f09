use stoplog_sync::error::SyncError;

#[test]
fn error_display_transient() {
    let err = SyncError::Transient("connection reset".to_string());
    assert_eq!(err.to_string(), "transient network failure: connection reset");
}

#[test]
fn error_display_not_found() {
    let err = SyncError::NotFound;
    assert_eq!(err.to_string(), "remote document not found");
}

#[test]
fn error_display_persistence() {
    let err = SyncError::Persistence("write rejected".to_string());
    assert_eq!(err.to_string(), "persistence failure: write rejected");
}

#[test]
fn error_display_session_absent() {
    let err = SyncError::SessionAbsent;
    assert_eq!(err.to_string(), "no authenticated session");
}

#[test]
fn is_retryable_true_only_for_transient() {
    assert!(SyncError::Transient("timeout".to_string()).is_retryable());
    assert!(!SyncError::NotFound.is_retryable());
    assert!(!SyncError::Persistence("bad".to_string()).is_retryable());
    assert!(!SyncError::SessionAbsent.is_retryable());
}

#[test]
fn is_not_found_true_only_for_not_found() {
    assert!(SyncError::NotFound.is_not_found());
    assert!(!SyncError::Transient("timeout".to_string()).is_not_found());
    assert!(!SyncError::Persistence("bad".to_string()).is_not_found());
    assert!(!SyncError::SessionAbsent.is_not_found());
}
