use super::*;
use serde_json::json;

// =============================================================================
// User
// =============================================================================

#[test]
fn user_accepts_numeric_id() {
    let user: User = serde_json::from_value(json!({ "id": 1, "name": "A", "email": "a@b.com" })).unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.created_at, None);
}

#[test]
fn user_accepts_document_id_and_created_at() {
    let user: User = serde_json::from_value(json!({
        "_id": "64f0c2",
        "name": "Ada",
        "email": "ada@example.com",
        "createdAt": "2024-03-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(user.id, "64f0c2");
    assert_eq!(user.created_at.as_deref(), Some("2024-03-01T10:00:00Z"));
}

#[test]
fn user_rejects_boolean_id() {
    let err = serde_json::from_value::<User>(json!({ "id": true, "name": "A", "email": "a@b.com" }));
    assert!(err.is_err());
}

#[test]
fn credentials_debug_redacts_password() {
    let login = LoginRequest { email: "a@b.com".into(), password: "hunter2".into() };
    let rendered = format!("{login:?}");
    assert!(rendered.contains("a@b.com"));
    assert!(!rendered.contains("hunter2"));

    let register = RegisterRequest { name: "A".into(), email: "a@b.com".into(), password: "hunter2".into() };
    assert!(!format!("{register:?}").contains("hunter2"));
}

// =============================================================================
// ErrorBody
// =============================================================================

#[test]
fn error_body_extracts_message() {
    assert_eq!(
        ErrorBody::message_from(r#"{"message":"Email already in use"}"#).as_deref(),
        Some("Email already in use")
    );
}

#[test]
fn error_body_ignores_blank_and_missing_message() {
    assert_eq!(ErrorBody::message_from(r#"{"message":"   "}"#), None);
    assert_eq!(ErrorBody::message_from(r#"{"error":"nope"}"#), None);
    assert_eq!(ErrorBody::message_from("<html>502</html>"), None);
}

// =============================================================================
// Applications
// =============================================================================

#[test]
fn application_status_known_and_unknown_labels() {
    assert_eq!(ApplicationStatus::from("Offer".to_owned()), ApplicationStatus::Offer);
    let other = ApplicationStatus::from("Ghosted".to_owned());
    assert_eq!(other, ApplicationStatus::Other("Ghosted".into()));
    assert_eq!(String::from(other), "Ghosted");
}

#[test]
fn application_deserializes_camel_case_with_defaults() {
    let app: Application = serde_json::from_value(json!({
        "_id": "a1",
        "company": "Acme",
        "jobTitle": "Engineer"
    }))
    .unwrap();
    assert_eq!(app.job_title, "Engineer");
    assert_eq!(app.status, ApplicationStatus::Applied);
    assert_eq!(app.notes, None);
}

#[test]
fn application_input_serializes_camel_case() {
    let input = ApplicationInput::new("Acme", "Engineer", "2024-05-01");
    let value = serde_json::to_value(&input).unwrap();
    assert_eq!(value["jobTitle"], "Engineer");
    assert_eq!(value["applicationDate"], "2024-05-01");
    assert_eq!(value["status"], "Applied");
}

#[test]
fn application_input_from_existing_fills_blanks() {
    let app = Application {
        id: "a1".into(),
        company: "Acme".into(),
        job_title: "Engineer".into(),
        application_date: None,
        status: ApplicationStatus::Interview,
        job_description: None,
        notes: Some("call back".into()),
    };
    let input = ApplicationInput::from(&app);
    assert_eq!(input.application_date, "");
    assert_eq!(input.status, ApplicationStatus::Interview);
    assert_eq!(input.notes, "call back");
}

#[test]
fn stats_missing_stages_default_to_zero() {
    let stats: ApplicationStats = serde_json::from_value(json!({ "applied": 3, "offer": 1 })).unwrap();
    assert_eq!(stats.interview, 0);
    assert_eq!(stats.total(), 4);
}

// =============================================================================
// Resume feedback
// =============================================================================

#[test]
fn match_band_thresholds() {
    assert_eq!(MatchBand::from_score(80.0), MatchBand::Strong);
    assert_eq!(MatchBand::from_score(79.9), MatchBand::Good);
    assert_eq!(MatchBand::from_score(60.0), MatchBand::Good);
    assert_eq!(MatchBand::from_score(40.0), MatchBand::Fair);
    assert_eq!(MatchBand::from_score(39.0), MatchBand::Weak);
}

#[test]
fn resume_feedback_defaults_lists() {
    let fb: ResumeFeedback = serde_json::from_value(json!({ "matchScore": 72 })).unwrap();
    assert!(fb.missing_keywords.is_empty());
    assert_eq!(fb.band(), MatchBand::Good);
}
