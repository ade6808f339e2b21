//! Wire DTOs for the job-tracker API.
//!
//! DESIGN
//! ======
//! Field names mirror the API's camelCase JSON. Record ids arrive either as
//! `id` or as a document-store `_id`, and either as strings or integers; both
//! are normalized to `String`.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// AUTH
// =============================================================================

/// Resolved user identity returned by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Account creation timestamp as sent by the API (ISO-8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Profile record from `/api/profile`; same shape as the auth identity.
pub type Profile = User;

/// Body for `POST /api/auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Success payload of register and login.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Failure payload shape `{ "message": "..." }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract a non-blank message from a raw response body, if any.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// APPLICATIONS
// =============================================================================

/// Pipeline stage of a job application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
    /// Any label the API sends that this client does not know.
    Other(String),
}

impl ApplicationStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Applied" => Self::Applied,
            "Interview" => Self::Interview,
            "Offer" => Self::Offer,
            "Rejected" => Self::Rejected,
            _ => Self::Other(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked job application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub company: String,
    pub job_title: String,
    #[serde(default)]
    pub application_date: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body for creating or replacing an application.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub company: String,
    pub job_title: String,
    /// `YYYY-MM-DD`.
    pub application_date: String,
    pub status: ApplicationStatus,
    pub job_description: String,
    pub notes: String,
}

impl ApplicationInput {
    /// New application in the `Applied` stage with empty description and notes.
    #[must_use]
    pub fn new(company: impl Into<String>, job_title: impl Into<String>, application_date: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            job_title: job_title.into(),
            application_date: application_date.into(),
            status: ApplicationStatus::Applied,
            job_description: String::new(),
            notes: String::new(),
        }
    }
}

impl From<&Application> for ApplicationInput {
    fn from(app: &Application) -> Self {
        Self {
            company: app.company.clone(),
            job_title: app.job_title.clone(),
            application_date: app.application_date.clone().unwrap_or_default(),
            status: app.status.clone(),
            job_description: app.job_description.clone().unwrap_or_default(),
            notes: app.notes.clone().unwrap_or_default(),
        }
    }
}

/// Per-stage counts from `/api/applications/stats`. Missing stages count as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationStats {
    pub applied: u64,
    pub interview: u64,
    pub offer: u64,
    pub rejected: u64,
}

impl ApplicationStats {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.applied + self.interview + self.offer + self.rejected
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Body for `PUT /api/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

// =============================================================================
// RESUME FEEDBACK
// =============================================================================

/// Body for the text variant of `POST /api/resume-feedback`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedbackRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// AI feedback comparing a resume against a job description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedback {
    /// Percentage match, 0–100.
    pub match_score: f64,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Coarse classification of a match score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchBand {
    Strong,
    Good,
    Fair,
    Weak,
}

impl MatchBand {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Strong
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Weak
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Weak => "weak",
        }
    }
}

impl ResumeFeedback {
    #[must_use]
    pub fn band(&self) -> MatchBand {
        MatchBand::from_score(self.match_score)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int.to_string());
            }
            if let Some(uint) = number.as_u64() {
                return Ok(uint.to_string());
            }
            Err(D::Error::custom("expected integer id"))
        }
        _ => Err(D::Error::custom("expected string or integer id")),
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
