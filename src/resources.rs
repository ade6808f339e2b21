//! Authenticated resource calls: applications, profile, resume feedback.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call reads the session token immediately before building its
//! request. With no token the call fails with [`ApiError::NotAuthenticated`]
//! and nothing is sent.

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};

use crate::error::ApiError;
use crate::net::api::HttpApi;
use crate::net::types::{
    Application, ApplicationInput, ApplicationStats, Profile, ProfileUpdate, ResumeFeedback, ResumeFeedbackRequest,
};
use crate::session::SessionManager;
use crate::shell::{Notice, Notifier};

pub const APPLICATIONS_PATH: &str = "/api/applications";
pub const APPLICATION_STATS_PATH: &str = "/api/applications/stats";
pub const PROFILE_PATH: &str = "/api/profile";
pub const RESUME_FEEDBACK_PATH: &str = "/api/resume-feedback";
pub const RESUME_UPLOAD_PATH: &str = "/api/resume-feedback/upload";

pub const ACCOUNT_DELETED: &str = "Account deleted successfully";
pub const RESUME_TEXT_REQUIRED: &str = "Please enter your resume text or upload a file.";
pub const RESUME_FILE_UNSUPPORTED: &str = "Please upload a PDF or Word document.";

fn application_path(id: &str) -> String {
    format!("{APPLICATIONS_PATH}/{id}")
}

/// Map a resume file name to its upload MIME type. Only PDF and Word are accepted.
#[must_use]
pub fn resume_mime_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}

pub struct ResourceClient {
    http: Arc<HttpApi>,
    session: Arc<SessionManager>,
    notifier: Arc<dyn Notifier>,
}

impl ResourceClient {
    #[must_use]
    pub fn new(http: Arc<HttpApi>, session: Arc<SessionManager>, notifier: Arc<dyn Notifier>) -> Self {
        Self { http, session, notifier }
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::NotAuthenticated)?;
        Ok(self.http.request(method, path, Some(&token)))
    }

    // =========================================================================
    // APPLICATIONS
    // =========================================================================

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.authorized(Method::GET, APPLICATIONS_PATH)?;
        self.http.send_json(request).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn application_stats(&self) -> Result<ApplicationStats, ApiError> {
        let request = self.authorized(Method::GET, APPLICATION_STATS_PATH)?;
        self.http.send_json(request).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn create_application(&self, input: &ApplicationInput) -> Result<Application, ApiError> {
        let request = self.authorized(Method::POST, APPLICATIONS_PATH)?.json(input);
        let created: Application = self.http.send_json(request).await?;
        tracing::info!(application_id = %created.id, "application created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn update_application(&self, id: &str, input: &ApplicationInput) -> Result<Application, ApiError> {
        let request = self.authorized(Method::PUT, &application_path(id))?.json(input);
        self.http.send_json(request).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn delete_application(&self, id: &str) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, &application_path(id))?;
        self.http.send_empty(request).await?;
        tracing::info!(application_id = %id, "application deleted");
        Ok(())
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let request = self.authorized(Method::GET, PROFILE_PATH)?;
        self.http.send_json(request).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let request = self.authorized(Method::PUT, PROFILE_PATH)?.json(update);
        self.http.send_json(request).await
    }

    /// Delete the account, then sign out locally.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when signed out or when the request fails; the
    /// session is left intact on failure.
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, PROFILE_PATH)?;
        self.http.send_empty(request).await?;
        self.notifier.notify(Notice::success(ACCOUNT_DELETED));
        self.session.logout();
        Ok(())
    }

    // =========================================================================
    // RESUME FEEDBACK
    // =========================================================================

    /// Feedback on pasted resume text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for blank resume text without sending,
    /// otherwise any request failure.
    pub async fn resume_feedback(&self, resume_text: &str, job_description: &str) -> Result<ResumeFeedback, ApiError> {
        if resume_text.trim().is_empty() {
            return Err(ApiError::InvalidInput(RESUME_TEXT_REQUIRED.to_owned()));
        }
        let body = ResumeFeedbackRequest {
            resume_text: resume_text.to_owned(),
            job_description: job_description.to_owned(),
        };
        let request = self.authorized(Method::POST, RESUME_FEEDBACK_PATH)?.json(&body);
        self.http.send_json(request).await
    }

    /// Feedback on an uploaded PDF or Word resume.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for unsupported file types without
    /// sending, otherwise any read or request failure.
    pub async fn resume_feedback_upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        job_description: &str,
    ) -> Result<ResumeFeedback, ApiError> {
        let mime = resume_mime_type(file_name).ok_or_else(|| ApiError::InvalidInput(RESUME_FILE_UNSUPPORTED.to_owned()))?;
        let part = Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str(mime)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let form = Form::new().part("resume", part).text("jobDescription", job_description.to_owned());
        let request = self.authorized(Method::POST, RESUME_UPLOAD_PATH)?.multipart(form);
        self.http.send_json(request).await
    }

    /// Read `path` and upload it via [`ResourceClient::resume_feedback_upload`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if the file cannot be read or is not
    /// PDF/Word, otherwise any request failure.
    pub async fn resume_feedback_file(&self, path: &Path, job_description: &str) -> Result<ResumeFeedback, ApiError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidInput(RESUME_FILE_UNSUPPORTED.to_owned()))?
            .to_owned();
        if resume_mime_type(&file_name).is_none() {
            return Err(ApiError::InvalidInput(RESUME_FILE_UNSUPPORTED.to_owned()));
        }
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
        self.resume_feedback_upload(&file_name, contents, job_description).await
    }
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
