//! Contact form validation and the submission sink.
//!
//! The same [`ContactForm`] arrives either as JSON (pages with `fetch`) or as
//! a plain form post; field names are identical in both (`photoReference` is
//! camelCase). There is no mail delivery: an accepted submission is logged
//! through `tracing` and, when `contact.log_file` is set, appended to that
//! file as one JSON object per line.

use crate::i18n;
use crate::types::Locale;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};
use thiserror::Error;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Why a submission was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name, email, and message are required")]
    MissingFields,
    #[error("Invalid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// Message for a re-rendered contact page.
    pub fn localized(self, locale: Locale) -> &'static str {
        let key = match self {
            ValidationError::MissingFields => "errors.contact.required",
            ValidationError::InvalidEmail => "errors.contact.invalid_email",
        };
        i18n::t(locale, key)
    }
}

#[derive(Error, Debug)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Submission task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Fields posted by the contact and about pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub photo_reference: Option<String>,
    pub message: String,
    /// Page locale, used to pick the redirect target and error language.
    pub locale: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ValidationError::MissingFields);
        }
        if !EMAIL.is_match(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// The posting page's locale, defaulting to English.
    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .and_then(Locale::parse)
            .unwrap_or_default()
    }
}

/// An accepted submission, as logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub photo_reference: String,
    pub message: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Submission {
    /// Validate and fill in defaults for the optional fields.
    pub fn from_form(form: &ContactForm) -> Result<Self, ValidationError> {
        form.validate()?;
        Ok(Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            subject: non_blank(form.subject.as_deref())
                .unwrap_or("No subject")
                .to_string(),
            photo_reference: non_blank(form.photo_reference.as_deref())
                .unwrap_or("None")
                .to_string(),
            message: form.message.trim().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        })
    }
}

/// Where accepted submissions go.
#[derive(Debug, Default)]
pub struct ContactSink {
    log_file: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl ContactSink {
    pub fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            log_file,
            write_lock: Mutex::new(()),
        }
    }

    /// Sink configured from `contact.log_file`, resolved against the content root.
    pub fn from_config(config: &crate::config::ContactConfig, root: &Path) -> Self {
        Self::new(config.log_file.as_ref().map(|f| root.join(f)))
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn record(&self, submission: &Submission) -> Result<(), ContactError> {
        tracing::info!(
            name = %submission.name,
            email = %submission.email,
            subject = %submission.subject,
            photo_reference = %submission.photo_reference,
            body = %submission.message,
            timestamp = %submission.timestamp,
            "contact form submission"
        );

        let Some(path) = &self.log_file else {
            return Ok(());
        };
        let mut line = serde_json::to_string(submission)?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Validate, then record. Returns the stored submission.
    pub fn submit(&self, form: &ContactForm) -> Result<Submission, ContactError> {
        let submission = Submission::from_form(form)?;
        self.record(&submission)?;
        Ok(submission)
    }
}

/// [`ContactSink::submit`] for async handlers. Validation runs inline; the file
/// append runs on tokio's blocking pool so it never stalls a runtime worker.
pub async fn submit_async(
    sink: Arc<ContactSink>,
    form: &ContactForm,
) -> Result<Submission, ContactError> {
    let submission = Submission::from_form(form)?;
    if sink.log_file.is_none() {
        sink.record(&submission)?;
        return Ok(submission);
    }
    tokio::task::spawn_blocking(move || sink.record(&submission).map(|()| submission)).await?
}
