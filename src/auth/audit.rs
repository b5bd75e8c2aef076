use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::logging::sanitize_log_message;

/// Optional audit-logging capability carried in a [`super::RequestContext`].
pub trait AuditLogger {
    fn info(&self, entry: &AuditEntry);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Granted,
    Denied,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Granted => "granted",
            AuditOutcome::Denied => "denied",
        }
    }
}

/// One authorization decision, as handed to an [`AuditLogger`].
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub trace_id: String,
    pub user_id: String,
    pub outcome: AuditOutcome,
    pub message: String,
}

impl AuditEntry {
    pub fn new(trace_id: &str, user_id: Option<&str>, outcome: AuditOutcome, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            trace_id: trace_id.to_string(),
            user_id: user_id.unwrap_or_default().to_string(),
            outcome,
            message: sanitize_log_message(message),
        }
    }

    pub fn granted(trace_id: &str, user_id: Option<&str>) -> Self {
        Self::new(trace_id, user_id, AuditOutcome::Granted, "Authorization granted")
    }

    pub fn denied(trace_id: &str, user_id: Option<&str>, reason: &str) -> Self {
        Self::new(
            trace_id,
            user_id,
            AuditOutcome::Denied,
            &format!("Authorization denied: {}", reason),
        )
    }
}

/// Audit logger that writes to the `audit` tracing target.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn info(&self, entry: &AuditEntry) {
        info!(
            target: "audit",
            audit_type = "authorization",
            trace_id = %entry.trace_id,
            user_id = %entry.user_id,
            outcome = entry.outcome.as_str(),
            "{}",
            entry.message
        );
    }
}
