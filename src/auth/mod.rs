use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

pub mod audit;
pub mod predicate;
pub mod predicates;

pub use audit::*;
pub use predicate::*;
pub use predicates::*;

/// Facts about the current request that predicates evaluate against.
///
/// Populated by the request pipeline; the decision engine and predicates
/// only ever read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "userid", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub groups: BTreeSet<String>,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl Credentials {
    /// Identity-only credentials, as used when querying group adapters.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Explicit per-request context handed to the decision engine.
///
/// Both entries are optional: missing credentials are treated as an empty
/// credential set and a missing logger makes the decision silent.
#[derive(Clone)]
pub struct RequestContext {
    pub trace_id: String,
    pub credentials: Option<Credentials>,
    pub logger: Option<Arc<dyn AuditLogger>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            credentials: None,
            logger: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The user identifier from the credentials, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.credentials.as_ref()?.user_id.as_deref()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("trace_id", &self.trace_id)
            .field("credentials", &self.credentials)
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_for_user() {
        let creds = Credentials::for_user("alice");

        assert_eq!(creds.user_id.as_deref(), Some("alice"));
        assert!(creds.groups.is_empty());
        assert!(creds.permissions.is_empty());
        assert!(!creds.is_anonymous());
    }

    #[test]
    fn test_default_credentials_are_anonymous() {
        assert!(Credentials::default().is_anonymous());
    }

    #[test]
    fn test_credentials_builder_collects_groups_and_permissions() {
        let creds = Credentials::for_user("bob")
            .with_groups(["admins", "developers"])
            .with_permissions(["edit-posts"]);

        assert!(creds.groups.contains("admins"));
        assert!(creds.groups.contains("developers"));
        assert!(creds.permissions.contains("edit-posts"));
    }

    #[test]
    fn test_credentials_deserialize_with_missing_keys() {
        let creds: Credentials = serde_json::from_str(r#"{"userid": "carol"}"#).unwrap();

        assert_eq!(creds.user_id.as_deref(), Some("carol"));
        assert!(creds.groups.is_empty());
    }

    #[test]
    fn test_request_context_defaults() {
        let ctx = RequestContext::new();

        assert!(ctx.credentials.is_none());
        assert!(ctx.logger.is_none());
        assert_eq!(ctx.user_id(), None);
        // UUID v4, 36 characters with hyphens
        assert_eq!(ctx.trace_id.len(), 36);
    }

    #[test]
    fn test_request_context_trace_ids_are_unique() {
        assert_ne!(RequestContext::new().trace_id, RequestContext::new().trace_id);
    }

    #[test]
    fn test_request_context_user_id() {
        let ctx = RequestContext::new()
            .with_trace_id("trace123")
            .with_credentials(Credentials::for_user("alice"));

        assert_eq!(ctx.trace_id, "trace123");
        assert_eq!(ctx.user_id(), Some("alice"));
    }
}
