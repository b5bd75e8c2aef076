//! Authorization decision helper for request pipelines.
//!
//! [`check_authorization`] evaluates a [`Predicate`] against the credentials
//! carried in a [`RequestContext`] and either grants the request or fails
//! with [`AuthzError::NotAuthorized`]. Both outcomes are written to the
//! context's audit logger when one is present.
//!
//! ```
//! use authz_gate::auth::{Credentials, InGroup, RequestContext};
//! use authz_gate::helpers::check_authorization;
//!
//! let ctx = RequestContext::new()
//!     .with_credentials(Credentials::for_user("alice").with_groups(["admins"]));
//!
//! assert!(check_authorization(Some(&InGroup::new("admins")), &ctx).is_ok());
//!
//! let err = check_authorization(Some(&InGroup::new("developers")), &ctx).unwrap_err();
//! assert!(err.is_not_authorized());
//! ```
//!
//! # Error Handling
//!
//! Only the expected "predicate not met" outcome is translated. Pipelines
//! should map [`AuthzError::NotAuthorized`] to a forbidden response; an
//! [`AuthzError::Evaluation`] means the predicate itself broke and is not an
//! authorization decision at all, so nothing is audited for it.

use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::{AuditEntry, Credentials, Predicate, PredicateError, PredicateFailure, RequestContext};

#[derive(Debug, Error)]
pub enum AuthzError {
    /// The predicate was evaluated and not met.
    #[error("Not authorized: {0}")]
    NotAuthorized(PredicateFailure),

    /// The predicate failed for a reason other than being unmet.
    #[error(transparent)]
    Evaluation(anyhow::Error),
}

impl AuthzError {
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, AuthzError::NotAuthorized(_))
    }

    /// Denial reason, for [`AuthzError::NotAuthorized`] only.
    pub fn reason(&self) -> Option<&str> {
        match self {
            AuthzError::NotAuthorized(failure) => Some(failure.reason()),
            AuthzError::Evaluation(_) => None,
        }
    }
}

/// Decide whether the request described by `ctx` may proceed.
///
/// A missing predicate grants vacuously without evaluating anything, though
/// the grant is still audited. Missing credentials are evaluated as an empty
/// credential set.
///
/// # Returns
///
/// * `Ok(())` - access granted
/// * `Err(AuthzError::NotAuthorized)` - the predicate was not met
/// * `Err(AuthzError::Evaluation)` - the predicate failed unexpectedly
pub fn check_authorization(
    predicate: Option<&dyn Predicate>,
    ctx: &RequestContext,
) -> Result<(), AuthzError> {
    let empty = Credentials::default();
    let credentials = ctx.credentials.as_ref().unwrap_or(&empty);

    let outcome = match predicate {
        Some(predicate) => predicate.evaluate(ctx, credentials),
        None => Ok(()),
    };

    match outcome {
        Ok(()) => {
            debug!(trace_id = %ctx.trace_id, "authorization granted");
            if let Some(logger) = &ctx.logger {
                logger.info(&AuditEntry::granted(&ctx.trace_id, ctx.user_id()));
            }
            Ok(())
        }
        Err(PredicateError::Unmet(failure)) => {
            debug!(trace_id = %ctx.trace_id, reason = %failure, "authorization denied");
            if let Some(logger) = &ctx.logger {
                logger.info(&AuditEntry::denied(
                    &ctx.trace_id,
                    ctx.user_id(),
                    failure.reason(),
                ));
            }
            Err(AuthzError::NotAuthorized(failure))
        }
        Err(PredicateError::Failed(error)) => {
            warn!(trace_id = %ctx.trace_id, error = %error, "predicate evaluation failed");
            Err(AuthzError::Evaluation(error))
        }
    }
}
