//! The predicate capability consumed by the decision engine.
//!
//! A predicate is a possibly composite boolean rule over the request
//! credentials. Evaluation either returns normally (the predicate is met) or
//! fails with a [`PredicateError`]. The expected "not met" outcome is
//! [`PredicateError::Unmet`] and always carries a human-readable reason;
//! anything else is an unexpected evaluation failure.

use thiserror::Error;

use super::{Credentials, RequestContext};

/// Reason a predicate was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PredicateFailure {
    reason: String,
}

impl PredicateFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[derive(Debug, Error)]
pub enum PredicateError {
    #[error(transparent)]
    Unmet(#[from] PredicateFailure),

    #[error("Predicate evaluation failed: {0}")]
    Failed(#[source] anyhow::Error),
}

impl PredicateError {
    /// Shorthand for the "not met" outcome.
    pub fn unmet(reason: impl Into<String>) -> Self {
        PredicateError::Unmet(PredicateFailure::new(reason))
    }
}

pub trait Predicate {
    /// Check the predicate against `credentials`, returning the reason it is
    /// not met as [`PredicateError::Unmet`].
    fn evaluate(&self, ctx: &RequestContext, credentials: &Credentials)
    -> Result<(), PredicateError>;

    /// Boolean view of [`Predicate::evaluate`]. Unexpected failures count as
    /// not met.
    fn is_met(&self, ctx: &RequestContext, credentials: &Credentials) -> bool {
        self.evaluate(ctx, credentials).is_ok()
    }
}

impl<F> Predicate for F
where
    F: Fn(&RequestContext, &Credentials) -> Result<(), PredicateError>,
{
    fn evaluate(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
    ) -> Result<(), PredicateError> {
        self(ctx, credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_met(_: &RequestContext, _: &Credentials) -> Result<(), PredicateError> {
        Ok(())
    }

    fn never_met(_: &RequestContext, _: &Credentials) -> Result<(), PredicateError> {
        Err(PredicateError::unmet("not a member"))
    }

    #[test]
    fn test_failure_displays_reason_verbatim() {
        let failure = PredicateFailure::new("not a member");
        assert_eq!(failure.to_string(), "not a member");
        assert_eq!(failure.reason(), "not a member");
    }

    #[test]
    fn test_unmet_error_is_transparent() {
        let err = PredicateError::unmet("must be admin");
        assert_eq!(err.to_string(), "must be admin");
    }

    #[test]
    fn test_failed_error_message() {
        let err = PredicateError::Failed(anyhow::anyhow!("backend unreachable"));
        assert_eq!(
            err.to_string(),
            "Predicate evaluation failed: backend unreachable"
        );
    }

    #[test]
    fn test_closures_are_predicates() {
        let ctx = RequestContext::new();
        let creds = Credentials::default();

        assert!(always_met.is_met(&ctx, &creds));
        assert!(!never_met.is_met(&ctx, &creds));
    }

    #[test]
    fn test_boxed_predicate_delegates() {
        let ctx = RequestContext::new();
        let creds = Credentials::default();
        let boxed: Box<dyn Predicate> = Box::new(never_met);

        match boxed.evaluate(&ctx, &creds) {
            Err(PredicateError::Unmet(failure)) => assert_eq!(failure.reason(), "not a member"),
            other => panic!("Expected unmet predicate, got {:?}", other),
        }
    }
}
