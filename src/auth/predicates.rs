//! Built-in predicates
//!
//! Common rules over [`Credentials`]: identity checks, group membership,
//! permissions, and the `All`/`Any`/`Not` combinators to compose them.
//! Anything implementing [`Predicate`] can be nested inside the combinators,
//! including closures.

use std::collections::BTreeSet;

use super::{Credentials, Predicate, PredicateError, RequestContext};

/// Met when every child predicate is met. The first failure is reported.
pub struct All {
    predicates: Vec<Box<dyn Predicate>>,
}

impl All {
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self { predicates }
    }
}

impl Predicate for All {
    fn evaluate(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
    ) -> Result<(), PredicateError> {
        for predicate in &self.predicates {
            predicate.evaluate(ctx, credentials)?;
        }
        Ok(())
    }
}

/// Met when at least one child predicate is met.
pub struct Any {
    predicates: Vec<Box<dyn Predicate>>,
}

impl Any {
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self { predicates }
    }
}

impl Predicate for Any {
    fn evaluate(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
    ) -> Result<(), PredicateError> {
        let mut reasons = Vec::with_capacity(self.predicates.len());
        for predicate in &self.predicates {
            match predicate.evaluate(ctx, credentials) {
                Ok(()) => return Ok(()),
                Err(PredicateError::Unmet(failure)) => reasons.push(failure.reason().to_string()),
                Err(err) => return Err(err),
            }
        }
        Err(PredicateError::unmet(format!(
            "At least one of the following predicates must be met: {}",
            reasons.join(", ")
        )))
    }
}

/// Negates the wrapped predicate.
pub struct Not {
    predicate: Box<dyn Predicate>,
}

impl Not {
    pub fn new(predicate: Box<dyn Predicate>) -> Self {
        Self { predicate }
    }
}

impl Predicate for Not {
    fn evaluate(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
    ) -> Result<(), PredicateError> {
        match self.predicate.evaluate(ctx, credentials) {
            Ok(()) => Err(PredicateError::unmet("The condition must not be met")),
            Err(PredicateError::Unmet(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Met when the current user is exactly `user_id`.
#[derive(Debug, Clone)]
pub struct IsUser {
    user_id: String,
}

impl IsUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl Predicate for IsUser {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if credentials.user_id.as_deref() == Some(self.user_id.as_str()) {
            return Ok(());
        }
        Err(PredicateError::unmet(format!(
            "The current user must be \"{}\"",
            self.user_id
        )))
    }
}

#[derive(Debug, Clone, Default)]
pub struct IsAnonymous;

impl Predicate for IsAnonymous {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if credentials.is_anonymous() {
            Ok(())
        } else {
            Err(PredicateError::unmet("The current user must be anonymous"))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotAnonymous;

impl Predicate for NotAnonymous {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if credentials.is_anonymous() {
            Err(PredicateError::unmet("The current user must be authenticated"))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct InGroup {
    group: String,
}

impl InGroup {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }
}

impl Predicate for InGroup {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if credentials.groups.contains(&self.group) {
            return Ok(());
        }
        Err(PredicateError::unmet(format!(
            "The current user must belong to the group \"{}\"",
            self.group
        )))
    }
}

/// Met when the user belongs to every listed group. Reports the first
/// missing group.
#[derive(Debug, Clone)]
pub struct InAllGroups {
    groups: Vec<String>,
}

impl InAllGroups {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for InAllGroups {
    fn evaluate(&self, ctx: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        for group in &self.groups {
            InGroup::new(group.as_str()).evaluate(ctx, credentials)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InAnyGroup {
    groups: Vec<String>,
}

impl InAnyGroup {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for InAnyGroup {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if contains_any(&credentials.groups, &self.groups) {
            return Ok(());
        }
        Err(PredicateError::unmet(format!(
            "The member must belong to at least one of the following groups: {}",
            self.groups.join(", ")
        )))
    }
}

#[derive(Debug, Clone)]
pub struct HasPermission {
    permission: String,
}

impl HasPermission {
    pub fn new(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
        }
    }
}

impl Predicate for HasPermission {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if credentials.permissions.contains(&self.permission) {
            return Ok(());
        }
        Err(PredicateError::unmet(format!(
            "The user must have the \"{}\" permission",
            self.permission
        )))
    }
}

#[derive(Debug, Clone)]
pub struct HasAllPermissions {
    permissions: Vec<String>,
}

impl HasAllPermissions {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for HasAllPermissions {
    fn evaluate(&self, ctx: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        for permission in &self.permissions {
            HasPermission::new(permission.as_str()).evaluate(ctx, credentials)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HasAnyPermission {
    permissions: Vec<String>,
}

impl HasAnyPermission {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for HasAnyPermission {
    fn evaluate(&self, _: &RequestContext, credentials: &Credentials) -> Result<(), PredicateError> {
        if contains_any(&credentials.permissions, &self.permissions) {
            return Ok(());
        }
        Err(PredicateError::unmet(format!(
            "The user must have at least one of the following permissions: {}",
            self.permissions.join(", ")
        )))
    }
}

fn contains_any(held: &BTreeSet<String>, wanted: &[String]) -> bool {
    wanted.iter().any(|item| held.contains(item))
}
