use crate::auth::Credentials;
use crate::services::source::{SectionQuery, SourceAdapter, SourceError};

/// Something to time against an adapter, once per iteration.
pub trait BenchmarkAction {
    fn run(&self, adapter: &mut dyn SourceAdapter) -> Result<(), SourceError>;

    /// Label used in logs and reports.
    fn label(&self) -> String {
        "custom".to_string()
    }
}

impl<F> BenchmarkAction for F
where
    F: Fn(&mut dyn SourceAdapter) -> Result<(), SourceError>,
{
    fn run(&self, adapter: &mut dyn SourceAdapter) -> Result<(), SourceError> {
        self(adapter)
    }
}

/// Retrieves all the groups one user belongs to.
#[derive(Debug, Clone)]
pub struct GroupsRetrievalAction {
    user_id: String,
}

impl GroupsRetrievalAction {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl BenchmarkAction for GroupsRetrievalAction {
    fn run(&self, adapter: &mut dyn SourceAdapter) -> Result<(), SourceError> {
        let query = SectionQuery::Credentials(Credentials::for_user(self.user_id.as_str()));
        adapter.find_sections(&query)?;
        Ok(())
    }

    fn label(&self) -> String {
        format!("groups:{}", self.user_id)
    }
}

/// Retrieves all the permissions granted to one group.
#[derive(Debug, Clone)]
pub struct PermissionsRetrievalAction {
    group_id: String,
}

impl PermissionsRetrievalAction {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }
}

impl BenchmarkAction for PermissionsRetrievalAction {
    fn run(&self, adapter: &mut dyn SourceAdapter) -> Result<(), SourceError> {
        adapter.find_sections(&SectionQuery::Item(self.group_id.clone()))?;
        Ok(())
    }

    fn label(&self) -> String {
        format!("permissions:{}", self.group_id)
    }
}
