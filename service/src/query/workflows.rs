//! [`Query`] collection related to the [`Workflow`] library.

use std::convert::Infallible;

#[cfg(doc)]
use crate::domain::Workflow;
use crate::{
    read::template::{self, WorkflowView},
    Service,
};

use super::Query;

/// Queries the [`Workflow`]s with their stages narrowed by a search term.
#[derive(Clone, Debug, Default)]
pub struct List {
    /// Term to search stages by name or email template name, if any.
    pub search: Option<String>,
}

impl<Db, L> Query<List> for Service<Db, L> {
    type Ok = Vec<WorkflowView>;
    type Err = Infallible;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        Ok(template::workflows(query.search.as_deref()))
    }
}
