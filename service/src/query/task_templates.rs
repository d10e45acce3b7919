//! [`Query`] collection related to the [`TaskTemplate`] library.

use std::convert::Infallible;

use crate::{domain::TaskTemplate, read::template, Service};

use super::Query;

/// Queries the [`TaskTemplate`]s matching a search term.
#[derive(Clone, Debug, Default)]
pub struct List {
    /// Term to search [`TaskTemplate`]s by name or lead type, if any.
    pub search: Option<String>,
}

impl<Db, L> Query<List> for Service<Db, L> {
    type Ok = Vec<&'static TaskTemplate>;
    type Err = Infallible;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        Ok(template::task_templates(query.search.as_deref()))
    }
}

#[cfg(test)]
mod spec {
    use crate::{infra::Memory, Config, Query as _, Service};

    use super::List;

    #[tokio::test]
    async fn searches_library() {
        let svc = Service::new(Config::default(), Memory::new(), ());

        let all = svc.execute(List::default()).await.unwrap();
        let found = svc
            .execute(List {
                search: Some("insurance".into()),
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 6);
        assert_eq!(found.len(), 1);
    }
}
