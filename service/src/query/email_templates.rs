//! [`Query`] collection related to the multiple [`EmailTemplate`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::EmailTemplate,
    read::email_template::list::{Order, Selector},
};

use super::DatabaseQuery;

/// Queries a list of [`EmailTemplate`]s.
pub type List = DatabaseQuery<By<Vec<EmailTemplate>, Selector>>;

impl List {
    /// Queries the [`EmailTemplate`]s whose name contains the provided
    /// `search` term, the most recently created first.
    #[must_use]
    pub fn newest_first(search: Option<String>) -> Self {
        Self::by(Selector {
            order: Order::NewestFirst,
            search,
        })
    }

    /// Queries all the [`EmailTemplate`]s as they're stored.
    #[must_use]
    pub fn raw() -> Self {
        Self::by(Selector::all(Order::Unordered))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        fixture,
        infra::{Database as _, Memory},
        Config, Query as _, Service,
    };

    use super::List;

    #[tokio::test]
    async fn lists_newest_first() {
        let db = Memory::new();
        for template in fixture::email_templates() {
            db.execute(Insert(template)).await.unwrap();
        }
        let svc = Service::new(Config::default(), db, ());

        let newest = svc.execute(List::newest_first(None)).await.unwrap();
        assert_eq!(newest.len(), 6);
        assert!(newest
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));

        let raw = svc.execute(List::raw()).await.unwrap();
        assert_eq!(raw.len(), 6);

        let found = svc
            .execute(List::newest_first(Some("CLOSING".into())))
            .await
            .unwrap();
        assert!(!found.is_empty());
        assert!(found
            .iter()
            .all(|t| t.name.to_string().to_lowercase().contains("closing")));
    }
}
