//! [`Query`] collection related to the [`Database`] connection.

use common::operations::Ping;
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries whether the [`Database`] is reachable.
#[derive(Clone, Copy, Debug)]
pub struct Probe;

/// Outcome of a [`Probe`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Status {
    /// Indicator whether the [`Database`] is reachable.
    pub connected: bool,

    /// Human-readable summary of this [`Status`].
    pub message: String,

    /// Error the [`Database`] failed with, if any.
    pub error: Option<String>,
}

impl<Db, L> Query<Probe> for Service<Db, L>
where
    Db: Database<Ping, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Status;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Probe) -> Result<Self::Ok, Self::Err> {
        Ok(match self.database().execute(Ping).await {
            Ok(()) => Status {
                connected: true,
                message: "Database connection OK".into(),
                error: None,
            },
            Err(e) => {
                tracing::warn!("`Database` probe failed: {e}");
                Status {
                    connected: false,
                    message: "Connection failed".into(),
                    error: Some(e.into_inner().to_string()),
                }
            }
        })
    }
}

#[cfg(test)]
mod spec {
    use crate::{infra::Memory, Config, Query as _, Service};

    use super::Probe;

    #[tokio::test]
    async fn reports_reachable_database() {
        let svc = Service::new(Config::default(), Memory::new(), ());

        let status = svc.execute(Probe).await.unwrap();

        assert!(status.connected);
        assert_eq!(status.message, "Database connection OK");
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn reports_unreachable_database() {
        let svc = Service::new(Config::default(), Memory::unavailable(), ());

        let status = svc.execute(Probe).await.unwrap();

        assert!(!status.connected);
        assert_eq!(status.message, "Connection failed");
        assert_eq!(
            status.error.as_deref(),
            Some("in-memory database is unavailable"),
        );
    }
}
