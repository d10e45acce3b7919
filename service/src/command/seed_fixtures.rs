//! [`Command`] for seeding the [`fixture`] dataset.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{Deal, EmailTemplate, Lead},
    fixture,
    infra::{database, Database},
    read::{
        deal::list::Counts,
        email_template::list::{Order, Selector},
        lead::list::Filter,
    },
    Service,
};

use super::Command;

/// [`Command`] for seeding the [`fixture`] dataset.
///
/// Every collection is seeded only when it's empty, so re-running this
/// [`Command`] never duplicates anything.
#[derive(Clone, Copy, Debug)]
pub struct SeedFixtures;

/// Numbers of records seeded by a [`SeedFixtures`] [`Command`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Seeded {
    /// Number of seeded [`Deal`]s.
    pub deals: usize,

    /// Number of seeded [`EmailTemplate`]s.
    pub email_templates: usize,

    /// Number of seeded [`Lead`]s.
    pub leads: usize,
}

impl<Db, L> Command<SeedFixtures> for Service<Db, L>
where
    Db: Database<
            Select<By<Counts, ()>>,
            Ok = Counts,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<EmailTemplate>, Selector>>,
            Ok = Vec<EmailTemplate>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Lead>, Filter>>,
            Ok = Vec<Lead>,
            Err = Traced<database::Error>,
        > + Database<Insert<Deal>, Ok = (), Err = Traced<database::Error>>
        + Database<Insert<EmailTemplate>, Ok = (), Err = Traced<database::Error>>
        + Database<Insert<Lead>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Seeded;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: SeedFixtures) -> Result<Self::Ok, Self::Err> {
        let db = self.database();
        let mut seeded = Seeded::default();

        let counts = db
            .execute(Select(By::<Counts, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        if counts.total == 0 {
            for deal in fixture::deals() {
                db.execute(Insert(deal)).await.map_err(tracerr::wrap!())?;
                seeded.deals += 1;
            }
        }

        let templates = db
            .execute(Select(By::<Vec<EmailTemplate>, _>::new(Selector::all(
                Order::Unordered,
            ))))
            .await
            .map_err(tracerr::wrap!())?;
        if templates.is_empty() {
            for template in fixture::email_templates() {
                db.execute(Insert(template))
                    .await
                    .map_err(tracerr::wrap!())?;
                seeded.email_templates += 1;
            }
        }

        let leads = db
            .execute(Select(By::<Vec<Lead>, _>::new(Filter::default())))
            .await
            .map_err(tracerr::wrap!())?;
        if leads.is_empty() {
            for lead in fixture::leads() {
                db.execute(Insert(lead)).await.map_err(tracerr::wrap!())?;
                seeded.leads += 1;
            }
        }

        if seeded != Seeded::default() {
            tracing::info!(
                deals = seeded.deals,
                email_templates = seeded.email_templates,
                leads = seeded.leads,
                "Seeded fixtures",
            );
        }

        Ok(seeded)
    }
}

/// Error of [`SeedFixtures`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        infra::{Database as _, Memory},
        read::deal::list::Counts,
        Command as _, Config, Service,
    };

    use super::{SeedFixtures, Seeded};

    #[tokio::test]
    async fn seeds_empty_store_once() {
        let svc = Service::new(Config::default(), Memory::new(), ());

        let seeded = svc.execute(SeedFixtures).await.unwrap();
        assert_eq!(
            seeded,
            Seeded {
                deals: 9,
                email_templates: 6,
                leads: 2,
            },
        );

        let again = svc.execute(SeedFixtures).await.unwrap();
        assert_eq!(again, Seeded::default());

        let counts = svc
            .database()
            .execute(Select(By::<Counts, _>::new(())))
            .await
            .unwrap();
        assert_eq!(counts.total, 9);
        assert_eq!(counts.purchases, 4);
        assert_eq!(counts.sales, 3);
        assert_eq!(counts.refinances, 2);
    }
}
