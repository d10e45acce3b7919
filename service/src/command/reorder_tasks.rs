//! [`Command`] for reordering [`Task`]s of a [`Deal`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    sequence::{self, OutOfBounds},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::deal::Task;
use crate::{
    domain::{deal, Deal},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Task`] of a [`Deal`] to another position in its
/// checklist.
#[derive(Clone, Copy, Debug)]
pub struct ReorderTasks {
    /// ID of the [`Deal`] to reorder [`Task`]s of.
    pub deal_id: deal::Id,

    /// Current position of the [`Task`] to move.
    pub from: usize,

    /// New position of the [`Task`].
    pub to: usize,
}

impl<Db, L> Command<ReorderTasks> for Service<Db, L>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Deal>, deal::Id>>,
            Ok = Option<Deal>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Deal, deal::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Deal>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Deal;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ReorderTasks) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReorderTasks { deal_id, from, to } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Deal`.
        tx.execute(Lock(By::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut deal = tx
            .execute(Select(By::<Option<Deal>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(deal_id))
            .map_err(tracerr::wrap!())?;
        sequence::reorder(&mut deal.tasks, from, to)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if from == to {
            return Ok(deal);
        }

        tx.execute(Update(deal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deal)
    }
}

/// Error of [`ReorderTasks`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),

    /// Position is out of the [`Task`]s bounds.
    #[display("Invalid position: {_0}")]
    OutOfBounds(OutOfBounds),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::Deal,
        fixture,
        infra::{Database as _, Memory},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, ReorderTasks};

    #[tokio::test]
    async fn moves_task_keeping_others_order() {
        let deal = fixture::deals().remove(0);
        let ids = deal.tasks.iter().map(|t| t.id).collect::<Vec<_>>();
        let db = Memory::new();
        db.execute(Insert(deal.clone())).await.unwrap();
        let svc = Service::new(Config::default(), db, ());

        let reordered = svc
            .execute(ReorderTasks {
                deal_id: deal.id,
                from: 2,
                to: 0,
            })
            .await
            .unwrap();

        let expected = [ids[2], ids[0], ids[1], ids[3], ids[4], ids[5]];
        let actual = reordered.tasks.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(actual, expected);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Deal>, _>::new(deal.id)))
            .await
            .unwrap()
            .unwrap();
        let stored = stored.tasks.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn rejects_out_of_bounds() {
        let deal = fixture::deals().remove(0);
        let db = Memory::new();
        db.execute(Insert(deal.clone())).await.unwrap();
        let svc = Service::new(Config::default(), db, ());

        let err = svc
            .execute(ReorderTasks {
                deal_id: deal.id,
                from: 0,
                to: 6,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::OutOfBounds(_)));
    }
}
