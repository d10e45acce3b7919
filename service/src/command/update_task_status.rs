//! [`Command`] for updating a [`task::Status`] of a [`Deal`]'s [`Task`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::deal::Task;
use crate::{
    domain::{
        deal::{self, task},
        Deal,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`task::Status`] of a [`Deal`]'s [`Task`].
///
/// Recomputes the [`Deal::progress`] afterwards.
#[derive(Clone, Copy, Debug)]
pub struct UpdateTaskStatus {
    /// ID of the [`Deal`] the [`Task`] belongs to.
    pub deal_id: deal::Id,

    /// ID of the [`Task`] to update.
    pub task_id: task::Id,

    /// New [`task::Status`] of the [`Task`].
    pub status: task::Status,
}

impl<Db, L> Command<UpdateTaskStatus> for Service<Db, L>
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

    async fn execute(
        &self,
        cmd: UpdateTaskStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateTaskStatus {
            deal_id,
            task_id,
            status,
        } = cmd;

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
        let task = deal
            .task_mut(task_id)
            .ok_or(E::TaskNotExists(task_id))
            .map_err(tracerr::wrap!())?;
        if task.status == status {
            return Ok(deal);
        }

        task.set_status(status, DateTime::now().coerce());
        deal.recalculate_progress();

        tx.execute(Update(deal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deal)
    }
}

/// Error of [`UpdateTaskStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),

    /// [`Task`] doesn't exist in the [`Deal`].
    #[display("`Task(id: {_0})` does not exist")]
    #[from(ignore)]
    TaskNotExists(#[error(not(source))] task::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};
    use rust_decimal::Decimal;

    use crate::{
        domain::{deal::task, Deal},
        fixture,
        infra::{Database as _, Memory},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, UpdateTaskStatus};

    async fn service(deal: Deal) -> Service<Memory, ()> {
        let db = Memory::new();
        db.execute(Insert(deal)).await.unwrap();
        Service::new(Config::default(), db, ())
    }

    #[tokio::test]
    async fn completes_task_and_recalculates_progress() {
        let deal = fixture::deals().remove(0);
        let task_id = deal.tasks[5].id;
        let svc = service(deal.clone()).await;

        let updated = svc
            .execute(UpdateTaskStatus {
                deal_id: deal.id,
                task_id,
                status: task::Status::Completed,
            })
            .await
            .unwrap();

        let task = updated.tasks.iter().find(|t| t.id == task_id).unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());
        assert_eq!(updated.progress.value(), Decimal::from(50));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Deal>, _>::new(deal.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.progress, updated.progress);
    }

    #[tokio::test]
    async fn reopening_task_clears_completion() {
        let deal = fixture::deals().remove(0);
        let done = deal.completed_tasks().next().unwrap().id;
        let svc = service(deal.clone()).await;

        let updated = svc
            .execute(UpdateTaskStatus {
                deal_id: deal.id,
                task_id: done,
                status: task::Status::InProgress,
            })
            .await
            .unwrap();

        let task = updated.tasks.iter().find(|t| t.id == done).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(updated.progress.value(), Decimal::from(17));
    }

    #[tokio::test]
    async fn rejects_unknown_task() {
        let deal = fixture::deals().remove(0);
        let svc = service(deal.clone()).await;

        let err = svc
            .execute(UpdateTaskStatus {
                deal_id: deal.id,
                task_id: task::Id::new(),
                status: task::Status::Completed,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::TaskNotExists(_),
        ));
    }
}
