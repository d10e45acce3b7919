//! [`Command`] for updating a [`milestone::Status`] of a [`Deal`]'s
//! [`Milestone`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::deal::Milestone;
use crate::{
    domain::{
        deal::{self, milestone},
        Deal,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`milestone::Status`] of a [`Deal`]'s
/// [`Milestone`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateMilestoneStatus {
    /// ID of the [`Deal`] the [`Milestone`] belongs to.
    pub deal_id: deal::Id,

    /// ID of the [`Milestone`] to update.
    pub milestone_id: milestone::Id,

    /// New [`milestone::Status`] of the [`Milestone`].
    pub status: milestone::Status,
}

impl<Db, L> Command<UpdateMilestoneStatus> for Service<Db, L>
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
        cmd: UpdateMilestoneStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateMilestoneStatus {
            deal_id,
            milestone_id,
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
        let milestone = deal
            .milestone_mut(milestone_id)
            .ok_or(E::MilestoneNotExists(milestone_id))
            .map_err(tracerr::wrap!())?;
        if milestone.status == status {
            return Ok(deal);
        }

        milestone.set_status(status, DateTime::now().coerce());

        tx.execute(Update(deal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deal)
    }
}

/// Error of [`UpdateMilestoneStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),

    /// [`Milestone`] doesn't exist in the [`Deal`].
    #[display("`Milestone(id: {_0})` does not exist")]
    #[from(ignore)]
    MilestoneNotExists(#[error(not(source))] milestone::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        domain::deal::{self, milestone},
        fixture,
        infra::{Database as _, Memory},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, UpdateMilestoneStatus};

    #[tokio::test]
    async fn completes_and_reopens_milestone() {
        let deal = fixture::deals().remove(0);
        let id = deal.milestones[5].id;
        let db = Memory::new();
        db.execute(Insert(deal.clone())).await.unwrap();
        let svc = Service::new(Config::default(), db, ());

        let completed = svc
            .execute(UpdateMilestoneStatus {
                deal_id: deal.id,
                milestone_id: id,
                status: milestone::Status::Completed,
            })
            .await
            .unwrap();
        let stage = completed.milestones.iter().find(|m| m.id == id).unwrap();
        assert_eq!(stage.status, milestone::Status::Completed);
        assert!(stage.completed_at.is_some());
        assert_eq!(completed.progress, deal.progress);

        let reopened = svc
            .execute(UpdateMilestoneStatus {
                deal_id: deal.id,
                milestone_id: id,
                status: milestone::Status::Pending,
            })
            .await
            .unwrap();
        let stage = reopened.milestones.iter().find(|m| m.id == id).unwrap();
        assert_eq!(stage.status, milestone::Status::Pending);
        assert!(stage.completed_at.is_none());
    }

    #[tokio::test]
    async fn rejects_unknown_deal() {
        let svc = Service::new(Config::default(), Memory::new(), ());

        let err = svc
            .execute(UpdateMilestoneStatus {
                deal_id: deal::Id::new(),
                milestone_id: milestone::Id::new(),
                status: milestone::Status::Completed,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::DealNotExists(_),
        ));
    }
}
