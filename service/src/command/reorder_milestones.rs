//! [`Command`] for reordering [`Milestone`]s of a [`Deal`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    sequence::{self, OutOfBounds},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::deal::Milestone;
use crate::{
    domain::{deal, Deal},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Milestone`] of a [`Deal`] to another position
/// in its timeline.
#[derive(Clone, Copy, Debug)]
pub struct ReorderMilestones {
    /// ID of the [`Deal`] to reorder [`Milestone`]s of.
    pub deal_id: deal::Id,

    /// Current position of the [`Milestone`] to move.
    pub from: usize,

    /// New position of the [`Milestone`].
    pub to: usize,
}

impl<Db, L> Command<ReorderMilestones> for Service<Db, L>
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

    async fn execute(&self, cmd: ReorderMilestones) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReorderMilestones { deal_id, from, to } = cmd;

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
        sequence::reorder(&mut deal.milestones, from, to)
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

/// Error of [`ReorderMilestones`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),

    /// Position is out of the [`Milestone`]s bounds.
    #[display("Invalid position: {_0}")]
    OutOfBounds(OutOfBounds),
}
