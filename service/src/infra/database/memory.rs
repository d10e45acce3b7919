//! In-memory [`Database`] implementation.

use std::{
    cmp::Reverse,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use common::operations::{
    By, Commit, Insert, Lock, Ping, Select, Transact, Update,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{deal, lead, Deal, EmailTemplate, Lead},
    infra::{database, Database},
    read::{self, email_template::list::Order},
};

/// In-memory [`Database`], keeping everything in a shared [`Store`].
///
/// Transactions are not isolated: every write is visible immediately.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// [`Store`] of this [`Memory`] database.
    store: Arc<RwLock<Store>>,

    /// Indicator whether every operation fails with [`Error::Unavailable`].
    unavailable: bool,
}

/// Records kept in a [`Memory`] database, in their insertion order.
#[derive(Debug, Default)]
struct Store {
    /// Stored [`Deal`]s.
    deals: Vec<Deal>,

    /// Stored [`EmailTemplate`]s.
    email_templates: Vec<EmailTemplate>,

    /// Stored [`Lead`]s.
    leads: Vec<Lead>,

    /// Last issued [`deal::Serial`] number.
    serial: u32,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Memory`] database failing every operation, as an
    /// unreachable store would.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            store: Arc::default(),
            unavailable: true,
        }
    }

    /// Acquires read access to the [`Store`].
    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, Store>, Traced<database::Error>> {
        if self.unavailable {
            let e = database::Error::from(Error::Unavailable);
            return Err(tracerr::new!(e));
        }
        Ok(self.store.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Acquires write access to the [`Store`].
    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, Store>, Traced<database::Error>> {
        if self.unavailable {
            let e = database::Error::from(Error::Unavailable);
            return Err(tracerr::new!(e));
        }
        Ok(self.store.write().unwrap_or_else(PoisonError::into_inner))
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Memory`] database is unavailable.
    #[display("in-memory database is unavailable")]
    Unavailable,
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        drop(self.read()?);
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.read().map(drop)
    }
}

impl Database<Ping> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Ping) -> Result<Self::Ok, Self::Err> {
        self.read().map(drop)
    }
}

impl
    Database<
        Select<By<Vec<EmailTemplate>, read::email_template::list::Selector>>,
    > for Memory
{
    type Ok = Vec<EmailTemplate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<EmailTemplate>, read::email_template::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();

        let mut templates = self
            .read()?
            .email_templates
            .iter()
            .filter(|t| selector.matches(t))
            .cloned()
            .collect::<Vec<_>>();
        if selector.order == Order::NewestFirst {
            templates.sort_by_key(|t| Reverse(t.created_at));
        }
        Ok(templates)
    }
}

impl Database<Insert<EmailTemplate>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(template): Insert<EmailTemplate>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write()?.email_templates.push(template);
        Ok(())
    }
}

impl Database<Select<By<Option<Deal>, deal::Id>>> for Memory {
    type Ok = Option<Deal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Deal>, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read()?.deals.iter().find(|d| d.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Deal>, read::deal::list::Filter>>> for Memory {
    type Ok = Vec<Deal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Deal>, read::deal::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();

        let mut deals = self
            .read()?
            .deals
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect::<Vec<_>>();
        deals.sort_by_key(|d| Reverse(d.created_at));
        if let Some(limit) = filter.limit() {
            deals.truncate(limit);
        }
        Ok(deals)
    }
}

impl Database<Select<By<read::deal::list::Counts, ()>>> for Memory {
    type Ok = read::deal::list::Counts;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::deal::list::Counts, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read()?.deals.iter().collect())
    }
}

impl Database<Select<By<deal::Serial, ()>>> for Memory {
    type Ok = deal::Serial;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<deal::Serial, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.write()?;
        store.serial += 1;
        Ok(store.serial.into())
    }
}

impl Database<Lock<By<Deal, deal::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Deal, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read().map(drop)
    }
}

impl Database<Insert<Deal>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(deal): Insert<Deal>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(deal)).await
    }
}

impl Database<Update<Deal>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deal): Update<Deal>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.write()?;
        if let Some(existing) = store.deals.iter_mut().find(|d| d.id == deal.id)
        {
            *existing = deal;
        } else {
            store.deals.push(deal);
        }
        Ok(())
    }
}

impl Database<Select<By<Option<Lead>, lead::Id>>> for Memory {
    type Ok = Option<Lead>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Lead>, lead::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read()?.leads.iter().find(|l| l.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Lead>, read::lead::list::Filter>>> for Memory {
    type Ok = Vec<Lead>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Lead>, read::lead::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();

        let mut leads = self
            .read()?
            .leads
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect::<Vec<_>>();
        leads.sort_by_key(|l| Reverse(l.created_at));
        Ok(leads)
    }
}

impl Database<Insert<Lead>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(lead): Insert<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write()?.leads.push(lead);
        Ok(())
    }
}
