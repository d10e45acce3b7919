//! Lazily connected Postgres clients.

use std::{future::Future, marker::PhantomData, sync::Arc};

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{
        connection::{self, Raw},
        Connection,
    },
};

/// [`Client`] running every statement on its own.
pub type NonTx = Client<AutoCommit>;

/// [`Client`] running every statement inside a single transaction.
pub type Tx = Client<InTransaction>;

/// Marker of a [`NonTx`] client.
#[derive(Clone, Copy, Debug)]
pub struct AutoCommit;

/// Marker of a [`Tx`] client.
#[derive(Clone, Copy, Debug)]
pub struct InTransaction;

/// Way a [`Client`] sets up its [`Raw`] connection.
pub trait Mode {
    /// Sets up a [`Raw`] connection out of the provided [`connection::Pooled`]
    /// one.
    fn establish(
        pooled: connection::Pooled,
    ) -> impl Future<Output = Result<Raw, Traced<database::Error>>> + Send;
}

impl Mode for AutoCommit {
    async fn establish(
        pooled: connection::Pooled,
    ) -> Result<Raw, Traced<database::Error>> {
        Ok(Raw::Pooled(pooled))
    }
}

impl Mode for InTransaction {
    async fn establish(
        pooled: connection::Pooled,
    ) -> Result<Raw, Traced<database::Error>> {
        connection::Transaction::begin(pooled)
            .await
            .map(Raw::Transaction)
            .map_err(tracerr::wrap!())
    }
}

/// Postgres client checking its [`Raw`] connection out of the pool on first
/// use only.
#[derive(Debug)]
pub struct Client<M> {
    /// [`connection::Pool`] to check the [`Raw`] connection out of.
    pub(crate) pool: connection::Pool,

    /// [`NonTx`] client whose connection is reused, if any.
    origin: Arc<Mutex<Option<NonTx>>>,

    /// [`Raw`] connection, once established.
    raw: Arc<RwLock<Option<Raw>>>,

    /// [`Mode`] of this [`Client`].
    mode: PhantomData<M>,
}

impl<M> Clone for Client<M> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            origin: Arc::clone(&self.origin),
            raw: Arc::clone(&self.raw),
            mode: PhantomData,
        }
    }
}

impl<M: Mode> Client<M> {
    /// Returns the [`Raw`] connection of this [`Client`], establishing it if
    /// needed.
    async fn raw(
        &self,
    ) -> Result<RwLockReadGuard<'_, Raw>, Traced<database::Error>> {
        {
            let raw = self.raw.read().await;
            if raw.is_some() {
                return Ok(RwLockReadGuard::map(raw, |r| {
                    r.as_ref().expect("checked above")
                }));
            }
        }

        let mut raw = self.raw.write().await;
        if raw.is_none() {
            let reused = match self.origin.lock().await.take() {
                Some(origin) => origin.take().await.and_then(Raw::into_pooled),
                None => None,
            };
            let pooled = match reused {
                Some(c) => c,
                None => connection::checkout(&self.pool)
                    .await
                    .map_err(tracerr::wrap!())?,
            };
            let established =
                M::establish(pooled).await.map_err(tracerr::wrap!())?;
            *raw = Some(established);
        }
        Ok(RwLockReadGuard::map(raw.downgrade(), |r| {
            r.as_ref()
                .expect("connection cannot be dropped while guard is alive")
        }))
    }

    /// Takes the [`Raw`] connection out of this [`Client`], so the next use
    /// establishes a new one.
    async fn take(&self) -> Option<Raw> {
        self.raw.write().await.take()
    }
}

impl NonTx {
    /// Creates a new [`NonTx`] client on top of the provided
    /// [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            origin: Arc::new(Mutex::new(None)),
            raw: Arc::new(RwLock::new(None)),
            mode: PhantomData,
        }
    }
}

impl Tx {
    /// Creates a new [`Tx`] client reusing the connection of the provided
    /// [`NonTx`] one, if it has any.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            origin: Arc::new(Mutex::new(Some(client))),
            raw: Arc::new(RwLock::new(None)),
            mode: PhantomData,
        }
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Does nothing if no statement has been run yet.
    ///
    /// # Errors
    ///
    /// If the `COMMIT` statement fails.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.take().await {
            Some(Raw::Transaction(tx)) => {
                tx.commit().await.map_err(tracerr::wrap!())
            }
            Some(Raw::Pooled(_)) | None => Ok(()),
        }
    }
}

impl<M: Mode> Connection for Client<M> {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let raw = self.raw().await.map_err(tracerr::wrap!())?;
        raw.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let raw = self.raw().await.map_err(tracerr::wrap!())?;
        raw.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let raw = self.raw().await.map_err(tracerr::wrap!())?;
        raw.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}
