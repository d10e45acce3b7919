//! [`Postgres`] database.

pub mod client;
pub mod connection;
mod like_pattern;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    like_pattern::LikePattern,
};

pub use deadpool_postgres::Config;

/// Postgres [`Database`] backed by a connection pool.
///
/// `T` is the [`client::Client`] statements are run with: [`NonTx`] outside
/// of a transaction, or [`Tx`] inside one.
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] database connecting with the provided
    /// [`Config`].
    ///
    /// No connection is established until the first statement runs.
    ///
    /// # Errors
    ///
    /// If the [`Config`] doesn't describe a valid connection pool.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        conf.create_pool(Some(Runtime::Tokio1), NoTls)
            .map(|pool| Self(NonTx::from_pool(pool)))
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement failed.
    #[display("{_0}")]
    Statement(connection::Error),

    /// Invalid pool configuration.
    #[display("Invalid connection pool configuration: {_0}")]
    Config(connection::PoolCreationError),

    /// No connection could be checked out of the pool.
    #[display("Failed to connect: {_0}")]
    Pool(connection::PoolError),
}
