//! GraphQL API definitions.

pub mod deal;
pub mod intake;
pub mod lead;
mod mutation;
mod query;
pub mod scalar;
pub mod template;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{deal::Deal, lead::Lead, mutation::Mutation, query::Query};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
