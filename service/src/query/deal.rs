//! [`Query`] collection related to a single [`Deal`].

use common::operations::By;

use crate::domain::{deal, Deal};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Deal`] by its [`deal::Id`].
pub type ById = DatabaseQuery<By<Option<Deal>, deal::Id>>;
