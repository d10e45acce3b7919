//! [`Query`] collection related to the multiple [`Lead`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::Lead, read};

use super::DatabaseQuery;

/// Queries a list of [`Lead`]s, the most recent first.
pub type List = DatabaseQuery<By<Vec<Lead>, read::lead::list::Filter>>;
