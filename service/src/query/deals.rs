//! [`Query`] collection related to the multiple [`Deal`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::Deal, read};

use super::DatabaseQuery;

/// Queries a list of [`Deal`]s, the most recent first.
pub type List = DatabaseQuery<By<Vec<Deal>, read::deal::list::Filter>>;

/// Queries numbers of [`Deal`]s in total and per [`deal::Kind`].
///
/// [`deal::Kind`]: crate::domain::deal::Kind
pub type Counts = DatabaseQuery<By<read::deal::list::Counts, ()>>;
