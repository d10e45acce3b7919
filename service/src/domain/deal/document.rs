//! [`Document`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Deal;

/// Document attached to a [`Deal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Document {
    /// ID of this [`Document`].
    pub id: Id,

    /// [`Name`] of this [`Document`].
    pub name: Name,

    /// Type label of this [`Document`] (e.g. `Article of Incorporation`).
    pub label: Name,

    /// [`Status`] of this [`Document`].
    pub status: Status,

    /// [`DateTime`] when this [`Document`] was uploaded.
    pub uploaded_at: UploadDateTime,
}

/// ID of a [`Document`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name (or type label) of a [`Document`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is non-empty after trimming.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (!name.is_empty() && name.len() <= 512).then(|| Self(name.to_owned()))
    }
}

define_kind! {
    #[doc = "Status of a [`Document`]."]
    enum Status {
        #[doc = "Being prepared."]
        Draft = 1,

        #[doc = "Under review."]
        Review = 2,

        #[doc = "Signed by the parties."]
        Signed = 3,

        #[doc = "Registered with the land registry."]
        Registered = 4,
    }
}

/// [`DateTime`] when a [`Document`] was uploaded.
pub type UploadDateTime = DateTimeOf<(Document, unit::Upload)>;
