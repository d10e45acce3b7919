//! [`Lead`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contact, deal};

/// Prospective client, which hasn't opened a [`Deal`] yet.
///
/// [`Deal`]: crate::domain::Deal
#[derive(Clone, Debug)]
pub struct Lead {
    /// ID of this [`Lead`].
    pub id: Id,

    /// Given name of this [`Lead`].
    pub first_name: contact::Name,

    /// Family name of this [`Lead`].
    pub last_name: contact::Name,

    /// [`contact::Email`] of this [`Lead`].
    pub email: contact::Email,

    /// [`contact::Phone`] of this [`Lead`], if known.
    pub phone: Option<contact::Phone>,

    /// [`contact::Corporation`] this [`Lead`] represents, if it's a corporate
    /// one.
    pub corporation: Option<contact::Corporation>,

    /// Current [`Address`] of this [`Lead`], if known.
    pub address: Option<Address>,

    /// [`Profile`] of this [`Lead`].
    pub profile: Profile,

    /// [`DateTime`] when this [`Lead`] was created.
    pub created_at: CreationDateTime,
}

impl Lead {
    /// Indicates whether this [`Lead`] is a corporate one.
    #[must_use]
    pub fn is_corporate(&self) -> bool {
        self.corporation.is_some()
    }

    /// Returns the full name of this [`Lead`].
    #[must_use]
    pub fn full_name(&self) -> String {
        let parts: [&str; 2] =
            [self.first_name.as_ref(), self.last_name.as_ref()];
        parts
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// ID of a [`Lead`].
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

/// Current address of a [`Lead`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Address {
    /// Street line of this [`Address`].
    pub street: deal::AddressPart,

    /// City of this [`Address`], if known.
    pub city: Option<deal::AddressPart>,

    /// Postal code of this [`Address`], if known.
    pub postal_code: Option<deal::AddressPart>,
}

/// Background details of a [`Lead`] collected for the closing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Profile {
    /// Type of the property (primary residence, rental, etc.).
    pub property_type: Option<contact::Detail>,

    /// Whether the [`Lead`] owned a property before.
    pub ownership_history: Option<contact::Detail>,

    /// Marital status of the [`Lead`].
    pub marital_status: Option<contact::Detail>,

    /// Citizenship status of the [`Lead`].
    pub citizenship_status: Option<contact::Detail>,

    /// Occupation of the [`Lead`].
    pub occupation: Option<contact::Detail>,

    /// [`contact::Phone`] of the [`Lead`]'s employer.
    pub employer_phone: Option<contact::Phone>,
}

/// [`DateTime`] when a [`Lead`] was created.
pub type CreationDateTime = DateTimeOf<(Lead, unit::Creation)>;
