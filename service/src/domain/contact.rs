//! Contact details shared by [`Deal`] clients and [`Lead`]s.
//!
//! [`Deal`]: crate::domain::Deal
//! [`Lead`]: crate::domain::Lead

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;

/// Given or family name of a person.
///
/// May be empty, because a contact is sometimes known by a single name only.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Splits the provided full name into a given [`Name`] and a family
    /// [`Name`].
    ///
    /// The last word is considered the family name, unless it's the only one.
    #[must_use]
    pub fn split_full(full_name: &str) -> (Self, Self) {
        let words = full_name.split_whitespace().collect::<Vec<_>>();
        match words.as_slice() {
            [] => (Self::default(), Self::default()),
            [single] => (Self((*single).to_owned()), Self::default()),
            [given @ .., family] => {
                (Self(given.join(" ")), Self((*family).to_owned()))
            }
        }
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a contact.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: a local part and a
        /// dotted domain without whitespace.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a contact.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^([+]?\d{1,2}[-\s]?|)\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{4}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Free-form detail of a contact (occupation, jurisdiction, etc.).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Detail(String);

impl Detail {
    /// Creates a new [`Detail`] if the given `text` is non-empty after
    /// trimming.
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref().trim();
        (!text.is_empty() && text.len() <= 1024)
            .then(|| Self(text.to_owned()))
    }
}

impl FromStr for Detail {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Detail`")
    }
}

/// Registered business entity acting as a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Corporation {
    /// Registered name of this [`Corporation`].
    pub name: Detail,

    /// Incorporation number of this [`Corporation`], if known.
    pub incorporation_number: Option<Detail>,

    /// Jurisdiction this [`Corporation`] is registered in, if known.
    pub jurisdiction: Option<Detail>,
}

#[cfg(test)]
mod spec {
    use super::{Email, Name, Phone};

    #[test]
    fn splits_full_name() {
        let (given, family) = Name::split_full("  Jane  Q. Doe ");
        assert_eq!(given.to_string(), "Jane Q.");
        assert_eq!(family.to_string(), "Doe");

        let (given, family) = Name::split_full("Cher");
        assert_eq!(given.to_string(), "Cher");
        assert_eq!(family.to_string(), "");

        let (given, family) = Name::split_full("   ");
        assert_eq!(given.to_string(), "");
        assert_eq!(family.to_string(), "");
    }

    #[test]
    fn validates_email() {
        assert!(Email::new("varnesh@prcoach.ca").is_some());
        assert!(Email::new("sarah@miller-assets.com").is_some());

        assert!(Email::new("").is_none());
        assert!(Email::new("no-at-sign.ca").is_none());
        assert!(Email::new("two words@mail.ca").is_none());
    }

    #[test]
    fn validates_phone() {
        assert!(Phone::new("4165408632").is_some());
        assert!(Phone::new("905-555-0122").is_some());
        assert!(Phone::new("+1 (416) 555-0199").is_some());

        assert!(Phone::new("555").is_none());
        assert!(Phone::new("phone").is_none());
    }
}
