//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::DateTimeOf;

/// Format of a [`Date`] in its string representation (`YYYY-MM-DD`).
const FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] out of the provided components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the [`Date`] the provided [`DateTimeOf`] falls on (in UTC).
    #[must_use]
    pub fn of<Of: ?Sized>(dt: DateTimeOf<Of>) -> Self {
        Self(time::OffsetDateTime::from(dt).date())
    }

    /// Returns the current [`Date`] (in UTC).
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Shifts this [`Date`] by the provided number of calendar `days`.
    ///
    /// Saturates at the supported range boundaries.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        let bound = if days < 0 {
            time::Date::MIN
        } else {
            time::Date::MAX
        };
        Self(self.0.checked_add(time::Duration::days(days)).unwrap_or(bound))
    }

    /// Shifts this [`Date`] forward by the provided number of business
    /// `days`, skipping Saturdays and Sundays.
    #[must_use]
    pub fn add_business_days(self, days: u32) -> Self {
        let mut date = self;
        let mut left = days;
        while left > 0 {
            date = date.add_days(1);
            if !date.is_weekend() {
                left -= 1;
            }
        }
        date
    }

    /// Indicates whether this [`Date`] falls on a Saturday or a Sunday.
    #[must_use]
    pub fn is_weekend(self) -> bool {
        matches!(
            self.0.weekday(),
            time::Weekday::Saturday | time::Weekday::Sunday,
        )
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s.trim(), FORMAT)
            .map(Self)
            .map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `YYYY-MM-DD` date: {_0}")]
pub struct ParseError(time::error::Parse);

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in a `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    #[test]
    fn parses_and_formats() {
        let date: Date = "2026-03-15".parse().unwrap();
        assert_eq!(date, Date::from_ymd(2026, 3, 15).unwrap());
        assert_eq!(date.to_string(), "2026-03-15");
        assert_eq!(date.year(), 2026);

        assert!("2026-02-30".parse::<Date>().is_err());
        assert!("15/03/2026".parse::<Date>().is_err());
        assert!(Date::from_ymd(2026, 13, 1).is_none());
    }

    #[test]
    fn adds_days() {
        let date = Date::from_ymd(2026, 2, 27).unwrap();

        assert_eq!(date.add_days(2), Date::from_ymd(2026, 3, 1).unwrap());
        assert_eq!(date.add_days(-27), Date::from_ymd(2026, 1, 31).unwrap());
    }

    #[test]
    fn adds_business_days() {
        // Friday.
        let date = Date::from_ymd(2026, 3, 13).unwrap();
        assert!(!date.is_weekend());

        assert_eq!(date.add_business_days(0), date);
        assert_eq!(
            date.add_business_days(1),
            Date::from_ymd(2026, 3, 16).unwrap(),
        );
        assert_eq!(
            date.add_business_days(5),
            Date::from_ymd(2026, 3, 20).unwrap(),
        );
        assert!(Date::from_ymd(2026, 3, 14).unwrap().is_weekend());
    }
}
