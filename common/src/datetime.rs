//! Timestamps.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, fmt, marker::PhantomData};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Timestamp not bound to any particular event.
pub type DateTime = DateTimeOf;

/// UTC timestamp of the `Of` event, precise to a microsecond (as Postgres
/// stores it).
///
/// `Of` only tags the timestamp, so timestamps of different events cannot be
/// mixed up without an explicit [`DateTimeOf::coerce()`].
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// UTC timestamp truncated to microseconds.
    utc: OffsetDateTime,

    /// Event tag.
    of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Wraps the provided timestamp, converting it to UTC and dropping
    /// sub-microsecond precision.
    fn truncated(dt: OffsetDateTime) -> Self {
        let utc = dt.to_offset(time::UtcOffset::UTC);
        let nanos = utc.nanosecond() - utc.nanosecond() % 1_000;
        Self {
            utc: utc.replace_nanosecond(nanos).unwrap_or(utc),
            of: PhantomData,
        }
    }

    /// Returns the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self::truncated(OffsetDateTime::now_utc())
    }

    /// Returns the timestamp of the provided number of seconds since the Unix
    /// epoch.
    ///
    /// [`None`] is returned if it's out of the supported range.
    #[must_use]
    pub fn from_unix_timestamp(secs: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(secs)
            .ok()
            .map(Self::truncated)
    }

    /// Parses an [RFC 3339] timestamp.
    ///
    /// # Errors
    ///
    /// If the input isn't a valid [RFC 3339] timestamp.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map(Self::truncated)
            .map_err(ParseError)
    }

    /// Formats this timestamp as [RFC 3339].
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        // Fails only for years beyond 9999.
        self.utc.format(&Rfc3339).unwrap_or_default()
    }

    /// Re-tags this timestamp as the one of the `NewOf` event.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            utc: self.utc,
            of: PhantomData,
        }
    }
}

/// Error of parsing a [`DateTime`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid RFC 3339 timestamp: {_0}")]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> fmt::Debug for DateTimeOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime({})", self.to_rfc3339())
    }
}

impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}

impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}

impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.utc
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        OffsetDateTime::from_sql(ty, raw).map(Self::truncated)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.utc.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Timestamp in [RFC 3339] format, precise to a microsecond.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!("`DateTime` expects a string, found: {input}")
            })?;
            Self::from_rfc3339(s).map_err(|e| e.to_string())
        }
    }
}

#[cfg(test)]
mod spec {
    use super::DateTime;

    #[test]
    fn formats_as_utc_rfc3339() {
        let dt = DateTime::from_rfc3339("2026-03-01T09:30:00.123456789-05:00")
            .unwrap();

        assert_eq!(dt.to_rfc3339(), "2026-03-01T14:30:00.123456Z");
    }

    #[test]
    fn orders_chronologically() {
        let earlier = DateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let later = DateTime::from_unix_timestamp(1_700_000_001).unwrap();

        assert!(earlier < later);
        assert_eq!(earlier, earlier.coerce::<u8>().coerce());
    }

    #[test]
    fn rejects_non_rfc3339() {
        assert!(DateTime::from_rfc3339("2026-03-01").is_err());
    }
}
