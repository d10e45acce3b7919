//! [`Percent`] definition.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Percentage within `0..=100`.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Nothing done yet.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Everything done.
    pub const FULL: Self = Self(Decimal::ONE_HUNDRED);

    /// Computes the share of `part` in `whole`, rounded to the nearest
    /// integer.
    ///
    /// Gives [`Percent::ZERO`] for an empty `whole`, and never exceeds
    /// [`Percent::FULL`].
    #[must_use]
    pub fn of(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let share = Decimal::from(part.min(whole)) * Decimal::ONE_HUNDRED
            / Decimal::from(whole);
        Self(share.round())
    }

    /// Returns the value of this [`Percent`].
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = &'static str;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        (Self::ZERO.0..=Self::FULL.0)
            .contains(&value)
            .then_some(Self(value))
            .ok_or("percent must be within 0..=100")
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim().trim_end_matches('%'))
            .map_err(|_| "percent must be a number")?
            .try_into()
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Percentage within `0..=100`, as a decimal string.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(p: &Percent) -> Value<S> {
            Value::scalar(p.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| format!("`Percent` expects a string: {input}"))?
                .parse()
                .map_err(|e: &str| format!("invalid `Percent`: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    #[test]
    fn rounds_shares() {
        assert_eq!(Percent::of(0, 0), Percent::ZERO);
        assert_eq!(Percent::of(0, 4), Percent::ZERO);
        assert_eq!(Percent::of(1, 4).value(), Decimal::from(25));
        assert_eq!(Percent::of(2, 3).value(), Decimal::from(67));
        assert_eq!(Percent::of(4, 4), Percent::FULL);
        assert_eq!(Percent::of(5, 4), Percent::FULL);
    }

    #[test]
    fn parses_within_bounds() {
        assert_eq!("0".parse::<Percent>(), Ok(Percent::ZERO));
        assert_eq!("100%".parse::<Percent>(), Ok(Percent::FULL));
        assert!("45.5".parse::<Percent>().is_ok());

        assert!("-1".parse::<Percent>().is_err());
        assert!("100.1".parse::<Percent>().is_err());
        assert!("half".parse::<Percent>().is_err());
    }
}
