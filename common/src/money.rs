//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        write!(f, "{}{currency}", amount.normalize())
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let at = s
            .len()
            .checked_sub(3)
            .filter(|at| *at > 0 && s.is_char_boundary(*at))
            .ok_or("expected an amount followed by a currency code")?;
        let (amount, currency) = s.split_at(at);
        Ok(Self {
            amount: amount.parse().map_err(|_| "invalid amount")?,
            currency: currency.parse().map_err(|_| "unknown currency")?,
        })
    }
}

impl Money {
    /// Creates a new [`Money`] amount in Canadian dollars.
    #[must_use]
    pub fn cad(amount: Decimal) -> Self {
        Self {
            amount,
            currency: Currency::Cad,
        }
    }

    /// Parses a human-entered amount of [`Currency::Cad`], tolerating a
    /// leading `$`, thousands separators and surrounding whitespace.
    ///
    /// [`None`] is returned if the input is empty, negative or not a number.
    #[must_use]
    pub fn parse_cad(input: &str) -> Option<Self> {
        let cleaned = input
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect::<String>();
        let amount = Decimal::from_str(&cleaned).ok()?;
        (!amount.is_sign_negative()).then(|| Self::cad(amount))
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Canadian Dollar."]
        Cad = 1,

        #[doc = "US Dollar."]
        Usd = 2,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Amount of money followed by its three-letter currency code (e.g.
    /// `899999.99CAD` or `1250000CAD`).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| format!("`Money` expects a string: {input}"))?
                .parse()
                .map_err(|e: &str| format!("invalid `Money`: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn cad(amount: &str) -> Money {
        Money::cad(amount.parse::<Decimal>().unwrap())
    }

    #[test]
    fn parses_amount_with_currency() {
        assert_eq!("123.45CAD".parse::<Money>(), Ok(cad("123.45")));
        assert_eq!(
            "10USD".parse::<Money>().map(|m| m.currency),
            Ok(Currency::Usd),
        );

        assert!("123.45".parse::<Money>().is_err());
        assert!("CAD".parse::<Money>().is_err());
        assert!("12.3Cad".parse::<Money>().is_err());
        assert!("twelveCAD".parse::<Money>().is_err());
    }

    #[test]
    fn prints_whole_amounts_without_fraction() {
        assert_eq!(cad("899999.99").to_string(), "899999.99CAD");
        assert_eq!(cad("1250000.00").to_string(), "1250000CAD");
        assert_eq!(cad("0").to_string(), "0CAD");
    }

    #[test]
    fn parses_entered_cad_amounts() {
        assert_eq!(Money::parse_cad("$1,250,000"), Some(cad("1250000")));
        assert_eq!(Money::parse_cad(" 899999.99 "), Some(cad("899999.99")));

        assert_eq!(Money::parse_cad(""), None);
        assert_eq!(Money::parse_cad("abc"), None);
        assert_eq!(Money::parse_cad("-5"), None);
    }
}
