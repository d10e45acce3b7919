//! GraphQL scalar helpers.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Represents a string-backed GraphQL scalar via the validated domain type
/// `Of` it wraps.
///
/// Meant for `#[graphql(with = scalar::Via::<Of>)]`: the wrapper must be
/// [`AsRef<Of>`] for output and [`From<Of>`] for input, while `Of` is
/// printed with its [`fmt::Display`] and validated with its [`FromStr`].
#[derive(Debug)]
pub struct Via<Of>(PhantomData<Of>);

impl<Of> Via<Of> {
    /// Outputs the wrapped `Of` value as a GraphQL string.
    pub fn to_output<W, S>(value: &W) -> Value<S>
    where
        Of: fmt::Display,
        W: AsRef<Of>,
        S: ScalarValue,
    {
        Value::scalar(value.as_ref().to_string())
    }

    /// Validates a GraphQL string input as an `Of` value and wraps it.
    ///
    /// # Errors
    ///
    /// If the input isn't a string, or `Of` rejects it.
    pub fn from_input<W, S>(input: &InputValue<S>) -> Result<W, String>
    where
        Of: FromStr,
        Of::Err: fmt::Display,
        W: From<Of> + GraphQLType<S, TypeInfo = ()>,
        S: ScalarValue,
    {
        let scalar = W::name(&()).unwrap_or("String");
        let raw = input.as_string_value().ok_or_else(|| {
            format!("`{scalar}` expects a string, found: {input}")
        })?;
        raw.parse::<Of>()
            .map(W::from)
            .map_err(|e| format!("`{scalar}` cannot be \"{raw}\": {e}"))
    }

    /// Parses a literal token of the scalar as a string.
    ///
    /// # Errors
    ///
    /// If the token isn't a string literal.
    pub fn parse_token<S: ScalarValue>(
        token: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(token)
    }
}
