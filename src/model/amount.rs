//! Amount type for handling monetary values read from a sheet.
//!
//! Sheet cells come back as formatted strings, so an amount may carry a currency symbol, thousands
//! separators or surrounding whitespace. `Amount::from_str` accepts those. `Amount::coerce` is
//! what the loader uses: anything that still fails to parse becomes zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// Currency symbols that are stripped from the front of an amount before parsing.
const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£', '¥'];

/// Represents a monetary amount.
///
/// # Examples
///
/// ```
/// # use spend_tracker::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("₹1,250.50").unwrap();
/// let b = Amount::from_str("1250.5").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(Amount::coerce("abc"), Amount::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Parses `s`, substituting zero for anything that is not a number.
    pub fn coerce(s: &str) -> Self {
        Amount::from_str(s).unwrap_or(Amount::ZERO)
    }

    /// Formats the amount as `{symbol}1,234.56`, with a leading minus sign for negative values.
    pub fn format(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.abs().round_dp(2);
        format!(
            "{sign}{symbol}{}",
            format_num::format_num!(",.2", abs.to_f64().unwrap_or_default())
        )
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        // "₹50.00" and "-₹50.00" are both accepted
        let without_symbol = unsigned.trim_start_matches(CURRENCY_SYMBOLS).trim_start();
        let without_commas = without_symbol.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(AmountError)?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// Addition and subtraction saturate at `Decimal::MAX` and `Decimal::MIN` instead of panicking,
/// so no cell value can make a total fail.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("4.50").unwrap();
        assert_eq!(amount.value(), dec("4.50"));
    }

    #[test]
    fn test_parse_integer() {
        let amount = Amount::from_str("1000").unwrap();
        assert_eq!(amount.value(), dec("1000"));
    }

    #[test]
    fn test_parse_with_rupee_sign_and_commas() {
        let amount = Amount::from_str("₹1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec("-50.00"));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  12.5 ").unwrap();
        assert_eq!(amount.value(), dec("12.5"));
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1.5e3").unwrap();
        assert_eq!(amount.value(), dec("1500"));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("12abc").is_err());
    }

    #[test]
    fn test_coerce_is_deterministic() {
        assert_eq!(Amount::coerce("abc"), Amount::ZERO);
        assert_eq!(Amount::coerce("abc"), Amount::ZERO);
        assert_eq!(Amount::coerce(""), Amount::ZERO);
        assert_eq!(Amount::coerce("7"), Amount::new(dec("7")));
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Amount::coerce("4.5"), Amount::coerce("4.50"));
    }

    #[test]
    fn test_format() {
        assert_eq!(Amount::new(dec("1234.5")).format("₹"), "₹1,234.50");
        assert_eq!(Amount::new(dec("0")).format("₹"), "₹0.00");
        assert_eq!(Amount::new(dec("-850")).format("₹"), "-₹850.00");
        assert_eq!(Amount::new(dec("1000000.99")).format("$"), "$1,000,000.99");
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec("4.5")).to_string(), "4.50");
    }

    #[test]
    fn test_sum() {
        let amounts = [Amount::coerce("100"), Amount::coerce("50"), Amount::coerce("0.25")];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total.value(), dec("150.25"));
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        let huge = Amount::coerce("79228162514264337593543950335");
        assert_eq!(huge.value(), Decimal::MAX);
        let total: Amount = [huge, huge, Amount::coerce("1")].iter().sum();
        assert_eq!(total.value(), Decimal::MAX);

        let mut running = huge;
        running += huge;
        assert_eq!(running.value(), Decimal::MAX);
        assert_eq!((Amount::ZERO - huge - huge).value(), Decimal::MIN);
    }

    #[test]
    fn test_serde() {
        let amount = Amount::coerce("4.5");
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"4.50\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
