//! User-facing deposit amounts.
//!
//! Amounts arrive as decimal strings in whole-token units ("10", "0.5") and
//! must be scaled by the asset's decimal exponent before they are ABI encoded.
//! Scaling is exact: an amount with more fractional digits than the asset
//! supports is rejected instead of being rounded.

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest decimal exponent accepted for an asset.
pub const MAX_ASSET_DECIMALS: u8 = 18;

/// Errors that can occur while parsing or scaling an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
	/// The input was empty or whitespace.
	#[error("Amount is empty")]
	Empty,
	/// The input is not a plain decimal number.
	#[error("Amount '{0}' is not a decimal number")]
	Malformed(String),
	/// The input parsed but is zero or negative.
	#[error("Amount must be greater than zero, got {0}")]
	NotPositive(String),
	/// The input has more fractional digits than the asset can represent.
	#[error("Amount {amount} has more than {decimals} fractional digits")]
	TooPrecise { amount: String, decimals: u8 },
	/// The scaled amount does not fit the supported range.
	#[error("Amount {0} is too large")]
	Overflow(String),
	/// The asset declares a decimal exponent outside the supported range.
	#[error("Unsupported asset decimals: {0} (max {MAX_ASSET_DECIMALS})")]
	UnsupportedDecimals(u8),
}

/// A strictly positive amount expressed in whole-token units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositAmount(Decimal);

impl DepositAmount {
	/// Parses a user-supplied decimal string.
	pub fn parse(input: &str) -> Result<Self, AmountError> {
		let trimmed = input.trim();
		if trimmed.is_empty() {
			return Err(AmountError::Empty);
		}

		let (negative, whole, fraction) =
			split_plain_decimal(trimmed).ok_or_else(|| AmountError::Malformed(trimmed.to_string()))?;

		// Trailing fractional zeros carry no precision.
		let fraction = fraction.trim_end_matches('0');
		if fraction.len() > usize::from(MAX_ASSET_DECIMALS) {
			return Err(AmountError::TooPrecise {
				amount: trimmed.to_string(),
				decimals: MAX_ASSET_DECIMALS,
			});
		}
		let sign = if negative { "-" } else { "" };
		let exact = if fraction.is_empty() {
			format!("{}{}", sign, whole)
		} else {
			format!("{}{}.{}", sign, whole, fraction)
		};

		// `from_str_exact` fails instead of rounding when the digits do not fit.
		let value = Decimal::from_str_exact(&exact).map_err(|_| {
			if fraction.is_empty() {
				AmountError::Overflow(trimmed.to_string())
			} else {
				AmountError::TooPrecise {
					amount: trimmed.to_string(),
					decimals: MAX_ASSET_DECIMALS,
				}
			}
		})?;

		if value <= Decimal::ZERO {
			return Err(AmountError::NotPositive(trimmed.to_string()));
		}

		Ok(Self(value.normalize()))
	}

	/// Returns the amount in whole-token units.
	pub fn value(&self) -> Decimal {
		self.0
	}

	/// Scales the amount to raw integer units of an asset with `decimals`
	/// decimal places, e.g. "10" with 6 decimals becomes 10_000_000.
	pub fn to_base_units(&self, decimals: u8) -> Result<U256, AmountError> {
		if decimals > MAX_ASSET_DECIMALS {
			return Err(AmountError::UnsupportedDecimals(decimals));
		}

		if self.0.scale() > u32::from(decimals) {
			return Err(AmountError::TooPrecise {
				amount: self.0.to_string(),
				decimals,
			});
		}

		let factor = Decimal::from_i128_with_scale(10i128.pow(u32::from(decimals)), 0);
		let scaled = self
			.0
			.checked_mul(factor)
			.ok_or_else(|| AmountError::Overflow(self.0.to_string()))?;

		// Exact: the scale check above leaves no fractional part.
		let units = scaled
			.trunc()
			.to_u128()
			.ok_or_else(|| AmountError::Overflow(self.0.to_string()))?;

		Ok(U256::from(units))
	}
}

/// Splits `[+-]digits[.digits]` into its sign, whole digits and fraction.
///
/// Exponents, separators and bare dots are rejected.
fn split_plain_decimal(input: &str) -> Option<(bool, &str, &str)> {
	let negative = input.starts_with('-');
	let unsigned = input.strip_prefix(['+', '-']).unwrap_or(input);
	let (digits, fraction) = match unsigned.split_once('.') {
		Some((digits, fraction)) => (digits, fraction),
		None => (unsigned, ""),
	};

	let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
	if digits.is_empty() || !all_digits(digits) || !all_digits(fraction) {
		return None;
	}
	if unsigned.contains('.') && fraction.is_empty() {
		return None;
	}

	Some((negative, digits, fraction))
}

impl FromStr for DepositAmount {
	type Err = AmountError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for DepositAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}
