//! String formatting utilities.
//!
//! Hex prefix handling for keys and addresses, raw-to-human amount rendering
//! for diagnostics and logs, and hash truncation for compact log lines.

use alloy_primitives::U256;

/// Shortens a hex string to its first 10 characters for log output.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 10 {
		id.to_string()
	} else {
		format!("{}..", &id[..10])
	}
}

/// Adds a "0x" prefix unless one (in either case) is already present.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Strips a leading "0x" or "0X" if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Renders a raw on-chain amount in whole-token units.
///
/// Trailing fractional zeros are dropped, so 1_500_000 with 6 decimals
/// renders as "1.5" and 10^18 with 18 decimals as "1".
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
	let digits = amount.to_string();
	if decimals == 0 {
		return digits;
	}

	let places = decimals as usize;
	let (integer_part, fraction_part) = if digits.len() <= places {
		("0".to_string(), format!("{:0>width$}", digits, width = places))
	} else {
		let split = digits.len() - places;
		(digits[..split].to_string(), digits[split..].to_string())
	};

	let fraction = fraction_part.trim_end_matches('0');
	if fraction.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, fraction)
	}
}
