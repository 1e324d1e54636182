//! Private key parsing and generation.

use crate::AccountError;
use alloy_primitives::B256;
use alloy_signer_local::PrivateKeySigner;
use deposit_types::{with_0x_prefix, without_0x_prefix, Address, SecretString};
use std::str::FromStr;

/// Number of hex characters in a secp256k1 private key.
const PRIVATE_KEY_HEX_LEN: usize = 64;

/// Parses a hex private key into a signer.
///
/// The key must be exactly 64 hex characters, optionally prefixed with "0x".
/// Surrounding whitespace is ignored.
pub fn parse_private_key(key: &SecretString) -> Result<PrivateKeySigner, AccountError> {
	if key.is_blank() {
		return Err(AccountError::KeyUnavailable(
			"private key is empty".to_string(),
		));
	}

	key.with_exposed(|raw| {
		let trimmed = raw.trim();
		let digits = without_0x_prefix(trimmed);
		if digits.len() != PRIVATE_KEY_HEX_LEN {
			return Err(AccountError::InvalidKey(format!(
				"expected {} hex characters, got {}",
				PRIVATE_KEY_HEX_LEN,
				digits.len()
			)));
		}
		if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(AccountError::InvalidKey(
				"private key contains non-hex characters".to_string(),
			));
		}

		let bytes = B256::from_str(digits)
			.map_err(|e| AccountError::InvalidKey(format!("cannot decode key: {}", e)))?;

		// Rejects the zero key and values outside the curve order.
		PrivateKeySigner::from_bytes(&bytes)
			.map_err(|e| AccountError::InvalidKey(format!("not a valid secp256k1 key: {}", e)))
	})
}

/// Generates a fresh random key.
///
/// Returns the derived address and the key as a 0x-prefixed hex secret.
/// Persisting the key is left to the caller's secret store.
pub fn generate_key() -> (Address, SecretString) {
	let signer = PrivateKeySigner::random();
	let key = SecretString::new(with_0x_prefix(&hex::encode(signer.to_bytes())));
	(signer.address(), key)
}
