//! Endpoint configuration for the deposit workflow.
//!
//! Defines the RPC endpoint, the expected chain identifier and the
//! well-known contract addresses a deposit touches. Addresses are parsed
//! with EIP-55 checksum validation so a mistyped address fails at load time
//! rather than sending funds to the wrong contract.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};

/// Configuration for the chain a deposit is sent to.
///
/// # Fields
///
/// * `rpc_url` - The HTTP(S) JSON-RPC endpoint
/// * `chain_id` - The chain identifier the endpoint must report
/// * `pool_address` - Lending pool contract receiving the `supply` call
/// * `asset_address` - Token contract of the supplied asset
/// * `beneficiary_address` - Address credited with the supplied position
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainEndpoint {
	pub rpc_url: String,
	pub chain_id: u64,
	#[serde(deserialize_with = "deserialize_checksummed_address")]
	pub pool_address: Address,
	#[serde(deserialize_with = "deserialize_checksummed_address")]
	pub asset_address: Address,
	#[serde(deserialize_with = "deserialize_checksummed_address")]
	pub beneficiary_address: Address,
}

/// Parses a `0x`-prefixed, EIP-55 checksummed address.
///
/// All-lowercase or all-uppercase input carries no checksum and is rejected.
pub fn parse_checksummed_address(value: &str) -> Result<Address, String> {
	if !value.starts_with("0x") {
		return Err(format!("Address '{}' must start with 0x", value));
	}
	Address::parse_checksummed(value, None)
		.map_err(|e| format!("Invalid checksummed address '{}': {}", value, e))
}

/// Helper function to deserialize a checksummed address from TOML.
pub fn deserialize_checksummed_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	parse_checksummed_address(&raw).map_err(serde::de::Error::custom)
}
