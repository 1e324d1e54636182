//! Configuration module for the deposit workflow.
//!
//! This module loads the endpoint, asset, gas and account settings from a TOML
//! file, resolves `${VAR}` environment references, and validates the result
//! once at startup. The resulting `Config` is passed by reference to the
//! orchestrator; nothing reads configuration from process-wide state later.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["endpoint.toml", "gas.toml"]` to include other config files
//! - Each top-level section must be unique across all files

#[cfg(any(test, feature = "testing"))]
pub mod builders;
mod loader;

use deposit_types::{ChainEndpoint, MAX_ASSET_DECIMALS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only; the full error embeds the whole input.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration of the deposit workflow.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// RPC endpoint, chain id and well-known contract addresses.
	pub endpoint: ChainEndpoint,
	/// The supplied asset.
	pub asset: AssetConfig,
	/// Fixed gas parameters; no fee estimation is performed.
	#[serde(default)]
	pub gas: GasConfig,
	/// Parameters of the `supply` call.
	#[serde(default)]
	pub deposit: DepositConfig,
	/// Where the signing key comes from.
	#[serde(default)]
	pub account: AccountConfig,
}

/// The asset supplied to the pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
	/// Display symbol, e.g. "USDC".
	pub symbol: String,
	/// Decimal exponent used to scale user amounts to raw units.
	pub decimals: u8,
}

/// Gas parameters for the legacy transaction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GasConfig {
	/// Gas price in wei. Defaults to 21 gwei.
	#[serde(default = "default_gas_price_wei")]
	pub gas_price_wei: u64,
	/// Gas limit. Defaults to 500 000.
	#[serde(default = "default_gas_limit")]
	pub gas_limit: u64,
}

impl Default for GasConfig {
	fn default() -> Self {
		Self {
			gas_price_wei: default_gas_price_wei(),
			gas_limit: default_gas_limit(),
		}
	}
}

/// Returns the default gas price of 21 gwei.
fn default_gas_price_wei() -> u64 {
	21_000_000_000
}

/// Returns the default gas limit.
fn default_gas_limit() -> u64 {
	500_000
}

/// Parameters of the `supply` call.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DepositConfig {
	/// Referral code passed to the pool. Defaults to 0.
	#[serde(default)]
	pub referral_code: u16,
}

/// Signing key source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Environment variable holding the hex private key.
	#[serde(default = "default_private_key_env")]
	pub private_key_env: String,
}

impl Default for AccountConfig {
	fn default() -> Self {
		Self {
			private_key_env: default_private_key_env(),
		}
	}
}

fn default_private_key_env() -> String {
	"DEPOSIT_PRIVATE_KEY".to_string()
}

/// Smallest gas limit that can carry any transaction.
const MIN_GAS_LIMIT: u64 = 21_000;

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut output = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						name.as_str()
					)))
				},
			},
		};

		output.push_str(&input[last..whole.start()]);
		output.push_str(&value);
		last = whole.end();
	}
	output.push_str(&input[last..]);

	Ok(output)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;

		let mut loader = loader::ConfigLoader::new(base_dir);
		let config = loader.load_config(file_name).await?;

		tracing::debug!(
			chain_id = config.endpoint.chain_id,
			asset = %config.asset.symbol,
			"Loaded configuration"
		);
		Ok(config)
	}

	/// Builds a configuration from an already resolved table.
	///
	/// Environment references must have been substituted beforehand; values
	/// are taken literally here.
	pub(crate) fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
		let config: Config = toml::Value::Table(table).try_into()?;
		config.validate()?;
		Ok(config)
	}

	/// Gas price as the legacy transaction field type.
	pub fn gas_price(&self) -> u128 {
		u128::from(self.gas.gas_price_wei)
	}

	/// Validates values that the type system cannot express.
	///
	/// Addresses are checksum-validated during deserialization; this covers
	/// the remaining cross-field and range rules.
	fn validate(&self) -> Result<(), ConfigError> {
		let rpc_url = self.endpoint.rpc_url.trim();
		if rpc_url.is_empty() {
			return Err(ConfigError::Validation("endpoint.rpc_url cannot be empty".into()));
		}
		if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"endpoint.rpc_url must be an http(s) URL, got '{}'",
				rpc_url
			)));
		}
		if self.endpoint.chain_id == 0 {
			return Err(ConfigError::Validation(
				"endpoint.chain_id must be greater than 0".into(),
			));
		}
		if self.endpoint.pool_address == self.endpoint.asset_address {
			return Err(ConfigError::Validation(
				"endpoint.pool_address and endpoint.asset_address must differ".into(),
			));
		}

		if self.asset.symbol.trim().is_empty() {
			return Err(ConfigError::Validation("asset.symbol cannot be empty".into()));
		}
		if self.asset.decimals > MAX_ASSET_DECIMALS {
			return Err(ConfigError::Validation(format!(
				"asset.decimals cannot exceed {}",
				MAX_ASSET_DECIMALS
			)));
		}

		if self.gas.gas_price_wei == 0 {
			return Err(ConfigError::Validation(
				"gas.gas_price_wei must be greater than 0".into(),
			));
		}
		if self.gas.gas_limit < MIN_GAS_LIMIT {
			return Err(ConfigError::Validation(format!(
				"gas.gas_limit must be at least {}",
				MIN_GAS_LIMIT
			)));
		}

		if self.account.private_key_env.trim().is_empty() {
			return Err(ConfigError::Validation(
				"account.private_key_env cannot be empty".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		Config::from_table(toml::from_str(&resolved)?)
	}
}
