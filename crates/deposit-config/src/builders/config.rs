//! Configuration builder for tests.
//!
//! Produces a valid `Config` pointing at a local development chain with
//! well-known addresses, so tests only spell out the fields they care about.

use crate::{AccountConfig, AssetConfig, Config, DepositConfig, GasConfig};
use deposit_types::{Address, ChainEndpoint};

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	rpc_url: String,
	chain_id: u64,
	pool_address: Address,
	asset_address: Address,
	beneficiary_address: Address,
	asset_symbol: String,
	asset_decimals: u8,
	gas_price_wei: u64,
	gas_limit: u64,
	referral_code: u16,
	private_key_env: String,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a builder for a local chain (id 31337) with a 6-decimal asset.
	pub fn new() -> Self {
		Self {
			rpc_url: "http://localhost:8545".to_string(),
			chain_id: 31337,
			pool_address: Address::repeat_byte(0x01),
			asset_address: Address::repeat_byte(0x02),
			beneficiary_address: Address::repeat_byte(0x03),
			asset_symbol: "USDC".to_string(),
			asset_decimals: 6,
			gas_price_wei: 21_000_000_000,
			gas_limit: 500_000,
			referral_code: 0,
			private_key_env: "DEPOSIT_PRIVATE_KEY".to_string(),
		}
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn pool_address(mut self, address: Address) -> Self {
		self.pool_address = address;
		self
	}

	pub fn asset_address(mut self, address: Address) -> Self {
		self.asset_address = address;
		self
	}

	pub fn beneficiary_address(mut self, address: Address) -> Self {
		self.beneficiary_address = address;
		self
	}

	pub fn asset_decimals(mut self, decimals: u8) -> Self {
		self.asset_decimals = decimals;
		self
	}

	pub fn gas(mut self, gas_price_wei: u64, gas_limit: u64) -> Self {
		self.gas_price_wei = gas_price_wei;
		self.gas_limit = gas_limit;
		self
	}

	pub fn referral_code(mut self, code: u16) -> Self {
		self.referral_code = code;
		self
	}

	pub fn private_key_env(mut self, name: impl Into<String>) -> Self {
		self.private_key_env = name.into();
		self
	}

	/// Builds the `Config` without running validation.
	pub fn build(self) -> Config {
		Config {
			endpoint: ChainEndpoint {
				rpc_url: self.rpc_url,
				chain_id: self.chain_id,
				pool_address: self.pool_address,
				asset_address: self.asset_address,
				beneficiary_address: self.beneficiary_address,
			},
			asset: AssetConfig {
				symbol: self.asset_symbol,
				decimals: self.asset_decimals,
			},
			gas: GasConfig {
				gas_price_wei: self.gas_price_wei,
				gas_limit: self.gas_limit,
			},
			deposit: DepositConfig {
				referral_code: self.referral_code,
			},
			account: AccountConfig {
				private_key_env: self.private_key_env,
			},
		}
	}
}
