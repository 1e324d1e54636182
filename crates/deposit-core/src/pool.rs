//! Read-only lending pool queries.
//!
//! Wraps `getUserAccountData` and `getReserveData` as `eth_call`s through
//! the same chain client the deposit path uses.

use alloy_sol_types::{sol, SolCall, SolValue};
use deposit_rpc::{ChainClient, EndpointError};
use deposit_types::{format_token_amount, Address, U256};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

sol! {
	#[derive(Debug, PartialEq, Eq)]
	struct ReserveConfigurationMap {
		uint256 data;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct ReserveData {
		ReserveConfigurationMap configuration;
		uint128 liquidityIndex;
		uint128 currentLiquidityRate;
		uint128 variableBorrowIndex;
		uint128 currentVariableBorrowRate;
		uint128 currentStableBorrowRate;
		uint40 lastUpdateTimestamp;
		uint16 id;
		address aTokenAddress;
		address stableDebtTokenAddress;
		address variableDebtTokenAddress;
		address interestRateStrategyAddress;
		uint128 accruedToTreasury;
		uint128 unbacked;
		uint128 isolationModeTotalDebt;
	}

	interface IPool {
		function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;

		function getUserAccountData(address user) external view returns (
			uint256 totalCollateralBase,
			uint256 totalDebtBase,
			uint256 availableBorrowsBase,
			uint256 currentLiquidationThreshold,
			uint256 ltv,
			uint256 healthFactor
		);

		function getReserveData(address asset) external view returns (ReserveData memory);
	}
}

/// Decimals of the pool's base currency (USD, 8 decimals).
const BASE_CURRENCY_DECIMALS: u8 = 8;
/// Health factor is a wad.
const WAD_DECIMALS: u8 = 18;
/// Rates and indexes are rays.
const RAY_DECIMALS: u8 = 27;
/// A ray rate rendered as a percentage.
const RAY_PERCENT_DECIMALS: u8 = RAY_DECIMALS - 2;
/// LTV and liquidation threshold are basis points.
const BPS_PERCENT_DECIMALS: u8 = 2;

/// Errors that can occur while reading pool state.
#[derive(Debug, Error)]
pub enum PoolReadError {
	#[error(transparent)]
	Endpoint(#[from] EndpointError),
	#[error("Pool at {0} returned no data")]
	EmptyResponse(Address),
	#[error("Failed to decode pool response: {0}")]
	Decode(String),
}

/// A user's aggregate position in the pool, in base currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPosition {
	pub total_collateral_base: U256,
	pub total_debt_base: U256,
	pub available_borrows_base: U256,
	/// Basis points.
	pub current_liquidation_threshold: U256,
	/// Basis points.
	pub ltv: U256,
	/// Wad; `U256::MAX` when there is no debt.
	pub health_factor: U256,
}

impl fmt::Display for AccountPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(
			f,
			"Total collateral:      {}",
			format_token_amount(self.total_collateral_base, BASE_CURRENCY_DECIMALS)
		)?;
		writeln!(
			f,
			"Total debt:            {}",
			format_token_amount(self.total_debt_base, BASE_CURRENCY_DECIMALS)
		)?;
		writeln!(
			f,
			"Available borrows:     {}",
			format_token_amount(self.available_borrows_base, BASE_CURRENCY_DECIMALS)
		)?;
		writeln!(
			f,
			"Liquidation threshold: {}%",
			format_token_amount(self.current_liquidation_threshold, BPS_PERCENT_DECIMALS)
		)?;
		writeln!(
			f,
			"LTV:                   {}%",
			format_token_amount(self.ltv, BPS_PERCENT_DECIMALS)
		)?;
		if self.health_factor == U256::MAX {
			write!(f, "Health factor:         n/a (no debt)")
		} else {
			write!(
				f,
				"Health factor:         {}",
				format_token_amount(self.health_factor, WAD_DECIMALS)
			)
		}
	}
}

/// The parts of a reserve's state worth showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveSnapshot {
	pub id: u16,
	pub a_token: Address,
	pub stable_debt_token: Address,
	pub variable_debt_token: Address,
	pub interest_rate_strategy: Address,
	/// Ray.
	pub liquidity_index: u128,
	/// Ray, annualized.
	pub current_liquidity_rate: u128,
	/// Ray, annualized.
	pub current_variable_borrow_rate: u128,
	pub last_update_timestamp: u64,
}

impl From<ReserveData> for ReserveSnapshot {
	fn from(data: ReserveData) -> Self {
		Self {
			id: data.id,
			a_token: data.aTokenAddress,
			stable_debt_token: data.stableDebtTokenAddress,
			variable_debt_token: data.variableDebtTokenAddress,
			interest_rate_strategy: data.interestRateStrategyAddress,
			liquidity_index: data.liquidityIndex,
			current_liquidity_rate: data.currentLiquidityRate,
			current_variable_borrow_rate: data.currentVariableBorrowRate,
			last_update_timestamp: data.lastUpdateTimestamp.to::<u64>(),
		}
	}
}

impl fmt::Display for ReserveSnapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Reserve id:            {}", self.id)?;
		writeln!(f, "aToken:                {}", self.a_token)?;
		writeln!(f, "Variable debt token:   {}", self.variable_debt_token)?;
		writeln!(
			f,
			"Liquidity index:       {}",
			format_token_amount(U256::from(self.liquidity_index), RAY_DECIMALS)
		)?;
		writeln!(
			f,
			"Supply rate:           {}%",
			format_token_amount(U256::from(self.current_liquidity_rate), RAY_PERCENT_DECIMALS)
		)?;
		writeln!(
			f,
			"Variable borrow rate:  {}%",
			format_token_amount(
				U256::from(self.current_variable_borrow_rate),
				RAY_PERCENT_DECIMALS
			)
		)?;
		write!(f, "Last update:           {}", self.last_update_timestamp)
	}
}

/// Issues read-only calls against one pool contract.
pub struct PoolReader {
	chain: Arc<dyn ChainClient>,
	pool: Address,
}

impl PoolReader {
	pub fn new(chain: Arc<dyn ChainClient>, pool: Address) -> Self {
		Self { chain, pool }
	}

	/// Reads the aggregate position of `user`.
	pub async fn user_account_data(&self, user: Address) -> Result<AccountPosition, PoolReadError> {
		let data = IPool::getUserAccountDataCall { user }.abi_encode();
		let raw = self.chain.call(self.pool, data.into()).await?;
		if raw.is_empty() {
			return Err(PoolReadError::EmptyResponse(self.pool));
		}

		let ret = IPool::getUserAccountDataCall::abi_decode_returns(&raw)
			.map_err(|e| PoolReadError::Decode(e.to_string()))?;

		tracing::debug!(user = %user, pool = %self.pool, "Read user account data");
		Ok(AccountPosition {
			total_collateral_base: ret.totalCollateralBase,
			total_debt_base: ret.totalDebtBase,
			available_borrows_base: ret.availableBorrowsBase,
			current_liquidation_threshold: ret.currentLiquidationThreshold,
			ltv: ret.ltv,
			health_factor: ret.healthFactor,
		})
	}

	/// Reads the reserve state of `asset`.
	pub async fn reserve_data(&self, asset: Address) -> Result<ReserveSnapshot, PoolReadError> {
		let data = IPool::getReserveDataCall { asset }.abi_encode();
		let raw = self.chain.call(self.pool, data.into()).await?;
		if raw.is_empty() {
			return Err(PoolReadError::EmptyResponse(self.pool));
		}

		// The struct is static, so the return tuple has the struct's layout.
		let reserve =
			ReserveData::abi_decode(&raw).map_err(|e| PoolReadError::Decode(e.to_string()))?;

		tracing::debug!(asset = %asset, pool = %self.pool, "Read reserve data");
		Ok(reserve.into())
	}
}
