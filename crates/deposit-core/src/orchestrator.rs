//! Deposit orchestration.
//!
//! One call to `deposit` is one attempt: validate the amount, resolve the
//! signer, run the pre-flight checks in order (connectivity, balance, asset
//! contract, pool contract), fetch the nonce once, build, sign and broadcast.
//! Every step gates the next and the first failure ends the attempt. There is
//! no retry; calling again starts a fresh attempt with fresh checks and a
//! fresh nonce.

use crate::builder::TransactionBuilder;
use crate::pool::PoolReader;
use crate::state::{DepositAttempt, DepositStage};
use crate::{ContractRole, DepositError};
use deposit_account::SigningIdentitySource;
use deposit_config::Config;
use deposit_rpc::ChainClient;
use deposit_types::{
	format_token_amount, truncate_id, Address, CheckName, DepositAmount, DiagnosticReport,
	TransactionHash,
};
use std::sync::Arc;
use tracing::instrument;

/// Decimals of the chain's native currency, used for balance display.
const NATIVE_DECIMALS: u8 = 18;

/// Everything observed during one deposit attempt.
#[derive(Debug)]
pub struct DepositOutcome {
	pub result: Result<TransactionHash, DepositError>,
	/// Stages visited, ending in a terminal stage.
	pub attempt: DepositAttempt,
	/// Pre-flight checks that ran before the attempt ended.
	pub report: DiagnosticReport,
}

/// Drives deposit attempts against one configured pool.
///
/// Holds only immutable configuration and shared handles, so concurrent
/// attempts share no mutable state.
pub struct DepositOrchestrator {
	config: Config,
	chain: Arc<dyn ChainClient>,
	signer: Arc<dyn SigningIdentitySource>,
}

impl DepositOrchestrator {
	pub fn new(
		config: Config,
		chain: Arc<dyn ChainClient>,
		signer: Arc<dyn SigningIdentitySource>,
	) -> Self {
		Self {
			config,
			chain,
			signer,
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// A reader for the configured pool sharing this orchestrator's client.
	pub fn pool_reader(&self) -> PoolReader {
		PoolReader::new(self.chain.clone(), self.config.endpoint.pool_address)
	}

	/// Address of the signing identity.
	pub async fn signer_address(&self) -> Result<Address, DepositError> {
		self.signer.address().await.map_err(|e| {
			tracing::warn!(error = %e, "Failed to load signing identity");
			DepositError::KeyLoad(e.to_string())
		})
	}

	/// Supplies `amount` whole tokens of the configured asset to the pool.
	///
	/// Returns the hash reported by the endpoint. Acceptance by the endpoint
	/// does not imply inclusion in a block.
	#[instrument(skip(self), fields(chain_id = self.config.endpoint.chain_id))]
	pub async fn deposit(&self, amount: &str) -> Result<TransactionHash, DepositError> {
		self.deposit_traced(amount).await.result
	}

	/// Like `deposit`, but also returns the visited stages and the checks
	/// that ran.
	pub async fn deposit_traced(&self, amount: &str) -> DepositOutcome {
		let mut attempt = DepositAttempt::new();
		let mut report = DiagnosticReport::new();
		let result = self.run_deposit(amount, &mut attempt, &mut report).await;

		let terminal = match &result {
			Ok(hash) => {
				tracing::info!(tx_hash = %hash, "Deposit submitted");
				DepositStage::Succeeded
			},
			Err(e) => {
				tracing::warn!(
					kind = ?e.kind(),
					class = ?e.class(),
					stage = %attempt.stage(),
					error = %e,
					"Deposit failed"
				);
				DepositStage::Failed(e.kind())
			},
		};
		if let Err(e) = attempt.transition(terminal) {
			tracing::error!(error = %e, "Deposit attempt did not end in a terminal stage");
		}

		DepositOutcome {
			result,
			attempt,
			report,
		}
	}

	/// Runs the pre-flight checks without building anything.
	///
	/// Checks stop at the first failure, which is the last entry of the
	/// report. Only an unusable signing identity is returned as an error.
	#[instrument(skip(self), fields(chain_id = self.config.endpoint.chain_id))]
	pub async fn diagnose(&self) -> Result<DiagnosticReport, DepositError> {
		let signer = self.signer_address().await?;

		let mut attempt = DepositAttempt::new();
		let mut report = DiagnosticReport::new();
		if let Err(e) = self.preflight(signer, &mut attempt, &mut report).await {
			tracing::info!(kind = ?e.kind(), error = %e, "Diagnostics stopped");
		}
		Ok(report)
	}

	async fn run_deposit(
		&self,
		amount: &str,
		attempt: &mut DepositAttempt,
		report: &mut DiagnosticReport,
	) -> Result<TransactionHash, DepositError> {
		let endpoint = &self.config.endpoint;

		let raw_amount = DepositAmount::parse(amount)?.to_base_units(self.config.asset.decimals)?;
		let signer = self.signer_address().await?;
		tracing::debug!(
			signer = %signer,
			raw_amount = %raw_amount,
			asset = %self.config.asset.symbol,
			"Starting deposit"
		);

		self.preflight(signer, attempt, report).await?;

		attempt.transition(DepositStage::FetchingNonce)?;
		let nonce = self
			.chain
			.get_transaction_count(signer)
			.await
			.map_err(|e| DepositError::Nonce(e.detail().to_string()))?;
		tracing::debug!(nonce, "Fetched nonce");

		attempt.transition(DepositStage::Building)?;
		let call_data = TransactionBuilder::supply_call(
			endpoint.asset_address,
			raw_amount,
			endpoint.beneficiary_address,
			self.config.deposit.referral_code,
		)?;
		let tx = TransactionBuilder::build(
			endpoint.pool_address,
			call_data,
			nonce,
			self.config.gas_price(),
			self.config.gas.gas_limit,
			endpoint.chain_id,
		);

		attempt.transition(DepositStage::Signing)?;
		let signed = self.signer.sign_transaction(tx).await.map_err(|e| {
			tracing::error!(
				stage = "sign",
				key_load = e.is_key_load(),
				error = %e,
				"Signing source rejected the transaction"
			);
			DepositError::Contract(e.to_string())
		})?;

		attempt.transition(DepositStage::Broadcasting)?;
		let local_hash = signed.hash;
		let hash = self
			.chain
			.send_raw_transaction(signed.raw)
			.await
			.map_err(|e| DepositError::TransactionSendFailed(e.detail().to_string()))?;

		if hash != local_hash {
			tracing::warn!(
				reported = %truncate_id(&hash.to_string()),
				computed = %truncate_id(&local_hash.to_string()),
				"Endpoint reported a different transaction hash"
			);
		}
		Ok(hash)
	}

	/// Connectivity, balance and contract presence, in that order.
	async fn preflight(
		&self,
		signer: Address,
		attempt: &mut DepositAttempt,
		report: &mut DiagnosticReport,
	) -> Result<(), DepositError> {
		let endpoint = &self.config.endpoint;

		attempt.transition(DepositStage::CheckingConnectivity)?;
		match self.chain.get_chain_id().await {
			Ok(id) if id == endpoint.chain_id => {
				report.pass(CheckName::Connectivity, format!("chain id {}", id));
			},
			Ok(id) => {
				let detail = format!(
					"endpoint reports chain id {}, expected {}",
					id, endpoint.chain_id
				);
				report.fail(CheckName::Connectivity, detail.clone());
				return Err(DepositError::Network(detail));
			},
			Err(e) => {
				report.fail(CheckName::Connectivity, e.detail());
				return Err(DepositError::Network(e.detail().to_string()));
			},
		}

		attempt.transition(DepositStage::CheckingBalance)?;
		match self.chain.get_balance(signer).await {
			Ok(balance) if balance.is_zero() => {
				report.fail(CheckName::Balance, format!("{} has a zero balance", signer));
				return Err(DepositError::InsufficientBalance { address: signer });
			},
			Ok(balance) => {
				report.pass(
					CheckName::Balance,
					format!(
						"{} holds {} native",
						signer,
						format_token_amount(balance, NATIVE_DECIMALS)
					),
				);
			},
			Err(e) => {
				report.fail(CheckName::Balance, e.detail());
				return Err(DepositError::BalanceCheckFailed(e.detail().to_string()));
			},
		}

		attempt.transition(DepositStage::CheckingContracts)?;
		let contracts = [
			(
				CheckName::AssetContract,
				ContractRole::Asset,
				endpoint.asset_address,
			),
			(
				CheckName::PoolContract,
				ContractRole::Pool,
				endpoint.pool_address,
			),
		];
		for (name, role, address) in contracts {
			match self.chain.get_code(address).await {
				Ok(code) if code.is_empty() => {
					report.fail(name, format!("no bytecode at {}", address));
					return Err(DepositError::ContractNotFound { role, address });
				},
				Ok(code) => {
					report.pass(name, format!("{} bytes of code at {}", code.len(), address));
				},
				Err(e) => {
					report.fail(name, e.detail());
					return Err(DepositError::Network(e.detail().to_string()));
				},
			}
		}

		tracing::debug!(checks = report.checks.len(), "Pre-flight checks passed");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{DepositErrorKind, SUPPLY_SIGNATURE};
	use alloy_dyn_abi::DynSolValue;
	use alloy_primitives::{keccak256, Signature, B256};
	use deposit_account::{AccountError, EnvKeySource, MockSigningIdentitySource};
	use deposit_config::builders::ConfigBuilder;
	use deposit_rpc::{EndpointError, MockChainClient};
	use deposit_types::{Bytes, SignedTransaction, UnsignedTransaction, U256};
	use mockall::Sequence;

	const CHAIN_ID: u64 = 31337;

	fn pool() -> Address {
		Address::repeat_byte(0x01)
	}

	fn asset() -> Address {
		Address::repeat_byte(0x02)
	}

	fn beneficiary() -> Address {
		Address::repeat_byte(0x03)
	}

	fn signer_address() -> Address {
		Address::repeat_byte(0x0e)
	}

	fn code() -> Bytes {
		Bytes::from(vec![0x60, 0x80, 0x60, 0x40])
	}

	fn dummy_signature() -> Signature {
		Signature::new(U256::from(1u8), U256::from(2u8), false)
	}

	fn orchestrator(chain: MockChainClient, signer: MockSigningIdentitySource) -> DepositOrchestrator {
		DepositOrchestrator::new(ConfigBuilder::new().build(), Arc::new(chain), Arc::new(signer))
	}

	fn known_signer() -> MockSigningIdentitySource {
		let mut signer = MockSigningIdentitySource::new();
		signer
			.expect_address()
			.returning(|| Ok(signer_address()));
		signer
	}

	fn forbid_all(chain: &mut MockChainClient) {
		chain.expect_get_chain_id().times(0);
		chain.expect_get_balance().times(0);
		chain.expect_get_code().times(0);
		chain.expect_get_transaction_count().times(0);
		chain.expect_send_raw_transaction().times(0);
		chain.expect_call().times(0);
	}

	fn expect_healthy_preflight(chain: &mut MockChainClient) {
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.withf(|address| *address == signer_address())
			.times(1)
			.returning(|_| Ok(U256::from(10u64).pow(U256::from(18u8))));
		chain
			.expect_get_code()
			.times(2)
			.returning(|_| Ok(code()));
	}

	#[tokio::test]
	async fn test_invalid_amounts_make_no_calls() {
		for amount in [
			"",
			"   ",
			"abc",
			"0",
			"0.000",
			"-5",
			"1.1234567",
			"1.2.3",
			"1e3",
			"1_000",
			"0.99999999999999999999999999999",
		] {
			let mut chain = MockChainClient::new();
			forbid_all(&mut chain);
			let mut signer = MockSigningIdentitySource::new();
			signer.expect_address().times(0);
			signer.expect_sign_transaction().times(0);

			let result = orchestrator(chain, signer).deposit(amount).await;
			assert!(
				matches!(result, Err(DepositError::InvalidAmount(_))),
				"{:?} should be rejected, got {:?}",
				amount,
				result
			);
		}
	}

	#[tokio::test]
	async fn test_empty_key_fails_before_any_chain_call() {
		std::env::set_var("DEPOSIT_CORE_TEST_EMPTY_KEY", "");
		let mut chain = MockChainClient::new();
		forbid_all(&mut chain);

		let config = ConfigBuilder::new()
			.private_key_env("DEPOSIT_CORE_TEST_EMPTY_KEY")
			.build();
		let signer = EnvKeySource::new(config.account.private_key_env.clone());
		let orchestrator = DepositOrchestrator::new(config, Arc::new(chain), Arc::new(signer));

		let outcome = orchestrator.deposit_traced("10").await;
		assert!(matches!(outcome.result, Err(DepositError::KeyLoad(_))));
		assert_eq!(
			outcome.attempt.history(),
			&[
				DepositStage::Idle,
				DepositStage::Failed(DepositErrorKind::KeyLoad)
			]
		);
		assert!(outcome.report.checks.is_empty());
	}

	#[tokio::test]
	async fn test_connectivity_failure_stops_everything() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Err(EndpointError::new("connection refused")));
		chain.expect_get_balance().times(0);
		chain.expect_get_code().times(0);
		chain.expect_get_transaction_count().times(0);
		chain.expect_send_raw_transaction().times(0);
		let mut signer = known_signer();
		signer.expect_sign_transaction().times(0);

		let outcome = orchestrator(chain, signer).deposit_traced("10").await;

		match outcome.result {
			Err(DepositError::Network(detail)) => assert!(detail.contains("connection refused")),
			other => panic!("expected Network, got {:?}", other),
		}
		assert_eq!(outcome.report.names(), vec![CheckName::Connectivity]);
		assert!(!outcome.attempt.visited(DepositStage::CheckingBalance));
	}

	#[tokio::test]
	async fn test_wrong_chain_fails_connectivity() {
		let mut chain = MockChainClient::new();
		chain.expect_get_chain_id().times(1).returning(|| Ok(1));
		chain.expect_get_balance().times(0);
		chain.expect_get_code().times(0);
		chain.expect_get_transaction_count().times(0);

		let result = orchestrator(chain, known_signer()).deposit("10").await;
		match result {
			Err(DepositError::Network(detail)) => {
				assert!(detail.contains("chain id 1"));
				assert!(detail.contains("31337"));
			},
			other => panic!("expected Network, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_zero_balance_stops_before_contract_checks() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.returning(|_| Ok(U256::ZERO));
		chain.expect_get_code().times(0);
		chain.expect_get_transaction_count().times(0);
		chain.expect_send_raw_transaction().times(0);
		let mut signer = known_signer();
		signer.expect_sign_transaction().times(0);

		let outcome = orchestrator(chain, signer).deposit_traced("10").await;

		assert!(matches!(
			outcome.result,
			Err(DepositError::InsufficientBalance { address }) if address == signer_address()
		));
		assert_eq!(
			outcome.attempt.history(),
			&[
				DepositStage::Idle,
				DepositStage::CheckingConnectivity,
				DepositStage::CheckingBalance,
				DepositStage::Failed(DepositErrorKind::InsufficientBalance),
			]
		);
		assert!(!outcome.attempt.visited(DepositStage::Building));
	}

	#[tokio::test]
	async fn test_balance_read_failure() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.returning(|_| Err(EndpointError::new("timeout")));
		chain.expect_get_code().times(0);

		let result = orchestrator(chain, known_signer()).deposit("10").await;
		assert!(matches!(result, Err(DepositError::BalanceCheckFailed(_))));
	}

	#[tokio::test]
	async fn test_missing_asset_contract_is_named() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.returning(|_| Ok(U256::from(1u8)));
		chain
			.expect_get_code()
			.withf(|address| *address == asset())
			.times(1)
			.returning(|_| Ok(Bytes::new()));
		chain
			.expect_get_code()
			.withf(|address| *address == pool())
			.times(0);
		chain.expect_get_transaction_count().times(0);
		let mut signer = known_signer();
		signer.expect_sign_transaction().times(0);

		let outcome = orchestrator(chain, signer).deposit_traced("10").await;

		match outcome.result {
			Err(DepositError::ContractNotFound { role, address }) => {
				assert_eq!(role, ContractRole::Asset);
				assert_eq!(address, asset());
			},
			other => panic!("expected ContractNotFound, got {:?}", other),
		}
		assert!(!outcome.attempt.visited(DepositStage::Building));
		assert!(!outcome.attempt.visited(DepositStage::Signing));
	}

	#[tokio::test]
	async fn test_missing_pool_contract_is_named() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.returning(|_| Ok(U256::from(1u8)));
		chain
			.expect_get_code()
			.withf(|address| *address == asset())
			.times(1)
			.returning(|_| Ok(code()));
		chain
			.expect_get_code()
			.withf(|address| *address == pool())
			.times(1)
			.returning(|_| Ok(Bytes::new()));
		chain.expect_get_transaction_count().times(0);
		let mut signer = known_signer();
		signer.expect_sign_transaction().times(0);

		let outcome = orchestrator(chain, signer).deposit_traced("10").await;

		match outcome.result {
			Err(DepositError::ContractNotFound { role, address }) => {
				assert_eq!(role, ContractRole::Pool);
				assert_eq!(address, pool());
			},
			other => panic!("expected ContractNotFound, got {:?}", other),
		}
		assert_eq!(
			outcome.report.names(),
			vec![
				CheckName::Connectivity,
				CheckName::Balance,
				CheckName::AssetContract,
				CheckName::PoolContract,
			]
		);
		assert!(!outcome.report.all_passed());
	}

	#[tokio::test]
	async fn test_code_read_failure_is_network() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.returning(|_| Ok(U256::from(1u8)));
		chain
			.expect_get_code()
			.times(1)
			.returning(|_| Err(EndpointError::new("bad gateway")));
		chain.expect_get_transaction_count().times(0);

		let result = orchestrator(chain, known_signer()).deposit("10").await;
		assert!(matches!(result, Err(DepositError::Network(_))));
	}

	#[tokio::test]
	async fn test_nonce_failure() {
		let mut chain = MockChainClient::new();
		expect_healthy_preflight(&mut chain);
		chain
			.expect_get_transaction_count()
			.times(1)
			.returning(|_| Err(EndpointError::new("rate limited")));
		chain.expect_send_raw_transaction().times(0);
		let mut signer = known_signer();
		signer.expect_sign_transaction().times(0);

		let result = orchestrator(chain, signer).deposit("10").await;
		assert!(matches!(result, Err(DepositError::Nonce(_))));
	}

	#[tokio::test]
	async fn test_signing_failure_is_reported_as_contract_error() {
		let mut chain = MockChainClient::new();
		expect_healthy_preflight(&mut chain);
		chain
			.expect_get_transaction_count()
			.times(1)
			.returning(|_| Ok(0));
		chain.expect_send_raw_transaction().times(0);
		let mut signer = known_signer();
		signer
			.expect_sign_transaction()
			.times(1)
			.returning(|_| Err(AccountError::SigningFailed("device locked".into())));

		let outcome = orchestrator(chain, signer).deposit_traced("10").await;

		match outcome.result {
			Err(DepositError::Contract(detail)) => assert!(detail.contains("device locked")),
			other => panic!("expected Contract, got {:?}", other),
		}
		assert!(outcome.attempt.visited(DepositStage::Signing));
		assert!(!outcome.attempt.visited(DepositStage::Broadcasting));
	}

	#[tokio::test]
	async fn test_broadcast_failure_carries_detail() {
		let mut chain = MockChainClient::new();
		expect_healthy_preflight(&mut chain);
		chain
			.expect_get_transaction_count()
			.times(1)
			.returning(|_| Ok(0));
		chain
			.expect_send_raw_transaction()
			.times(1)
			.returning(|_| Err(EndpointError::new("nonce too low")));
		let mut signer = known_signer();
		signer
			.expect_sign_transaction()
			.times(1)
			.returning(|tx| Ok(SignedTransaction::from_signature(tx, dummy_signature())));

		let result = orchestrator(chain, signer).deposit("10").await;
		match result {
			Err(DepositError::TransactionSendFailed(detail)) => {
				assert!(detail.contains("nonce too low"))
			},
			other => panic!("expected TransactionSendFailed, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_successful_deposit_runs_steps_in_order() {
		let mut seq = Sequence::new();
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.in_sequence(&mut seq)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_| Ok(U256::from(1u8)));
		chain
			.expect_get_code()
			.withf(|address| *address == asset())
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_| Ok(code()));
		chain
			.expect_get_code()
			.withf(|address| *address == pool())
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_| Ok(code()));
		chain
			.expect_get_transaction_count()
			.withf(|address| *address == signer_address())
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_| Ok(5));
		chain
			.expect_send_raw_transaction()
			.times(1)
			.in_sequence(&mut seq)
			.returning(|raw| Ok(TransactionHash(keccak256(&raw))));
		chain.expect_call().times(0);

		let mut signer = known_signer();
		signer
			.expect_sign_transaction()
			.withf(|tx: &UnsignedTransaction| {
				let Ok(args) = crate::TransactionBuilder::decode_call(SUPPLY_SIGNATURE, &tx.input)
				else {
					return false;
				};
				tx.nonce == 5
					&& tx.to == pool()
					&& tx.value == U256::ZERO
					&& tx.chain_id == CHAIN_ID
					&& tx.gas_price == 21_000_000_000
					&& tx.gas_limit == 500_000
					&& args
						== vec![
							DynSolValue::Address(asset()),
							DynSolValue::Uint(U256::from(10_000_000u64), 256),
							DynSolValue::Address(beneficiary()),
							DynSolValue::Uint(U256::ZERO, 16),
						]
			})
			.times(1)
			.returning(|tx| Ok(SignedTransaction::from_signature(tx, dummy_signature())));

		let outcome = orchestrator(chain, signer).deposit_traced("10").await;

		let hash = outcome.result.unwrap();
		assert_ne!(hash.0, B256::ZERO);
		assert_eq!(outcome.attempt.stage(), DepositStage::Succeeded);
		assert_eq!(outcome.attempt.history().len(), 9);
		assert!(outcome.report.all_passed());
		assert_eq!(outcome.report.checks.len(), 4);
	}

	#[tokio::test]
	async fn test_each_attempt_fetches_a_fresh_nonce() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(2)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(2)
			.returning(|_| Ok(U256::from(1u8)));
		chain.expect_get_code().times(4).returning(|_| Ok(code()));
		let mut nonces = vec![8u64, 7u64];
		chain
			.expect_get_transaction_count()
			.times(2)
			.returning(move |_| Ok(nonces.pop().unwrap_or_default()));
		chain
			.expect_send_raw_transaction()
			.times(2)
			.returning(|raw| Ok(TransactionHash(keccak256(&raw))));

		let mut signer = known_signer();
		let mut seq = Sequence::new();
		for expected in [7u64, 8u64] {
			signer
				.expect_sign_transaction()
				.withf(move |tx: &UnsignedTransaction| tx.nonce == expected)
				.times(1)
				.in_sequence(&mut seq)
				.returning(|tx| Ok(SignedTransaction::from_signature(tx, dummy_signature())));
		}

		let orchestrator = orchestrator(chain, signer);
		let first = orchestrator.deposit("1.5").await.unwrap();
		let second = orchestrator.deposit("1.5").await.unwrap();
		assert_ne!(first, second);
	}

	#[tokio::test]
	async fn test_diagnose_reports_all_checks() {
		let mut chain = MockChainClient::new();
		expect_healthy_preflight(&mut chain);
		chain.expect_get_transaction_count().times(0);
		chain.expect_send_raw_transaction().times(0);
		let mut signer = known_signer();
		signer.expect_sign_transaction().times(0);

		let report = orchestrator(chain, signer).diagnose().await.unwrap();

		assert!(report.all_passed());
		assert_eq!(
			report.names(),
			vec![
				CheckName::Connectivity,
				CheckName::Balance,
				CheckName::AssetContract,
				CheckName::PoolContract,
			]
		);
		assert!(report.checks[1].detail.contains("holds 1 native"));
	}

	#[tokio::test]
	async fn test_diagnose_stops_at_first_failure() {
		let mut chain = MockChainClient::new();
		chain
			.expect_get_chain_id()
			.times(1)
			.returning(|| Ok(CHAIN_ID));
		chain
			.expect_get_balance()
			.times(1)
			.returning(|_| Ok(U256::ZERO));
		chain.expect_get_code().times(0);

		let report = orchestrator(chain, known_signer()).diagnose().await.unwrap();

		assert!(!report.all_passed());
		let failure = report.first_failure().unwrap();
		assert_eq!(failure.name, CheckName::Balance);
		assert_eq!(report.checks.len(), 2);
	}

	#[tokio::test]
	async fn test_diagnose_surfaces_key_errors() {
		let mut chain = MockChainClient::new();
		forbid_all(&mut chain);
		let mut signer = MockSigningIdentitySource::new();
		signer
			.expect_address()
			.times(1)
			.returning(|| Err(AccountError::KeyUnavailable("unset".into())));

		let result = orchestrator(chain, signer).diagnose().await;
		assert!(matches!(result, Err(DepositError::KeyLoad(_))));
	}
}
