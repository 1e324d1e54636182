//! Chain access module for the deposit workflow.
//!
//! A thin facade over a JSON-RPC endpoint exposing only the primitives the
//! deposit flow needs. Every transport or RPC failure is flattened into a
//! single `EndpointError`; callers re-tag it with their own classification.

use async_trait::async_trait;
use deposit_types::{Address, Bytes, TransactionHash, U256};
use thiserror::Error;

pub mod implementations {
	pub mod alloy;
}

pub use implementations::alloy::AlloyChainClient;

/// A failed endpoint interaction, carrying the transport's description.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Endpoint error: {0}")]
pub struct EndpointError(pub String);

impl EndpointError {
	pub fn new(detail: impl Into<String>) -> Self {
		Self(detail.into())
	}

	/// The underlying failure description.
	pub fn detail(&self) -> &str {
		&self.0
	}
}

/// Trait defining the read/write primitives used against a chain endpoint.
///
/// Implementations must not retry or reinterpret failures; timeouts are the
/// transport's concern.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Returns the chain id reported by the endpoint (`eth_chainId`).
	async fn get_chain_id(&self) -> Result<u64, EndpointError>;

	/// Returns the native balance of `address` in wei (`eth_getBalance`).
	async fn get_balance(&self, address: Address) -> Result<U256, EndpointError>;

	/// Returns the deployed bytecode at `address` (`eth_getCode`).
	///
	/// An empty result means no contract lives there.
	async fn get_code(&self, address: Address) -> Result<Bytes, EndpointError>;

	/// Returns the next nonce of `address` (`eth_getTransactionCount`).
	async fn get_transaction_count(&self, address: Address) -> Result<u64, EndpointError>;

	/// Submits a signed, EIP-2718 encoded transaction (`eth_sendRawTransaction`).
	async fn send_raw_transaction(&self, raw: Bytes) -> Result<TransactionHash, EndpointError>;

	/// Executes a read-only call against `to` (`eth_call`).
	///
	/// Used for pool queries; the deposit path never calls it.
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, EndpointError>;
}
