//! Alloy-backed chain client.
//!
//! Talks to a single HTTP JSON-RPC endpoint through an Alloy root provider.
//! No fillers or wallet are attached: transactions arrive already signed.

use crate::{ChainClient, EndpointError};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use deposit_types::{truncate_id, Address, Bytes, TransactionHash, U256};

/// Chain client over an HTTP JSON-RPC endpoint.
#[derive(Clone)]
pub struct AlloyChainClient {
	provider: RootProvider,
	rpc_url: String,
}

impl AlloyChainClient {
	/// Creates a client for `rpc_url`.
	///
	/// No request is made here; an unreachable endpoint surfaces on first use.
	pub fn new(rpc_url: &str) -> Result<Self, EndpointError> {
		let url = rpc_url
			.parse()
			.map_err(|e| EndpointError(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		Ok(Self {
			provider: RootProvider::new_http(url),
			rpc_url: rpc_url.to_string(),
		})
	}

	pub fn rpc_url(&self) -> &str {
		&self.rpc_url
	}
}

impl std::fmt::Debug for AlloyChainClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AlloyChainClient")
			.field("rpc_url", &self.rpc_url)
			.finish()
	}
}

#[async_trait]
impl ChainClient for AlloyChainClient {
	async fn get_chain_id(&self) -> Result<u64, EndpointError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| EndpointError(format!("Failed to get chain id: {}", e)))
	}

	async fn get_balance(&self, address: Address) -> Result<U256, EndpointError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| EndpointError(format!("Failed to get balance of {}: {}", address, e)))
	}

	async fn get_code(&self, address: Address) -> Result<Bytes, EndpointError> {
		self.provider
			.get_code_at(address)
			.await
			.map_err(|e| EndpointError(format!("Failed to get code at {}: {}", address, e)))
	}

	async fn get_transaction_count(&self, address: Address) -> Result<u64, EndpointError> {
		self.provider
			.get_transaction_count(address)
			.await
			.map_err(|e| EndpointError(format!("Failed to get nonce of {}: {}", address, e)))
	}

	async fn send_raw_transaction(&self, raw: Bytes) -> Result<TransactionHash, EndpointError> {
		let pending = self
			.provider
			.send_raw_transaction(&raw)
			.await
			.map_err(|e| EndpointError(format!("Failed to send transaction: {}", e)))?;

		let hash = TransactionHash(*pending.tx_hash());
		tracing::info!(
			tx_hash = %truncate_id(&hash.to_string()),
			rpc_url = %self.rpc_url,
			"Submitted raw transaction"
		);
		Ok(hash)
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, EndpointError> {
		let request = TransactionRequest::default().to(to).input(data.into());
		self.provider
			.call(request)
			.await
			.map_err(|e| EndpointError(format!("Call to {} failed: {}", to, e)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejects_malformed_url() {
		let err = AlloyChainClient::new("not a url").unwrap_err();
		assert!(err.detail().contains("Invalid RPC URL"));
	}

	#[test]
	fn test_construction_is_offline() {
		let client = AlloyChainClient::new("http://127.0.0.1:1").unwrap();
		assert_eq!(client.rpc_url(), "http://127.0.0.1:1");
	}

	#[tokio::test]
	async fn test_unreachable_endpoint_maps_to_endpoint_error() {
		// Port 1 is reserved and refuses connections.
		let client = AlloyChainClient::new("http://127.0.0.1:1").unwrap();
		let err = client.get_chain_id().await.unwrap_err();
		assert!(err.detail().starts_with("Failed to get chain id"));
	}
}
