//! Wiring of concrete implementations.
//!
//! The core only knows the `ChainClient` and `SigningIdentitySource` traits;
//! this is the one place that picks the HTTP client and the environment key
//! source for them.

use deposit_account::EnvKeySource;
use deposit_config::Config;
use deposit_core::DepositOrchestrator;
use deposit_rpc::{AlloyChainClient, EndpointError};
use std::sync::Arc;

/// Builds an orchestrator for `config`.
///
/// Performs no network access and does not read the key yet; both happen on
/// first use.
pub fn build_orchestrator(config: Config) -> Result<DepositOrchestrator, EndpointError> {
	let chain = AlloyChainClient::new(&config.endpoint.rpc_url)?;
	let signer = EnvKeySource::new(config.account.private_key_env.clone());

	tracing::debug!(
		rpc_url = %config.endpoint.rpc_url,
		key_env = %signer.var_name(),
		"Wired deposit orchestrator"
	);
	Ok(DepositOrchestrator::new(
		config,
		Arc::new(chain),
		Arc::new(signer),
	))
}
