//! Signing identity module for the deposit workflow.
//!
//! The orchestrator never touches key material directly. It depends on the
//! `SigningIdentitySource` capability: something that can report the signer
//! address and sign an unsigned transaction. Implementations vary by platform
//! (an in-memory key, an environment variable, an OS secure enclave or an
//! HSM); this crate ships the first two.

use async_trait::async_trait;
use deposit_types::{Address, SignedTransaction, UnsignedTransaction};
use thiserror::Error;

pub mod implementations {
	pub mod env;
	pub mod local;
}

mod keys;

pub use implementations::env::EnvKeySource;
pub use implementations::local::LocalAccount;
pub use keys::{generate_key, parse_private_key};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// The key source holds no key (unset or empty).
	#[error("Key unavailable: {0}")]
	KeyUnavailable(String),
	/// The key is present but malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// The signer rejected the payload.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

impl AccountError {
	/// True when the failure happened while loading the key, before any
	/// signing was attempted.
	pub fn is_key_load(&self) -> bool {
		matches!(
			self,
			AccountError::KeyUnavailable(_) | AccountError::InvalidKey(_)
		)
	}
}

/// Capability interface over a signing key.
///
/// This trait must be implemented by any key store that wants to sign
/// deposits. Both methods may load the key lazily and therefore may fail
/// with a key-load error.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait SigningIdentitySource: Send + Sync {
	/// Returns the address derived from the signing key.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a legacy transaction, consuming it.
	///
	/// The signature commits to the chain id carried by the transaction
	/// (EIP-155).
	async fn sign_transaction(
		&self,
		tx: UnsignedTransaction,
	) -> Result<SignedTransaction, AccountError>;
}
