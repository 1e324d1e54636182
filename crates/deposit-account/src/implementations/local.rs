//! In-memory signing identity backed by a secp256k1 key.

use crate::{keys::parse_private_key, AccountError, SigningIdentitySource};
use alloy_network::TxSigner;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use deposit_types::{Address, SecretString, SignedTransaction, UnsignedTransaction};

/// Signing identity holding a parsed private key in memory.
#[derive(Debug, Clone)]
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Creates an account from a hex private key.
	pub fn from_secret(key: &SecretString) -> Result<Self, AccountError> {
		Ok(Self {
			signer: parse_private_key(key)?,
		})
	}

	/// Address of the held key.
	pub fn address(&self) -> Address {
		self.signer.address()
	}
}

#[async_trait]
impl SigningIdentitySource for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_transaction(
		&self,
		tx: UnsignedTransaction,
	) -> Result<SignedTransaction, AccountError> {
		let mut legacy = tx.to_legacy();
		let signature = self
			.signer
			.sign_transaction(&mut legacy)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		Ok(SignedTransaction::from_signature(tx, signature))
	}
}
