//! Signing identity read from an environment variable.
//!
//! The key is loaded at the first successful access rather than at
//! construction, so a missing or malformed key surfaces when it is first
//! needed. Once loaded the identity is pinned: later changes to the variable
//! do not change the address or the signing key.

use super::local::LocalAccount;
use crate::{AccountError, SigningIdentitySource};
use async_trait::async_trait;
use deposit_types::{Address, SecretString, SignedTransaction, UnsignedTransaction};
use once_cell::sync::OnceCell;

/// Signing identity whose hex private key lives in an environment variable.
#[derive(Debug, Clone)]
pub struct EnvKeySource {
	var_name: String,
	account: OnceCell<LocalAccount>,
}

impl EnvKeySource {
	pub fn new(var_name: impl Into<String>) -> Self {
		Self {
			var_name: var_name.into(),
			account: OnceCell::new(),
		}
	}

	/// Name of the environment variable consulted.
	pub fn var_name(&self) -> &str {
		&self.var_name
	}

	/// Returns the pinned account, loading it on first use.
	///
	/// A failed load is not cached; the next access reads the variable again.
	fn account(&self) -> Result<&LocalAccount, AccountError> {
		self.account.get_or_try_init(|| {
			let account = self.load()?;
			tracing::debug!(var = %self.var_name, address = %account.address(), "Loaded signing key");
			Ok(account)
		})
	}

	fn load(&self) -> Result<LocalAccount, AccountError> {
		let raw = match std::env::var(&self.var_name) {
			Ok(value) => SecretString::new(value),
			Err(std::env::VarError::NotPresent) => {
				return Err(AccountError::KeyUnavailable(format!(
					"environment variable {} is not set",
					self.var_name
				)))
			},
			Err(std::env::VarError::NotUnicode(_)) => {
				return Err(AccountError::InvalidKey(format!(
					"environment variable {} is not valid UTF-8",
					self.var_name
				)))
			},
		};

		LocalAccount::from_secret(&raw).map_err(|e| match e {
			AccountError::KeyUnavailable(_) => AccountError::KeyUnavailable(format!(
				"environment variable {} is empty",
				self.var_name
			)),
			other => other,
		})
	}
}

#[async_trait]
impl SigningIdentitySource for EnvKeySource {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.account()?.address())
	}

	async fn sign_transaction(
		&self,
		tx: UnsignedTransaction,
	) -> Result<SignedTransaction, AccountError> {
		self.account()?.sign_transaction(tx).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_unset_variable_is_unavailable() {
		std::env::remove_var("DEPOSIT_ACCOUNT_TEST_UNSET");
		let source = EnvKeySource::new("DEPOSIT_ACCOUNT_TEST_UNSET");

		let err = source.address().await.unwrap_err();
		assert!(matches!(err, AccountError::KeyUnavailable(_)));
		assert!(err.to_string().contains("DEPOSIT_ACCOUNT_TEST_UNSET"));
	}

	#[tokio::test]
	async fn test_empty_variable_is_unavailable() {
		std::env::set_var("DEPOSIT_ACCOUNT_TEST_EMPTY", "");
		let source = EnvKeySource::new("DEPOSIT_ACCOUNT_TEST_EMPTY");

		let err = source.address().await.unwrap_err();
		assert!(matches!(err, AccountError::KeyUnavailable(_)));
	}

	#[tokio::test]
	async fn test_loads_key_from_variable() {
		std::env::set_var(
			"DEPOSIT_ACCOUNT_TEST_KEY",
			"ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let source = EnvKeySource::new("DEPOSIT_ACCOUNT_TEST_KEY");

		let address = source.address().await.unwrap();
		assert_eq!(
			address.to_string(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
		);
	}

	#[tokio::test]
	async fn test_identity_is_pinned_after_first_load() {
		std::env::set_var(
			"DEPOSIT_ACCOUNT_TEST_PINNED",
			"ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let source = EnvKeySource::new("DEPOSIT_ACCOUNT_TEST_PINNED");
		let address = source.address().await.unwrap();

		std::env::set_var(
			"DEPOSIT_ACCOUNT_TEST_PINNED",
			"59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
		);
		assert_eq!(source.address().await.unwrap(), address);

		let tx = UnsignedTransaction {
			nonce: 0,
			to: Address::repeat_byte(0x01),
			input: deposit_types::Bytes::new(),
			gas_price: 1,
			gas_limit: 21_000,
			value: deposit_types::U256::ZERO,
			chain_id: 747,
		};
		let signed = source.sign_transaction(tx).await.unwrap();
		assert_eq!(signed.recover_signer(), Some(address));
	}

	#[tokio::test]
	async fn test_failed_load_is_retried() {
		std::env::remove_var("DEPOSIT_ACCOUNT_TEST_LATE");
		let source = EnvKeySource::new("DEPOSIT_ACCOUNT_TEST_LATE");
		assert!(source.address().await.is_err());

		std::env::set_var(
			"DEPOSIT_ACCOUNT_TEST_LATE",
			"ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		assert!(source.address().await.is_ok());
	}

	#[tokio::test]
	async fn test_malformed_variable_is_invalid() {
		std::env::set_var("DEPOSIT_ACCOUNT_TEST_BAD", "not-a-key");
		let source = EnvKeySource::new("DEPOSIT_ACCOUNT_TEST_BAD");

		let err = source.address().await.unwrap_err();
		assert!(matches!(err, AccountError::InvalidKey(_)));
	}
}
