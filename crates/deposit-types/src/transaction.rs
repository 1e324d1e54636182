//! Transaction envelope types for the deposit workflow.
//!
//! An `UnsignedTransaction` is assembled once per attempt, handed to the
//! signing source exactly once, and the resulting `SignedTransaction` is
//! handed to the endpoint exactly once. Neither is mutated after creation.

use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, Bytes, Signature, TxKind, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash of a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub B256);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A legacy (single gas price) transaction before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
	/// Sender nonce, fetched once per attempt.
	pub nonce: u64,
	/// Contract receiving the call.
	pub to: Address,
	/// Encoded call data (selector + ABI arguments).
	pub input: Bytes,
	/// Gas price in wei.
	pub gas_price: u128,
	pub gas_limit: u64,
	/// Native value attached to the call.
	pub value: U256,
	/// Chain identifier used for EIP-155 replay protection.
	pub chain_id: u64,
}

impl UnsignedTransaction {
	/// Converts to the alloy legacy transaction envelope.
	pub fn to_legacy(&self) -> TxLegacy {
		TxLegacy {
			chain_id: Some(self.chain_id),
			nonce: self.nonce,
			gas_price: self.gas_price,
			gas_limit: self.gas_limit,
			to: TxKind::Call(self.to),
			value: self.value,
			input: self.input.clone(),
		}
	}

	/// RLP payload the signature commits to.
	pub fn signing_payload(&self) -> Vec<u8> {
		self.to_legacy().encoded_for_signing()
	}

	/// Keccak-256 of the signing payload.
	pub fn signature_hash(&self) -> B256 {
		self.to_legacy().signature_hash()
	}
}

/// A transaction together with its signature and wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
	pub transaction: UnsignedTransaction,
	pub signature: Signature,
	/// Hash the endpoint will report for this transaction.
	pub hash: TransactionHash,
	/// EIP-2718 encoding submitted through `eth_sendRawTransaction`.
	pub raw: Bytes,
}

impl SignedTransaction {
	/// Attaches a signature produced over `transaction.signature_hash()`.
	pub fn from_signature(transaction: UnsignedTransaction, signature: Signature) -> Self {
		let signed = transaction.to_legacy().into_signed(signature);
		let hash = TransactionHash(*signed.hash());
		let raw = Bytes::from(TxEnvelope::from(signed).encoded_2718());

		Self {
			transaction,
			signature,
			hash,
			raw,
		}
	}

	/// Recovers the address that produced the signature.
	pub fn recover_signer(&self) -> Option<Address> {
		self.signature
			.recover_address_from_prehash(&self.transaction.signature_hash())
			.ok()
	}
}
