//! Pure construction of deposit transactions.
//!
//! Nothing here touches the network. Call data is produced from a function
//! signature and ordered arguments; the envelope is assembled from the call
//! data and the nonce and gas parameters supplied by the caller.

mod abi;

pub use abi::FunctionSignature;

use alloy_dyn_abi::DynSolValue;
use deposit_types::{Address, Bytes, UnsignedTransaction, U256};
use thiserror::Error;

/// Canonical signature of the pool deposit entry point.
pub const SUPPLY_SIGNATURE: &str = "supply(address,uint256,address,uint16)";

/// Errors that can occur while encoding or decoding call data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
	#[error("Invalid function signature: {0}")]
	InvalidSignature(String),
	#[error("{signature} takes {expected} arguments, got {got}")]
	ArgumentCount {
		signature: String,
		expected: usize,
		got: usize,
	},
	#[error("Argument {index} is not a valid {expected}: {detail}")]
	ArgumentType {
		index: usize,
		expected: String,
		detail: String,
	},
	#[error("Selector mismatch: expected {expected}, found {found}")]
	SelectorMismatch { expected: String, found: String },
	#[error("Failed to decode call data: {0}")]
	Decode(String),
}

/// Builds call data and unsigned transaction envelopes.
pub struct TransactionBuilder;

impl TransactionBuilder {
	/// Encodes a call to `signature` with typed arguments.
	pub fn encode_call(signature: &str, args: &[DynSolValue]) -> Result<Bytes, EncodingError> {
		FunctionSignature::parse(signature)?.encode(args)
	}

	/// Encodes a call to `signature` from textual arguments.
	///
	/// Each argument is coerced to its declared type, so an address that is
	/// not 20 bytes of hex fails here rather than producing garbage.
	pub fn encode_call_str(signature: &str, args: &[&str]) -> Result<Bytes, EncodingError> {
		FunctionSignature::parse(signature)?.encode_str(args)
	}

	/// Decodes call data previously encoded against `signature`.
	pub fn decode_call(signature: &str, data: &[u8]) -> Result<Vec<DynSolValue>, EncodingError> {
		FunctionSignature::parse(signature)?.decode(data)
	}

	/// Call data for `supply(asset, amount, onBehalfOf, referralCode)`.
	pub fn supply_call(
		asset: Address,
		amount: U256,
		on_behalf_of: Address,
		referral_code: u16,
	) -> Result<Bytes, EncodingError> {
		Self::encode_call(
			SUPPLY_SIGNATURE,
			&[
				DynSolValue::Address(asset),
				DynSolValue::Uint(amount, 256),
				DynSolValue::Address(on_behalf_of),
				DynSolValue::Uint(U256::from(referral_code), 16),
			],
		)
	}

	/// Assembles a zero-value legacy transaction.
	pub fn build(
		recipient: Address,
		call_data: Bytes,
		nonce: u64,
		gas_price: u128,
		gas_limit: u64,
		chain_id: u64,
	) -> UnsignedTransaction {
		UnsignedTransaction {
			nonce,
			to: recipient,
			input: call_data,
			gas_price,
			gas_limit,
			value: U256::ZERO,
			chain_id,
		}
	}
}
