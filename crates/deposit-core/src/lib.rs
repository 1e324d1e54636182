//! Core deposit workflow.
//!
//! This module ties the signing source, the chain client and the transaction
//! builder together into one deposit attempt: validate the input, run the
//! pre-flight checks, fetch the nonce, build, sign and broadcast. It also
//! exposes read-only pool queries that share the same chain client.

use deposit_types::{Address, AmountError};
use std::fmt;
use thiserror::Error;

pub mod builder;
pub mod orchestrator;
pub mod pool;
pub mod state;

pub use builder::{EncodingError, FunctionSignature, TransactionBuilder, SUPPLY_SIGNATURE};
pub use orchestrator::DepositOrchestrator;
pub use pool::{AccountPosition, PoolReadError, PoolReader, ReserveSnapshot};
pub use state::{DepositAttempt, DepositStage, StageError};

/// Which well-known contract a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRole {
	/// The ERC-20 token being supplied.
	Asset,
	/// The lending pool receiving the `supply` call.
	Pool,
}

impl fmt::Display for ContractRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ContractRole::Asset => write!(f, "asset token"),
			ContractRole::Pool => write!(f, "pool contract"),
		}
	}
}

/// Errors that end a deposit attempt.
///
/// Exactly one is returned per failed attempt.
#[derive(Debug, Error)]
pub enum DepositError {
	#[error("Invalid amount: {0}")]
	InvalidAmount(#[from] AmountError),
	#[error("Network error: {0}")]
	Network(String),
	#[error("Insufficient balance: {address} holds no native funds for gas")]
	InsufficientBalance { address: Address },
	#[error("Balance check failed: {0}")]
	BalanceCheckFailed(String),
	#[error("Contract not found: no bytecode for the {role} at {address}")]
	ContractNotFound { role: ContractRole, address: Address },
	#[error("Nonce error: {0}")]
	Nonce(String),
	/// Encoding failures, and signing failures as well.
	#[error("Contract error: {0}")]
	Contract(String),
	#[error("Transaction send failed: {0}")]
	TransactionSendFailed(String),
	#[error("Key load error: {0}")]
	KeyLoad(String),
}

/// Fieldless discriminant of `DepositError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepositErrorKind {
	InvalidAmount,
	Network,
	InsufficientBalance,
	BalanceCheckFailed,
	ContractNotFound,
	Nonce,
	Contract,
	TransactionSendFailed,
	KeyLoad,
}

/// What the caller can do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
	/// Fix the input and retry.
	Input,
	/// Fund the signing account.
	Funding,
	/// Transient; try again later.
	Network,
	/// The deployment configuration is wrong.
	Misconfiguration,
}

impl fmt::Display for FailureClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FailureClass::Input => write!(f, "fix your input"),
			FailureClass::Funding => write!(f, "fix your funding"),
			FailureClass::Network => write!(f, "try again later"),
			FailureClass::Misconfiguration => write!(f, "integration misconfigured"),
		}
	}
}

impl DepositErrorKind {
	pub fn class(&self) -> FailureClass {
		match self {
			DepositErrorKind::InvalidAmount => FailureClass::Input,
			DepositErrorKind::InsufficientBalance => FailureClass::Funding,
			DepositErrorKind::Network
			| DepositErrorKind::BalanceCheckFailed
			| DepositErrorKind::Nonce
			| DepositErrorKind::TransactionSendFailed => FailureClass::Network,
			DepositErrorKind::ContractNotFound
			| DepositErrorKind::Contract
			| DepositErrorKind::KeyLoad => FailureClass::Misconfiguration,
		}
	}
}

impl DepositError {
	pub fn kind(&self) -> DepositErrorKind {
		match self {
			DepositError::InvalidAmount(_) => DepositErrorKind::InvalidAmount,
			DepositError::Network(_) => DepositErrorKind::Network,
			DepositError::InsufficientBalance { .. } => DepositErrorKind::InsufficientBalance,
			DepositError::BalanceCheckFailed(_) => DepositErrorKind::BalanceCheckFailed,
			DepositError::ContractNotFound { .. } => DepositErrorKind::ContractNotFound,
			DepositError::Nonce(_) => DepositErrorKind::Nonce,
			DepositError::Contract(_) => DepositErrorKind::Contract,
			DepositError::TransactionSendFailed(_) => DepositErrorKind::TransactionSendFailed,
			DepositError::KeyLoad(_) => DepositErrorKind::KeyLoad,
		}
	}

	pub fn class(&self) -> FailureClass {
		self.kind().class()
	}
}

impl From<EncodingError> for DepositError {
	fn from(err: EncodingError) -> Self {
		DepositError::Contract(err.to_string())
	}
}

// Stage errors only arise from a broken step sequence, a build-side fault.
impl From<StageError> for DepositError {
	fn from(err: StageError) -> Self {
		DepositError::Contract(err.to_string())
	}
}
