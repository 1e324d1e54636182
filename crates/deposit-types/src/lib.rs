//! Common types module for the deposit workflow.
//!
//! This module defines the data types shared by the account, RPC, core and
//! service crates: the endpoint configuration, transaction envelopes,
//! diagnostic reports and user-facing amounts.

/// User-facing deposit amounts and their scaling to token base units.
pub mod amount;
/// Pre-flight diagnostic reports.
pub mod diagnostics;
/// Endpoint and well-known contract address configuration.
pub mod endpoint;
/// Secure string type for private keys.
pub mod secret_string;
/// Transaction envelopes and hashes.
pub mod transaction;
/// Utility functions for hex and amount formatting.
pub mod utils;

pub use alloy_primitives::{Address, Bytes, U256};
pub use amount::{AmountError, DepositAmount, MAX_ASSET_DECIMALS};
pub use diagnostics::{CheckName, DiagnosticCheck, DiagnosticReport};
pub use endpoint::{deserialize_checksummed_address, parse_checksummed_address, ChainEndpoint};
pub use secret_string::SecretString;
pub use transaction::{SignedTransaction, TransactionHash, UnsignedTransaction};
pub use utils::{format_token_amount, truncate_id, with_0x_prefix, without_0x_prefix};
