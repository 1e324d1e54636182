//! Pre-flight diagnostic reports.
//!
//! A report is produced fresh for every deposit attempt. Checks are appended
//! in the order they ran; a failing check is always the last entry because
//! the diagnostic sequence stops at the first failure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a single diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
	/// The endpoint answered with its chain identity.
	Connectivity,
	/// The signer holds a non-zero native balance.
	Balance,
	/// Bytecode is deployed at the asset token address.
	AssetContract,
	/// Bytecode is deployed at the pool contract address.
	PoolContract,
}

impl fmt::Display for CheckName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CheckName::Connectivity => write!(f, "connectivity"),
			CheckName::Balance => write!(f, "balance"),
			CheckName::AssetContract => write!(f, "contract:asset"),
			CheckName::PoolContract => write!(f, "contract:pool"),
		}
	}
}

/// Outcome of one diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCheck {
	pub name: CheckName,
	pub passed: bool,
	/// Human-readable detail, e.g. the balance read or the RPC error.
	pub detail: String,
}

/// Ordered results of the pre-flight checks of one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
	pub checks: Vec<DiagnosticCheck>,
}

impl DiagnosticReport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a passing check.
	pub fn pass(&mut self, name: CheckName, detail: impl Into<String>) {
		self.checks.push(DiagnosticCheck {
			name,
			passed: true,
			detail: detail.into(),
		});
	}

	/// Records a failing check.
	pub fn fail(&mut self, name: CheckName, detail: impl Into<String>) {
		self.checks.push(DiagnosticCheck {
			name,
			passed: false,
			detail: detail.into(),
		});
	}

	/// True when at least one check ran and none failed.
	pub fn all_passed(&self) -> bool {
		!self.checks.is_empty() && self.checks.iter().all(|c| c.passed)
	}

	/// Returns the first failing check, if any.
	pub fn first_failure(&self) -> Option<&DiagnosticCheck> {
		self.checks.iter().find(|c| !c.passed)
	}

	/// Names of the checks that ran, in order.
	pub fn names(&self) -> Vec<CheckName> {
		self.checks.iter().map(|c| c.name).collect()
	}
}

impl fmt::Display for DiagnosticReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for check in &self.checks {
			let status = if check.passed { "PASS" } else { "FAIL" };
			writeln!(f, "[{}] {:<15} {}", status, check.name, check.detail)?;
		}
		Ok(())
	}
}
