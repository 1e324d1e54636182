//! Deposit attempt state machine.
//!
//! Idle -> CheckingConnectivity -> CheckingBalance -> CheckingContracts ->
//! FetchingNonce -> Building -> Signing -> Broadcasting -> Succeeded.
//! Any non-terminal stage may move to Failed; terminal stages are final.

use crate::DepositErrorKind;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Errors raised by invalid stage changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
	#[error("Invalid stage transition from {from} to {to}")]
	InvalidTransition { from: DepositStage, to: DepositStage },
}

/// Stage of a single deposit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositStage {
	Idle,
	CheckingConnectivity,
	CheckingBalance,
	CheckingContracts,
	FetchingNonce,
	Building,
	Signing,
	Broadcasting,
	Succeeded,
	/// The attempt ended with the given error kind.
	Failed(DepositErrorKind),
}

impl DepositStage {
	pub fn is_terminal(&self) -> bool {
		matches!(self, DepositStage::Succeeded | DepositStage::Failed(_))
	}

	fn kind(&self) -> StageKind {
		match self {
			DepositStage::Idle => StageKind::Idle,
			DepositStage::CheckingConnectivity => StageKind::CheckingConnectivity,
			DepositStage::CheckingBalance => StageKind::CheckingBalance,
			DepositStage::CheckingContracts => StageKind::CheckingContracts,
			DepositStage::FetchingNonce => StageKind::FetchingNonce,
			DepositStage::Building => StageKind::Building,
			DepositStage::Signing => StageKind::Signing,
			DepositStage::Broadcasting => StageKind::Broadcasting,
			DepositStage::Succeeded => StageKind::Succeeded,
			DepositStage::Failed(_) => StageKind::Failed,
		}
	}
}

impl fmt::Display for DepositStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DepositStage::Failed(kind) => write!(f, "Failed({:?})", kind),
			other => write!(f, "{:?}", other),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StageKind {
	Idle,
	CheckingConnectivity,
	CheckingBalance,
	CheckingContracts,
	FetchingNonce,
	Building,
	Signing,
	Broadcasting,
	Succeeded,
	Failed,
}

// Each stage maps to the stages it may move to.
static TRANSITIONS: Lazy<HashMap<StageKind, HashSet<StageKind>>> = Lazy::new(|| {
	use StageKind::*;

	let forward = [
		(Idle, CheckingConnectivity),
		(CheckingConnectivity, CheckingBalance),
		(CheckingBalance, CheckingContracts),
		(CheckingContracts, FetchingNonce),
		(FetchingNonce, Building),
		(Building, Signing),
		(Signing, Broadcasting),
		(Broadcasting, Succeeded),
	];

	let mut m: HashMap<StageKind, HashSet<StageKind>> = HashMap::new();
	for (from, to) in forward {
		m.insert(from, HashSet::from([to, Failed]));
	}
	m.insert(Succeeded, HashSet::new()); // terminal
	m.insert(Failed, HashSet::new()); // terminal
	m
});

/// Tracks the stages visited by one deposit attempt.
#[derive(Debug, Clone)]
pub struct DepositAttempt {
	history: Vec<DepositStage>,
}

impl Default for DepositAttempt {
	fn default() -> Self {
		Self::new()
	}
}

impl DepositAttempt {
	pub fn new() -> Self {
		Self {
			history: vec![DepositStage::Idle],
		}
	}

	/// Current stage.
	pub fn stage(&self) -> DepositStage {
		self.history
			.last()
			.copied()
			.unwrap_or(DepositStage::Idle)
	}

	/// All stages visited so far, starting with `Idle`.
	pub fn history(&self) -> &[DepositStage] {
		&self.history
	}

	/// True if `stage` was entered during this attempt.
	pub fn visited(&self, stage: DepositStage) -> bool {
		self.history.contains(&stage)
	}

	pub fn is_terminal(&self) -> bool {
		self.stage().is_terminal()
	}

	/// Moves to `next` if the transition table allows it.
	pub fn transition(&mut self, next: DepositStage) -> Result<(), StageError> {
		let from = self.stage();
		let allowed = TRANSITIONS
			.get(&from.kind())
			.is_some_and(|set| set.contains(&next.kind()));
		if !allowed {
			return Err(StageError::InvalidTransition { from, to: next });
		}

		tracing::trace!(from = %from, to = %next, "Deposit stage transition");
		self.history.push(next);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const HAPPY_PATH: [DepositStage; 8] = [
		DepositStage::CheckingConnectivity,
		DepositStage::CheckingBalance,
		DepositStage::CheckingContracts,
		DepositStage::FetchingNonce,
		DepositStage::Building,
		DepositStage::Signing,
		DepositStage::Broadcasting,
		DepositStage::Succeeded,
	];

	#[test]
	fn test_happy_path_is_accepted() {
		let mut attempt = DepositAttempt::new();
		for stage in HAPPY_PATH {
			attempt.transition(stage).unwrap();
		}
		assert_eq!(attempt.stage(), DepositStage::Succeeded);
		assert_eq!(attempt.history().len(), 9);
		assert!(attempt.is_terminal());
	}

	#[test]
	fn test_every_non_terminal_stage_can_fail() {
		let mut prefix = vec![DepositStage::Idle];
		prefix.extend_from_slice(&HAPPY_PATH[..7]);

		for depth in 0..prefix.len() {
			let mut attempt = DepositAttempt::new();
			for stage in &HAPPY_PATH[..depth] {
				attempt.transition(*stage).unwrap();
			}
			assert_eq!(attempt.stage(), prefix[depth]);
			attempt
				.transition(DepositStage::Failed(DepositErrorKind::Network))
				.unwrap();
			assert!(attempt.is_terminal());
		}
	}

	#[test]
	fn test_stages_cannot_be_skipped() {
		let mut attempt = DepositAttempt::new();
		let err = attempt.transition(DepositStage::Building).unwrap_err();
		assert_eq!(
			err,
			StageError::InvalidTransition {
				from: DepositStage::Idle,
				to: DepositStage::Building,
			}
		);
		assert_eq!(attempt.stage(), DepositStage::Idle);
	}

	#[test]
	fn test_terminal_stages_are_final() {
		let mut failed = DepositAttempt::new();
		failed
			.transition(DepositStage::Failed(DepositErrorKind::InvalidAmount))
			.unwrap();
		assert!(failed.transition(DepositStage::CheckingConnectivity).is_err());
		assert!(failed
			.transition(DepositStage::Failed(DepositErrorKind::Network))
			.is_err());

		let mut succeeded = DepositAttempt::new();
		for stage in HAPPY_PATH {
			succeeded.transition(stage).unwrap();
		}
		assert!(succeeded
			.transition(DepositStage::Failed(DepositErrorKind::Contract))
			.is_err());
	}
}
