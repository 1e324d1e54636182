//! Main entry point for the deposit tool.
//!
//! Loads the configuration, wires the HTTP chain client and the environment
//! key source into the orchestrator, and runs one command: a deposit, the
//! pre-flight diagnostics, a pool query or key generation.

use clap::{Parser, Subcommand};
use deposit_config::Config;
use deposit_types::{parse_checksummed_address, Address};
use std::path::PathBuf;

mod factory;

/// Command-line arguments for the deposit tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/deposit.toml", global = true)]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info", global = true)]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
	/// Supply an amount of the configured asset to the pool
	Supply {
		/// Amount in whole tokens, e.g. 10 or 2.5
		#[arg(short, long)]
		amount: String,
	},
	/// Run the pre-flight checks without sending anything
	Diagnose {
		/// Print the report as JSON
		#[arg(long)]
		json: bool,
	},
	/// Show a user's aggregate pool position
	Position {
		/// Checksummed address; defaults to the configured beneficiary
		#[arg(short, long, value_parser = parse_checksummed_address)]
		user: Option<Address>,
	},
	/// Show the reserve state of the configured asset
	Reserve,
	/// Generate a fresh signing key
	NewKey,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	if args.command == Command::NewKey {
		let (address, key) = deposit_account::generate_key();
		println!("Address:     {}", address);
		key.with_exposed(|raw| println!("Private key: {}", raw));
		return Ok(());
	}

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Config path is not valid UTF-8: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		chain_id = config.endpoint.chain_id,
		pool = %config.endpoint.pool_address,
		asset = %config.asset.symbol,
		"Loaded configuration"
	);

	let orchestrator = factory::build_orchestrator(config)?;

	match args.command {
		Command::Supply { amount } => match orchestrator.deposit(&amount).await {
			Ok(hash) => println!("{}", hash),
			Err(e) => {
				tracing::error!(class = %e.class(), "Deposit failed");
				return Err(e.into());
			},
		},
		Command::Diagnose { json } => {
			let report = orchestrator.diagnose().await?;
			if json {
				println!("{}", serde_json::to_string_pretty(&report)?);
			} else {
				println!("{}", report);
			}
			if !report.all_passed() {
				return Err("Diagnostics failed".into());
			}
		},
		Command::Position { user } => {
			let user = user.unwrap_or(orchestrator.config().endpoint.beneficiary_address);
			let position = orchestrator.pool_reader().user_account_data(user).await?;
			println!("Position of {}", user);
			println!("{}", position);
		},
		Command::Reserve => {
			let asset = orchestrator.config().endpoint.asset_address;
			let reserve = orchestrator.pool_reader().reserve_data(asset).await?;
			println!("{} reserve", orchestrator.config().asset.symbol);
			println!("{}", reserve);
		},
		Command::NewKey => {},
	}

	Ok(())
}
