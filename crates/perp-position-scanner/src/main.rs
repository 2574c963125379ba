//! Perpetuals position scanner
//!
//! `perp-position-scanner [POSITION_ADDRESS]`
//!
//! With an address, prints that position as JSON. Without one, collects every
//! open position of the configured program and prints the report as JSON.

use anyhow::{Context, Result};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::info;

use perp_position_scanner::{
    logging, CollectionReport, PositionCollector, PositionSummary, RpcAccountSource, ScannerConfig,
};

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = ScannerConfig::from_env().context("Invalid configuration")?;
    logging::init_subscriber(&config.log_level);

    info!("Connecting to RPC: {}", config.rpc_url);
    info!("Program ID: {}", config.program_id);

    let source = RpcAccountSource::new(
        config.rpc_url.clone(),
        config.request_timeout,
        config.commitment,
    );
    let collector = PositionCollector::new(source).with_policy(config.decode_policy);

    if let Some(arg) = std::env::args().nth(1) {
        let address = Pubkey::from_str(&arg)
            .with_context(|| format!("Invalid position address: {}", arg))?;
        let position = collector
            .fetch_position(&address)?
            .with_context(|| format!("Position account {} not found", address))?;
        let summary = PositionSummary::new(address, &position);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let collection = match &config.owner {
        Some(owner) => collector.collect_for_owner(&config.program_id, owner)?,
        None => collector.collect(&config.program_id)?,
    };

    let report = CollectionReport::from(&collection);
    for summary in &report.positions {
        info!("{}", summary);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
