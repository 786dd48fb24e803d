//! pollscan — recount a ledger poll from public chain data.

mod config;

use anyhow::Context;
use clap::Parser;
use config::FileConfig;
use pollscan_engine::{audit_poll, PollAudit};
use pollscan_transport::NodeClient;
use pollscan_types::{Address, NetworkId, Timestamp};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pollscan", about = "Audit a message-based ledger poll")]
struct Cli {
    /// Account address of the poll to audit.
    poll_address: String,

    /// Node host (defaults to a well-known node for the poll's network).
    #[arg(long, env = "POLLSCAN_HOST")]
    host: Option<String>,

    /// Node REST port.
    #[arg(long, env = "POLLSCAN_PORT")]
    port: Option<u16>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "POLLSCAN_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pollscan_utils::init_tracing();

    let cli = Cli::parse();
    let file_config = cli
        .config
        .as_deref()
        .and_then(FileConfig::load)
        .unwrap_or_default();

    let poll_address = Address::new(&cli.poll_address);
    anyhow::ensure!(
        poll_address.is_well_formed(),
        "{} is not a valid account address",
        cli.poll_address
    );

    // The network is fixed by the poll address and threaded through every
    // call; nothing below reads it from ambient state.
    let network = NetworkId::from_address(&poll_address);
    let host = cli
        .host
        .or(file_config.host)
        .unwrap_or_else(|| network.default_host().to_string());
    let port = cli.port.or(file_config.port).unwrap_or_else(|| network.default_port());
    let timeout = Duration::from_secs(cli.timeout_secs.or(file_config.timeout_secs).unwrap_or(10));

    tracing::info!(
        "auditing poll {poll_address} on {} via {host}:{port}",
        network.as_str()
    );

    let client = NodeClient::with_timeout(&host, port, timeout);
    let audit = audit_poll(&client, &poll_address, network, Timestamp::now())
        .await
        .context("audit produced no result; check that the address is a well-formed poll")?;

    print_audit(&poll_address, &audit);
    Ok(())
}

fn print_audit(poll_address: &Address, audit: &PollAudit) {
    let mode = audit
        .definition
        .form_data
        .weighting_mode()
        .map(|m| m.as_str())
        .unwrap_or("unknown");

    println!("Results for poll {poll_address}");
    println!();
    println!("  {}", audit.definition.description);
    println!("  mode: {mode}");
    if audit.definition.form_data.multiple {
        println!("  multiple selections allowed");
    }
    match audit.cutoff {
        Some(height) => println!("  counted up to block {height}"),
        None => println!("  this poll has not finished yet; results are provisional"),
    }
    println!();
    for option in &audit.result.options {
        println!(
            "  {:<24} votes {:>5}   weighted {:>12.6}   {:>6.2}%",
            option.label, option.votes, option.weighted, option.percentage
        );
    }
    println!();
    println!("  total valid votes: {}", audit.result.total_votes);
}
