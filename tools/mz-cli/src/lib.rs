//! # Monza Command Line
//!
//! Notification search and block stutter detection for Neo N3 chains.
//!
//! ```bash
//! # Transfers of GAS and every NewEpoch in a thousand blocks
//! monza run -r http://localhost:30333 --from 101000 --to p1000 -n "Transfer:gas" -n "NewEpoch:*"
//!
//! # Gaps above 20 seconds in the last 5000 blocks
//! monza stutter -r http://localhost:30333 --from m5000 -t 20s
//! ```
//!
//! Results go to stdout, logs and progress to stderr (`MONZA_LOG` sets the
//! filter).

pub mod commands;
pub mod config;
pub mod criteria;
pub mod interval;
pub mod progress;
pub mod rpc;

use clap::{Parser, Subcommand};

use commands::run::RunArgs;
use commands::show::ShowArgs;
use commands::stutter::StutterArgs;

/// Monitor notification events in N3 compatible chains
#[derive(Debug, Parser)]
#[command(name = "monza")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up over subset of blocks to find notifications
    Run(RunArgs),
    /// Find gaps between block timestamps above a threshold
    Stutter(StutterArgs),
    /// Print one block with its transactions and notifications
    Show(ShowArgs),
}
