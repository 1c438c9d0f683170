use crate::core::mhs::ProbeSelection;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mhs-probe")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Inbound health check and outbound PDS retrieval probes for an MHS deployment")]
pub struct Cli {
    /// Which probe to run
    #[arg(value_enum, default_value_t = ProbeTarget::All)]
    pub probe: ProbeTarget,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// NHS environment to probe, overrides NHS_ENVIRONMENT
    #[arg(short = 'e', long = "env")]
    pub env: Option<String>,

    /// Print the report as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Write a template config file and exit
    #[arg(long = "init")]
    pub init: bool,

    /// Validate configuration and exit
    #[arg(long = "check")]
    pub check: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    /// GET <inbound>/healthcheck
    Health,
    /// POST a PDS retrieval query to outbound
    Outbound,
    /// Both, health first
    All,
}

impl From<ProbeTarget> for ProbeSelection {
    fn from(target: ProbeTarget) -> Self {
        match target {
            ProbeTarget::Health => ProbeSelection::Health,
            ProbeTarget::Outbound => ProbeSelection::Outbound,
            ProbeTarget::All => ProbeSelection::All,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
