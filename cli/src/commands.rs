pub mod audit;
pub mod probe;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use siteaudit_common::config::{
    AuditConfig, Credentials, DEFAULT_CONCURRENCY, DEFAULT_ROUTER_COMMAND, DEFAULT_SSH_PORT,
    DEFAULT_SWITCH_COMMAND, ProbeSettings,
};

#[derive(Parser)]
#[command(name = "siteaudit")]
#[command(about = "Audit reachability and management bindings of a site device fleet.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce terminal output (-q hides the banner and tables, -qq leaves only the summary line)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit every site record of a CSV inventory
    #[command(alias = "a")]
    Audit(AuditArgs),
    /// Check whether one or more addresses answer ICMP echo
    #[command(alias = "p")]
    Probe(ProbeArgs),
}

#[derive(Args)]
pub struct AuditArgs {
    /// CSV inventory with "UPS IP", "OLT IP", "Router IP" and "Switch IP" columns
    pub input: PathBuf,

    /// Report destination, defaults to report_<timestamp>.csv
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, env = "SITEAUDIT_USERNAME")]
    pub username: String,

    #[arg(long, env = "SITEAUDIT_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, default_value = DEFAULT_ROUTER_COMMAND)]
    pub router_command: String,

    #[arg(long, default_value = DEFAULT_SWITCH_COMMAND)]
    pub switch_command: String,

    /// SSH port of the managed devices
    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Records audited at the same time
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    #[command(flatten)]
    pub ping: PingArgs,

    #[arg(long, default_value_t = 15)]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value_t = 60)]
    pub read_timeout_secs: u64,

    /// Abandon sessions still running this long after the audit started
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

#[derive(Args)]
pub struct ProbeArgs {
    #[arg(required = true)]
    pub addresses: Vec<String>,

    #[command(flatten)]
    pub ping: PingArgs,
}

#[derive(Args, Clone, Copy)]
pub struct PingArgs {
    /// Wait for each echo reply, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    pub ping_timeout_ms: u64,

    /// Echo requests before a host counts as unreachable
    #[arg(long, default_value_t = 2)]
    pub ping_attempts: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<PingArgs> for ProbeSettings {
    fn from(args: PingArgs) -> Self {
        Self {
            timeout: Duration::from_millis(args.ping_timeout_ms),
            attempts: args.ping_attempts,
        }
    }
}

impl AuditArgs {
    pub fn to_config(&self) -> AuditConfig {
        let mut cfg = AuditConfig::new(Credentials::new(&self.username, &self.password));
        cfg.commands.router = self.router_command.clone();
        cfg.commands.switch = self.switch_command.clone();
        cfg.probe = self.ping.into();
        cfg.session.port = self.port;
        cfg.session.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        cfg.session.read_timeout = Duration::from_secs(self.read_timeout_secs);
        cfg.concurrency = self.concurrency;
        cfg.batch_deadline = self.deadline_secs.map(Duration::from_secs);
        cfg
    }
}
