use clap::{Parser, Subcommand};

/// sora2api token administration client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Admin access token (overrides config file)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch all tokens and print the sorted table
    List,

    /// Test every token, inactive ones first
    TestAll,

    /// Disable tokens with fewer than 2 remaining uses
    DisableLow,

    /// Enable inactive tokens that are eligible again
    EnableEligible,

    /// Delete all tokens marked 401 or already expired
    Cleanup,
}
