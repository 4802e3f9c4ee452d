use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: inspect and edit tracking cookie state",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raw `Cookie:` header value to read state from
    #[arg(long, global = true, default_value = "")]
    pub cookie: String,

    /// Cookie domain, also the domain fingerprint input
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Cookie name prefix
    #[arg(long = "ns", global = true)]
    pub prefix: Option<String>,

    /// TOML file with SDK settings
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Write every cookie as session-only
    #[arg(long, global = true)]
    pub session_only: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the domain fingerprint of a domain
    Fingerprint(FingerprintArgs),
    /// Resolve and show every store found in the cookie header
    Inspect(InspectArgs),
    /// Show one store, or one field of it
    Get(GetArgs),
    /// Set a field and print the resulting Set-Cookie header
    Set(SetArgs),
    /// Clear a store or one field and print the resulting Set-Cookie header
    Clear(ClearArgs),
}

#[derive(Args)]
pub struct FingerprintArgs {
    pub domain: String,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Also list candidates for stores with no registered policy
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub store: String,
    pub field: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub store: String,
    pub field: String,
    pub value: String,
    /// Parse the value as JSON instead of taking it as text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    pub store: String,
    pub field: Option<String>,
}
