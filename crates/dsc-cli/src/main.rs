//! # dsc CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Dataspace console: operator tooling for a connector gateway.
///
/// Prints action tables, reads gateway resources, triggers process actions,
/// tails the push channel and runs business-side policy and request flows.
#[derive(Parser, Debug)]
#[command(name = "dsc", version, about)]
struct Cli {
    /// Log as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the action-eligibility table.
    Actions(dsc_cli::actions::ActionsArgs),
    /// Read a gateway resource.
    Get(dsc_cli::get::GetArgs),
    /// Trigger an action on a process.
    Rpc(dsc_cli::rpc::RpcArgs),
    /// Tail the push channel.
    Listen(dsc_cli::listen::ListenArgs),
    /// Curate dataset policies and decide on access requests.
    Business(dsc_cli::business::BusinessArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match &cli.command {
        Commands::Actions(args) => dsc_cli::actions::run(args),
        Commands::Get(args) => dsc_cli::get::run(args).await,
        Commands::Rpc(args) => dsc_cli::rpc::run(args).await,
        Commands::Listen(args) => dsc_cli::listen::run(args).await,
        Commands::Business(args) => dsc_cli::business::run(args).await,
    }
}
