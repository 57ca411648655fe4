use crate::demo::{run_demo, run_preview, run_rank, DemoArgs, PreviewArgs, RankArgs};
use crate::server;
use brew_qc::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Brewery Sample Ordering",
    about = "Rank tasting samples and run the sample ordering service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank a sample file with a configuration and print the ordering
    Rank(RankArgs),
    /// Preview an ordering without validation failures
    Preview(PreviewArgs),
    /// Rank a built-in set of samples with the routine default configuration
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Preview(args) => run_preview(args),
        Command::Demo(args) => run_demo(args),
    }
}
