use crate::demo::{run_assess, run_batch, run_demo, AssessArgs, BatchArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use maternal_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Maternal Risk",
    about = "Score maternal-health symptom reports from the command line or over HTTP",
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
    /// Score one JSON answer sheet and print the report
    Assess(AssessArgs),
    /// Score every row of a symptom tracker CSV export
    Batch(BatchArgs),
    /// Walk a few synthetic check-ins through the full service
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
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
