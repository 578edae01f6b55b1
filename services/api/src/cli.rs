use crate::demo::{run_demo, run_evaluate, run_report, DemoArgs, EvaluateArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_compliance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HR Compliance Tracker",
    about = "Track passport, DBS, immigration, right to work, and spot-check expiry from the command line",
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
    /// Evaluate a single relevant date against a warning window
    Evaluate(EvaluateArgs),
    /// Build a paginated compliance report from a CSV export
    Report(ReportArgs),
    /// Print every compliance screen for a seeded demo company
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
