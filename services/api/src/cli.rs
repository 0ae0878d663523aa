use crate::demo::{run_demo, DemoArgs};
use crate::screening::{run_epds, run_risk, EpdsArgs, RiskArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use postpartum_care::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Postpartum Care",
    about = "Run the postpartum care service or score screenings from the command line",
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
    /// Score a ten-answer EPDS questionnaire
    Epds(EpdsArgs),
    /// Combine an EPDS score with lifestyle factor answers
    Risk(RiskArgs),
    /// Walk through registration, check-ins, screening and messaging against in-memory storage
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
        Command::Epds(args) => run_epds(args),
        Command::Risk(args) => run_risk(args),
        Command::Demo(args) => run_demo(args),
    }
}
