use crate::demo::{run_demo, run_emi, DemoArgs, EmiArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use homeloan::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Home Loan Application Service",
    about = "Run the home loan calculators and walk through the application wizard",
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
    /// Compute an EMI breakdown and optional amortization schedule
    Emi(EmiArgs),
    /// Walk a scripted applicant through every wizard step and submit
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
        Command::Emi(args) => run_emi(args),
        Command::Demo(args) => run_demo(args),
    }
}
