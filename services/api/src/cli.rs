use crate::demo::{run_commission_quote, run_demo, run_offer_quote, CommissionArgs, DemoArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use revstream::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Revstream Capital Platform",
    about = "Run the Revstream Capital revenue-advance service and quoting tools from the command line",
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
    /// Quote advances and commissions without starting the service
    Offer {
        #[command(subcommand)]
        command: OfferCommand,
    },
    /// Run an end-to-end CLI demo covering pricing and the onboarding funnel
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum OfferCommand {
    /// Quote an advance for a chosen total repayment
    Quote(QuoteArgs),
    /// Quote the flat property-manager commission for a rent roll
    Commission(CommissionArgs),
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
        Command::Offer {
            command: OfferCommand::Quote(args),
        } => run_offer_quote(args),
        Command::Offer {
            command: OfferCommand::Commission(args),
        } => run_commission_quote(args),
        Command::Demo(args) => run_demo(args),
    }
}
