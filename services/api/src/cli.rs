use crate::report::{run_recommend, run_score, RecommendArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use decolagem::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Decolagem Dignômetro",
    about = "Score family questionnaires and suggest goals from the command line or over HTTP",
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
    /// Run the Dignômetro engine against answer files
    Dignometro {
        #[command(subcommand)]
        command: DignometroCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DignometroCommand {
    /// Print the score and poverty level for a questionnaire
    Score(ScoreArgs),
    /// Print newly vulnerable dimensions and the goals suggested for them
    Recommend(RecommendArgs),
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
        Command::Dignometro {
            command: DignometroCommand::Score(args),
        } => run_score(args),
        Command::Dignometro {
            command: DignometroCommand::Recommend(args),
        } => run_recommend(args),
    }
}
