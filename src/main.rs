use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tmc_submit::client::GradingClient;
use tmc_submit::config::Settings;
use tmc_submit::console::{Console, Terminal};
use tmc_submit::engine::{SubmitCommand, SubmitFlags};
use tmc_submit::workdir::WorkDir;

#[derive(Parser)]
#[command(name = "tmc")]
#[command(about = "Submit exercises to a TMC grading server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit exercises
    Submit {
        /// Exercise directories to submit. Defaults to the current directory.
        exercises: Vec<String>,

        /// Show all test results
        #[arg(short, long)]
        all: bool,

        /// Show detailed error message
        #[arg(short, long)]
        details: bool,

        /// Filter out exercises that haven't been locally tested
        #[arg(short, long)]
        completed: bool,
    },
}

/// Initialize tracing on stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tmc_submit=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let console = Terminal;

    match cli.command {
        Commands::Submit {
            exercises,
            all,
            details,
            completed,
        } => {
            let settings = Settings::load()?;
            if !settings.is_logged_in() {
                console.error("You are not logged in. Log in using: tmc login");
                return Ok(ExitCode::FAILURE);
            }

            let workdir = WorkDir::discover(std::env::current_dir()?);
            let Some(course_dir) = workdir.course_dir() else {
                console.error("Not in a course directory.");
                return Ok(ExitCode::FAILURE);
            };

            let client = GradingClient::from_settings(&settings, course_dir);
            let flags = SubmitFlags {
                show_all: all,
                show_details: details,
                filter_uncompleted: completed,
            };

            let command =
                SubmitCommand::new(&client, &console).with_api_version(settings.api_version);
            match command.run(&workdir, &exercises, flags).await {
                Ok(report) => {
                    tracing::debug!("Submit finished: {:?}", report);
                    Ok(ExitCode::SUCCESS)
                }
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
    }
}
