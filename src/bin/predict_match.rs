use anyhow::{Context, Result};

use match_result_terminal::chart::ProbabilityChart;
use match_result_terminal::cli::{self, Command};
use match_result_terminal::logging;
use match_result_terminal::session::{Session, SessionConfig};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_stderr_logging();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = cli::parse_args(&args)?;
    let session = Session::load(&SessionConfig::from_env()).context("startup failed")?;

    match command {
        Command::ListTeams => {
            for team in session.teams() {
                println!("{team}");
            }
        }
        Command::Predict { home, away } => {
            let outcome = session
                .request(&home, &away)
                .context("prediction failed")?;
            println!("{}", outcome.message());
            if let Some(prediction) = outcome.prediction() {
                println!();
                println!("{}", cli::render_table(&ProbabilityChart::from_prediction(prediction)));
            }
        }
    }

    Ok(())
}
