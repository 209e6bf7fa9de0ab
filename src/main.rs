use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use shiftplan::error::Error;
use shiftplan::io;
use shiftplan::scheduler::{SchedulingModel, SolverConfig};
use shiftplan::server;

#[derive(Parser)]
#[command(about = "University shift scheduling via mixed-integer programming")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a problem file and write the solution file
    Solve {
        problem: PathBuf,
        solution: PathBuf,
    },
    /// Run the HTTP job server
    Api {
        #[arg(default_value = "127.0.0.1")]
        host: String,
        #[arg(default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Solve { problem, solution } => match solve_once(&problem, &solution) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        },
        Command::Api { host, port } => match server::run_server(&host, port).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        },
    }
}

fn solve_once(problem_path: &Path, solution_path: &Path) -> Result<(), Error> {
    let problem = io::import_problem_file(problem_path)?;
    let model = SchedulingModel::new(problem)?;
    let solution = model.solve(&SolverConfig::default())?;
    io::write_solution_file(solution_path, &solution)?;

    Ok(())
}
