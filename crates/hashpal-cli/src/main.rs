use clap::{Parser, Subcommand};
use log::debug;

mod dgst;
mod list;
mod speed;

/// hashpal command-line tool for message digests.
#[derive(Parser)]
#[command(name = "hashpal")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash/digest operations.
    Dgst {
        /// Hash algorithm (md5, sha1, sha256, sha384, sha512).
        #[arg(short, long, default_value = "sha256")]
        algorithm: String,
        /// Expected digest in hex; fail unless the input matches.
        #[arg(short, long)]
        check: Option<String>,
        /// Input file (use - for stdin).
        file: String,
    },
    /// List supported digest algorithms.
    List,
    /// Measure one-shot digest throughput.
    Speed {
        /// Algorithm to measure, or "all".
        #[arg(short, long, default_value = "all")]
        algorithm: String,
        /// Seconds to run each measurement.
        #[arg(short, long, default_value = "3")]
        seconds: u64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Dgst {
            algorithm,
            check,
            file,
        } => {
            debug!("dgst: algorithm={algorithm} file={file}");
            dgst::run(algorithm, file, check.as_deref())
        }
        Commands::List => {
            debug!("list");
            list::run()
        }
        Commands::Speed { algorithm, seconds } => {
            debug!("speed: algorithm={algorithm} seconds={seconds}");
            speed::run(algorithm, *seconds)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
