use clap::error::ErrorKind;
use clap::Parser;
use collatz::{check_number, Interval, Outcome, DEFAULT_MAX_STEPS};
use num_bigint::BigInt;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "collatz_number")]
#[command(about = "Checks a single number against the Collatz conjecture", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Number to be checked
    number: BigInt,
    /// Steps the number may take before it is reported
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u64,
}

fn print_usage(program: &str) {
    println!("Please use the following format:\n");
    println!("{} <Number to be checked>", program);
}

fn main() -> ExitCode {
    collatz::init_tracing("collatz-number");

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "collatz_number".to_string());

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = err.print();
            } else {
                print_usage(&program);
            }
            return ExitCode::SUCCESS;
        }
    };

    // The interval holding only this number; rejects anything below 1.
    let interval = match Interval::single(cli.number.clone()) {
        Ok(interval) => interval,
        Err(_) => {
            println!("Number must be greater than zero");
            return ExitCode::SUCCESS;
        }
    };

    let n = interval.lower();
    match check_number(n, cli.max_steps) {
        Outcome::Converged { .. } => println!("{} obeys the collatz conjecture", n),
        Outcome::LimitExceeded => println!("{} exceeded iteration limit", n),
    }
    ExitCode::SUCCESS
}
