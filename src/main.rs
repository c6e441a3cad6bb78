use clap::error::{ContextKind, ErrorKind};
use clap::Parser;
use collatz::{report::RunReport, verify, CollatzError, Interval, RunConfig, Strategy};
use num_bigint::BigInt;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "collatz_interval")]
#[command(
    about = "Checks every number in [lower, upper) against the Collatz conjecture",
    long_about = None
)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Lower bound (inclusive)
    lower: BigInt,
    /// Upper bound (exclusive)
    upper: BigInt,
    /// All numbers from 1 to the lower bound are known to obey the conjecture
    #[arg(short = 'k', long = "known")]
    known: bool,
    /// Worker threads (defaults to one per processing unit)
    #[arg(long)]
    workers: Option<usize>,
    /// Steps a candidate may take before it is reported
    #[arg(long)]
    max_steps: Option<u64>,
    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Accepts the historical single-dash `-known` spelling.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| if arg == "-known" { "--known".to_string() } else { arg })
        .collect()
}

/// Options that take a value and sit outside the positional `<lower> <upper> [-k]` form.
const VALUE_OPTIONS: [&str; 3] = ["--workers", "--max-steps", "--report"];

/// Counts the arguments of the `<lower> <upper> [-k]` form, leaving out the program name and
/// the value options.
fn surface_arg_count(args: &[String]) -> usize {
    let mut count = 0;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            rest.next();
        } else if !VALUE_OPTIONS.iter().any(|opt| arg.starts_with(&format!("{}=", opt))) {
            count += 1;
        }
    }
    count
}

fn print_usage(program: &str) {
    println!("Please use one of the following formats:\n");
    println!("{} <Lower Bound> <Upper Bound>", program);
    println!("{} <Lower Bound> <Upper Bound> <Optional>", program);
    println!("\nOptional Parameter:\n");
    println!(
        "\t'-k' or '-known': If all numbers from 1 to lowerBound obey the Collatz conjecture, \
         using this flag cuts down computational time significantly"
    );
}

fn handle_parse_error(args: &[String], program: &str, err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        ErrorKind::UnknownArgument if surface_arg_count(args) > 3 => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        ErrorKind::UnknownArgument => {
            let param = err
                .get(ContextKind::InvalidArg)
                .map(|v| v.to_string())
                .unwrap_or_default();
            println!("Error! Unknown parameter '{}'", param);
            ExitCode::from(255)
        }
        ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
            println!("Bounds must be base-10 integers\n");
            print_usage(program);
            ExitCode::SUCCESS
        }
        _ => {
            print_usage(program);
            ExitCode::SUCCESS
        }
    }
}

fn build_config(cli: &Cli) -> RunConfig {
    let mut config = RunConfig::detect();
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    if let Some(max_steps) = cli.max_steps {
        config = config.with_max_steps(max_steps);
    }
    if cli.known {
        config = config.with_strategy(Strategy::Known);
    }
    config
}

fn run(cli: Cli) -> Result<(), CollatzError> {
    let interval = Interval::new(cli.lower.clone(), cli.upper.clone())?;
    let config = build_config(&cli);

    if config.strategy == Strategy::Known {
        tracing::info!(
            lower = %interval.lower(),
            "trusting that every number below the lower bound converges"
        );
    }

    let verdict = verify(&interval, &config)?;
    if verdict.all_passed() {
        println!("All numbers in the interval obey the collatz conjecture");
    }

    if let Some(path) = &cli.report {
        RunReport::new(&interval, &config, &verdict).write_to(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    collatz::init_tracing("collatz-interval");

    let args = normalize_args(std::env::args());
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "collatz_interval".to_string());

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => return handle_parse_error(&args, &program, err),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_bound_error() => {
            println!("{}", err);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            println!("{}", err);
            ExitCode::FAILURE
        }
    }
}
