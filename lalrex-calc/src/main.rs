//! Command-line interface for the lalrex calculator.
//!
//! Reads expressions one per line from a file (or standard input with `-`)
//! and prints each result; malformed lines are reported and skipped.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use lalrex_calc::Calculator;
use std::io::Read;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates expressions, one per line
    Eval {
        /// Input file with expressions; `-` reads standard input
        #[arg(short, long)]
        input: String,
    },
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("cannot read standard input")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {path:?}"))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Eval { input } => {
            let text = read_input(&input)?;
            let calc = Calculator::new();
            for line in text.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                match calc.eval(line) {
                    Ok(value) => println!("{value}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
        }
    }
    Ok(())
}
