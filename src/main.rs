use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use itertools::Itertools;
use resistor_combo::{notation, Circuit, CircuitSearch, Error, MAX_POOL_SIZE};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Find the combination of resistors closest to a target
    Search(Search),
    /// Calculate the resistance of a circuit written as `[a - [[b] || [c]]]`
    Eval(Eval),
}

#[derive(Debug, clap::Args)]
struct Search {
    /// Target resistance, prompted for when omitted
    #[arg(short, long)]
    target: Option<String>,

    /// Print values in engineering notation (4K7, 100R)
    #[arg(short, long)]
    notation: bool,

    /// Resistor values, as separate arguments or comma separated. Read from stdin when omitted.
    values: Vec<String>,
}

#[derive(Debug, clap::Args)]
struct Eval {
    /// Circuit text, values may use engineering notation
    circuit: String,
}

impl Cli {
    fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command {
            Command::Search(cmd) => cmd.run(),
            Command::Eval(cmd) => cmd.run(),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn prompt(msg: &str) -> anyhow::Result<String> {
    println!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn parse_pool<'a>(args: impl IntoIterator<Item = &'a str>) -> anyhow::Result<Vec<f64>> {
    args.into_iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| notation::parse_value(v).with_context(|| format!("bad resistor value '{}'", v)))
        .collect()
}

impl Search {
    #[instrument(skip_all)]
    fn run(self) -> anyhow::Result<()> {
        let pool = if self.values.is_empty() {
            let line = prompt(&format!(
                "Enter resistor values (up to {}, comma separated):",
                MAX_POOL_SIZE
            ))?;
            parse_pool([line.as_str()])?
        } else {
            parse_pool(self.values.iter().map(String::as_str))?
        };
        if pool.is_empty() || pool.len() > MAX_POOL_SIZE {
            bail!(
                "invalid number of resistors ({}), enter 1-{} values",
                pool.len(),
                MAX_POOL_SIZE
            );
        }

        let target = match self.target {
            Some(t) => t,
            None => prompt("Enter the target resistance:")?,
        };
        let target = notation::parse_value(&target)
            .with_context(|| format!("bad target value '{}'", target))?;

        let mut search = CircuitSearch::configure(pool.iter().cloned(), target)?;
        search.search();
        tracing::info!(evaluated = search.stats().evaluated, "done");

        let show = |v: f64| {
            if self.notation {
                notation::format_value(v)
            } else {
                v.to_string()
            }
        };

        let best = match search.best_result() {
            Ok(best) => best,
            Err(Error::EmptyPool) => {
                println!("No valid circuit found.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        println!("Resistors: {}", pool.iter().map(|v| show(*v)).join(", "));
        println!("Target: {} Ω", show(target));
        if self.notation {
            println!("Circuit: {:#}", best.circuit);
        } else {
            println!("Circuit: {}", best.circuit);
        }
        println!("Total: {:.2} Ω", best.total);
        println!("Error: {:.2}%", best.error_percent);
        Ok(())
    }
}

impl Eval {
    fn run(self) -> anyhow::Result<()> {
        let circuit: Circuit = self
            .circuit
            .parse()
            .with_context(|| format!("failed to parse circuit '{}'", self.circuit))?;
        println!("{:.2} Ω", circuit.resistance());
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
