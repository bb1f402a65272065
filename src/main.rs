use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use automata::dfa::core::Input;
use automata::dfa::dead::DeadStatePolicy;
use automata::dfa::reader::{DFAReader, Definition};

#[derive(Parser)]
#[command(name = "dfa")]
#[command(about = "Run deterministic finite automata against their test strings")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(default_value = "data/fa_configuration.txt")]
    file: PathBuf,

    /// Configuration format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: Format,

    /// Dead state analysis
    #[arg(short, long, value_enum, default_value = "exact")]
    dead_states: DeadStates,

    /// Only print the test results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Batch,
    Keyed,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeadStates {
    Exact,
    Incremental,
    Off,
}

impl From<DeadStates> for DeadStatePolicy {
    fn from(d: DeadStates) -> DeadStatePolicy {
        match d {
            DeadStates::Exact => DeadStatePolicy::Exact,
            DeadStates::Incremental => DeadStatePolicy::Incremental,
            DeadStates::Off => DeadStatePolicy::Disabled,
        }
    }
}

fn run(def: &Definition, policy: DeadStatePolicy, quiet: bool) -> automata::dfa::reader::Result<()> {
    let dfa = def.build(policy)?;
    if !quiet {
        println!("Inputted Finite State Automaton Info:");
        print!("{}", dfa);
    }
    println!("Results of test strings:");
    for test in def.tests.iter() {
        let input = Input::parse(test);
        let verdict = if dfa.accepts_input(input) { "Accept" } else { "Reject" };
        println!("{}: {}", input, verdict);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let contents = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Error reading configuration file {}", cli.file.display()))?;
    let defs = match cli.format {
        Format::Auto => DFAReader::new_from_string(&contents),
        Format::Batch => DFAReader::read_batch(&contents),
        Format::Keyed => vec![DFAReader::read_keyed(&contents)],
    };

    let policy = cli.dead_states.into();
    let mut failures = 0;
    for (i, def) in defs.iter().enumerate() {
        println!("Testing Finite Automaton #{}:", i + 1);
        let error = match def {
            Ok(def) => run(def, policy, cli.quiet).err().map(|e| e.to_string()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(e) = error {
            eprintln!("FA #{}: {}", i + 1, e);
            failures += 1;
        }
        println!();
    }
    if failures > 0 {
        bail!("{} of {} automata could not be built", failures, defs.len());
    }
    Ok(())
}
