use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fsa_regex::{dot, render_outcome, synthesis, Automaton, Grammar};

#[derive(Parser, Debug)]
#[command(
    name = "fsa-regex",
    about = "Validates a deterministic FSA definition and converts it to a regular expression"
)]
struct Cli {
    /// Five-line FSA definition.
    #[arg(value_name = "FILE", default_value = "fsa.txt")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE", default_value = "result.txt")]
    output: PathBuf,

    /// Read `init.st=`/`fin.st=` lines instead of `initial=`/`accepting=`.
    #[arg(long)]
    legacy_keywords: bool,

    /// Also write a Graphviz rendering of a valid automaton.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let grammar = if cli.legacy_keywords {
        Grammar::Legacy
    } else {
        Grammar::Standard
    };

    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let outcome = match Automaton::parse(&input, grammar) {
        Ok(automaton) => {
            if let Some(path) = &cli.dot {
                std::fs::write(path, dot::to_dot(&automaton))
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            let regex = synthesis::to_regex(&automaton);
            log::info!(
                "{} states converted to a {} byte expression",
                automaton.num_states(),
                regex.len()
            );
            Ok(regex)
        }
        Err(e) => {
            log::info!("rejected {}: {}", cli.input.display(), e);
            Err(e)
        }
    };

    std::fs::write(&cli.output, render_outcome(&outcome))
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    Ok(())
}
