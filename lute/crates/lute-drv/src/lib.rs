//! lute-drv - The `lute` command line driver.
//!
//! Orchestrates the pipeline for one script:
//!
//! ```text
//! read file -> lex -> parse -> evaluate (with lute-std installed)
//! ```
//!
//! Interpreter errors are rendered with their source line and caret span
//! and turn into exit code 1. `--dump-ast` stops after parsing and prints
//! the tree as JSON. Without a script the driver drops into a line REPL
//! against a persistent interpreter.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::Parser;

use lute_eval::Interp;
use lute_util::LuteResult;

/// Command line interface of the `lute` binary.
#[derive(Debug, Parser)]
#[command(name = "lute", version, about = "The Lute scripting language")]
pub struct Cli {
    /// Script to run; starts a REPL when omitted.
    pub script: Option<PathBuf>,

    /// Print the parsed AST as JSON instead of evaluating.
    #[arg(long)]
    pub dump_ast: bool,

    /// Root directory for `std:` imports.
    #[arg(long, env = lute_eval::STD_PATH_ENV)]
    pub std_path: Option<PathBuf>,
}

/// Installs the tracing subscriber, filtered by the `LUTE_LOG` variable.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("LUTE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the CLI; the returned code becomes the process exit code.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut interp = Interp::new();
    if let Some(std_path) = &cli.std_path {
        interp.set_std_path(std_path);
    }
    lute_std::install(&mut interp);

    if cli.dump_ast {
        let Some(script) = &cli.script else {
            bail!("--dump-ast requires a script");
        };
        let source = std::fs::read_to_string(script)
            .with_context(|| format!("could not read file '{}'", script.display()))?;
        let file_name = script.to_string_lossy();
        match dump_ast(&mut interp, &file_name, &source) {
            Ok(json) => {
                println!("{json}");
                return Ok(0);
            }
            Err(e) => {
                eprintln!("{}", e.render());
                return Ok(1);
            }
        }
    }

    match &cli.script {
        Some(script) => {
            tracing::debug!(script = %script.display(), "running script");
            match interp.run_file(script) {
                Ok(_) => Ok(0),
                Err(e) => {
                    eprintln!("{}", e.render());
                    Ok(1)
                }
            }
        }
        None => {
            repl(&mut interp)?;
            Ok(0)
        }
    }
}

fn dump_ast(interp: &mut Interp, file_name: &str, source: &str) -> LuteResult<String> {
    let tokens = lute_lex::tokenize(file_name, source, interp.keywords())?;
    let ast = lute_par::parse(tokens)?;
    Ok(serde_json::to_string_pretty(&ast.to_json()).expect("AST json is always serializable"))
}

/// A minimal line REPL against a persistent context.
fn repl(interp: &mut Interp) -> anyhow::Result<()> {
    println!("lute {} (type ctrl-d to exit)", env!("CARGO_PKG_VERSION"));

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(">>> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match interp.run_source("<repl>", &line) {
            Ok(value) => {
                if !matches!(value, lute_eval::Value::None | lute_eval::Value::Break) {
                    println!("{value}");
                }
            }
            Err(e) => eprintln!("{}", e.render()),
        }
    }
}
