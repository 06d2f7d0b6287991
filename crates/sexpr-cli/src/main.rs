/// S-expression rule evaluator CLI

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use sexpr_eval::{EvalOptions, Evaluator, Operators, Value, DEFAULT_MAX_DEPTH};
use tracing_subscriber::EnvFilter;

/// Bindings visible to the `var` operator.
type Bindings = BTreeMap<String, Value>;

#[derive(Parser, Debug)]
#[command(name = "sexpr")]
#[command(about = "Evaluate a JSON-encoded S-expression rule")]
#[command(version)]
struct Args {
    /// Expression as JSON, e.g. '["identity", "result"]'
    #[arg(value_name = "EXPR", conflicts_with = "file")]
    expr: Option<String>,

    /// Read the expression from a file (stdin when neither is given)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Bind a context value, readable with ["var", "NAME"]
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
    bindings: Vec<String>,

    /// Maximum nesting of evaluations and macro expansions
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the allowed operators and exit
    #[arg(long)]
    list_operators: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Evaluation failed: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let bindings = parse_bindings(&args.bindings)?;
    let options = EvalOptions::new().max_depth(args.max_depth);
    let mut evaluator = Evaluator::with_options(bindings, host_operators(), options);

    if args.list_operators {
        for name in evaluator.allowed_operators() {
            println!("{}", name);
        }
        return Ok(());
    }

    let source = read_source(args.expr, args.file.as_ref())?;
    let json: serde_json::Value =
        serde_json::from_str(&source).context("expression is not valid JSON")?;
    let tree = Value::try_from(json)?;

    tracing::info!("Evaluating {}", tree);
    let result = evaluator.evaluate(&tree)?;
    tracing::info!("Result: {}", result);

    println!("{}", serde_json::Value::from(result));
    Ok(())
}

/// Built-in operators plus `var`, which looks a name up in the bindings.
fn host_operators() -> Operators<Bindings> {
    Operators::new().function("var", |bindings: &mut Bindings, args: &[Value]| {
        Ok(args
            .first()
            .and_then(Value::as_str)
            .and_then(|name| bindings.get(name))
            .cloned()
            .unwrap_or(Value::Null))
    })
}

fn read_source(expr: Option<String>, file: Option<&PathBuf>) -> Result<String> {
    if let Some(expr) = expr {
        return Ok(expr);
    }
    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Error reading file '{}'", path.display()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Error reading stdin")?;
    Ok(buffer)
}

/// Parse `NAME=VALUE` pairs. A value that decodes as JSON is taken as such,
/// anything else is a plain string.
fn parse_bindings(raw: &[String]) -> Result<Bindings> {
    let mut bindings = Bindings::new();
    for pair in raw {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("binding '{}' is not of the form NAME=VALUE", pair);
        };
        if name.is_empty() {
            bail!("binding '{}' has an empty name", pair);
        }
        let value = serde_json::from_str::<serde_json::Value>(value)
            .ok()
            .and_then(|json| Value::try_from(json).ok())
            .unwrap_or_else(|| Value::from(value));
        bindings.insert(name.to_string(), value);
    }
    Ok(bindings)
}
