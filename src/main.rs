use anyhow::{Context, Result};
use balance_calc::calculator::{Engine, evaluate, format_display, format_number};
use balance_calc::config::Config;
use balance_calc::keys::parse_keys;
use balance_calc::view::CalculatorView;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Calculator bound to an account balance.
///
/// Keys are separated by whitespace: digits, `.`, `+ - * / %`, `()`, `=`,
/// `C`, and percentages of the balance such as `50%`.
#[derive(Parser, Debug)]
#[command(name = "balance-calc", version, about)]
struct Cli {
    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Balance used by percentage keys (overrides the config file)
    #[arg(long)]
    balance: Option<f64>,

    /// Print each state as JSON
    #[arg(long)]
    json: bool,

    /// Evaluate a full expression and exit
    #[arg(long, value_name = "EXPR", conflicts_with = "keys")]
    eval: Option<String>,

    /// Keys to press; reads lines from stdin when empty
    keys: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(balance) = cli.balance {
        config.balance = balance;
    }

    if let Some(expr) = &cli.eval {
        let value = evaluate(expr).with_context(|| format!("Failed to evaluate {expr:?}"))?;
        println!("{}", format_display(&format_number(value), &config.locale));
        return Ok(());
    }

    let mut engine = Engine::with_context(config.engine_context());
    let mut out = io::stdout().lock();

    if !cli.keys.is_empty() {
        let events = parse_keys(&cli.keys.join(" "))?;
        engine.handle_all(events);
        return render(&mut out, &engine, &config, cli.json);
    }

    render(&mut out, &engine, &config, cli.json)?;
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match parse_keys(&line) {
            Ok(events) => {
                engine.handle_all(events);
                render(&mut out, &engine, &config, cli.json)?;
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match Config::default_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))
}

fn render(out: &mut impl Write, engine: &Engine, config: &Config, json: bool) -> Result<()> {
    let view = CalculatorView::from_engine(engine, &config.locale);

    if json {
        let state = serde_json::json!({ "view": view, "state": engine.state() });
        writeln!(out, "{}", serde_json::to_string(&state)?)?;
    } else {
        writeln!(out, "{}", view.formula)?;
        writeln!(out, "{}", view.display)?;
    }

    Ok(())
}
