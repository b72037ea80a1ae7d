//! # mealdesk-cli: Command-Line Front End
//!
//! Prices recorded order requests and inspects the active catalog.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                             │
//! │  2. Initialize tracing (stderr, RUST_LOG)                              │
//! │  3. Load config: defaults → mealdesk.toml → MEALDESK_* → --catalog     │
//! │  4. Install catalog (TOML file, or the built-in tables)                │
//! │  5. Run the command, writing results to stdout                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commands
//! - `mealdesk price <request.json|->` - replay a request, print the line
//! - `mealdesk rules <category> <item>` - list an item's modifier rules
//! - `mealdesk catalog` - print the active catalog as TOML

pub mod config;
pub mod error;
pub mod request;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mealdesk_core::{Catalog, ItemKind, Money, RuleKind};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::request::OrderRequest;

/// mealdesk - order pricing for the ordering screen.
#[derive(Parser, Debug)]
#[command(name = "mealdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: platform config dir, mealdesk.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog TOML file, overriding the config file and environment.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay an order request and print the priced order line.
    Price {
        /// Request JSON file, or `-` for stdin.
        request: String,

        /// Print only the order line JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the modifier rules an item offers.
    Rules {
        /// Category name (e.g. 漢堡).
        category: String,

        /// Item name (e.g. 豬肉漢堡).
        item: String,
    },

    /// Print the active catalog as TOML.
    Catalog,
}

/// Runs the CLI.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = CliConfig::load(cli.config.clone())?;
    if let Some(path) = &cli.catalog {
        config.catalog = Some(path.clone());
    }
    let catalog = install_catalog(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Price { request, json } => {
            let request = read_request(&request)?;
            price(catalog, &config, &request, json, &mut out)
        }
        Command::Rules { category, item } => print_rules(catalog, &category, &item, &mut out),
        Command::Catalog => {
            out.write_all(catalog.to_toml_string()?.as_bytes())?;
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Set via `RUST_LOG`, e.g. `RUST_LOG=mealdesk_core=debug`
/// - Default: info, debug for mealdesk crates
///
/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mealdesk_core=debug,mealdesk_cli=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Installs the configured catalog file, or returns the built-in catalog.
fn install_catalog(config: &CliConfig) -> CliResult<&'static Catalog> {
    match &config.catalog {
        Some(path) => {
            let document = read_file(path)?;
            let catalog = Catalog::install(Catalog::from_toml_str(&document)?)?;
            info!(?path, drinks = catalog.drinks().len(), "Catalog installed");
            Ok(catalog)
        }
        None => Ok(Catalog::global()),
    }
}

fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_request(source: &str) -> CliResult<OrderRequest> {
    let json = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::ReadFailed {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        buf
    } else {
        read_file(Path::new(source))?
    };
    Ok(OrderRequest::from_json(&json)?)
}

// =============================================================================
// Commands
// =============================================================================

/// Prices a request and writes a summary (or bare JSON) to `out`.
pub fn price<W: Write>(
    catalog: &Catalog,
    config: &CliConfig,
    request: &OrderRequest,
    json_only: bool,
    out: &mut W,
) -> CliResult<()> {
    let replay = request.replay(catalog);
    for tap in &replay.ignored {
        warn!(tap = %tap, "Ignored by this item");
    }

    let breakdown = replay.session.breakdown();
    let line = replay.session.submit()?;
    let json = serde_json::to_string_pretty(&line)?;

    if json_only {
        writeln!(out, "{}", json)?;
        return Ok(());
    }

    let fmt = |amount: Money| config.format_currency(amount);
    writeln!(out, "{}", config.store_name)?;
    writeln!(out, "{} × {}", line.item_name, line.quantity)?;
    writeln!(out, "  base            {:>8}", fmt(breakdown.base))?;
    for option in &line.options {
        writeln!(out, "  {:<16}{:>8}", option.label, fmt(option.price))?;
    }
    writeln!(out, "  unit price      {:>8}", fmt(line.unit_price))?;
    writeln!(out, "  subtotal        {:>8}", fmt(line.subtotal))?;
    writeln!(out)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Lists an item's rules with their options and prices.
pub fn print_rules<W: Write>(
    catalog: &Catalog,
    category: &str,
    item: &str,
    out: &mut W,
) -> CliResult<()> {
    let kind = ItemKind::classify(category, item);
    writeln!(out, "{} [{}] → {:?}", item, catalog.category_key(category), kind)?;

    let rules = if kind.shows_generic_rules() {
        catalog.rules_for(category, item)
    } else {
        Vec::new()
    };
    if rules.is_empty() {
        writeln!(out, "  (no modifier rules)")?;
    }
    for rule in rules {
        let kind = match rule.kind {
            RuleKind::Choice => "choice",
            RuleKind::Toggle => "toggle",
        };
        writeln!(out, "  {} ({}, {})", rule.label, rule.key, kind)?;
        for option in &rule.options {
            writeln!(out, "    {:<12}{:+}", option.label, option.price.units())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> CliResult<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cli_parses_price_command() {
        let cli = Cli::parse_from(["mealdesk", "price", "-", "--json", "--catalog", "menu.toml"]);
        assert_eq!(cli.catalog, Some(PathBuf::from("menu.toml")));
        assert!(matches!(
            cli.command,
            Command::Price { ref request, json: true } if request == "-"
        ));
    }

    #[test]
    fn test_price_summary() {
        let catalog = Catalog::builtin();
        let config = CliConfig::default();
        let request = OrderRequest::from_json(
            r#"{
                "item": { "id": "p-12", "name": "豬肉漢堡", "category": "漢堡", "base_price": 50 },
                "options": [ { "key": "egg", "label": "加蛋" }, { "key": "meat", "label": "加培根" } ],
                "quantity": 3
            }"#,
        )
        .unwrap();

        let text = render(|out| price(&catalog, &config, &request, false, out));
        assert!(text.starts_with("mealdesk\n豬肉漢堡 × 3\n"));
        assert!(text.contains("$270"));
        assert!(text.contains("\"item_name\": \"豬肉漢堡\""));
    }

    #[test]
    fn test_price_json_only() {
        let catalog = Catalog::builtin();
        let config = CliConfig::default();
        let request = OrderRequest::from_json(
            r#"{ "item": { "id": "d-1", "name": "紅茶", "category": "飲料", "base_price": 15 }, "size": "L" }"#,
        )
        .unwrap();

        let text = render(|out| price(&catalog, &config, &request, true, out));
        let line: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(line["subtotal"], 25);
        assert_eq!(line["options"][0]["id"], "spec");
    }

    #[test]
    fn test_price_rejects_long_note() {
        let catalog = Catalog::builtin();
        let config = CliConfig::default();
        let mut request = OrderRequest::from_json(
            r#"{ "item": { "id": "p-1", "name": "薯餅", "category": "美味小點", "base_price": 25 } }"#,
        )
        .unwrap();
        request.note = Some("辣".repeat(mealdesk_core::MAX_NOTE_LENGTH + 1));

        let mut buf = Vec::new();
        let result = price(&catalog, &config, &request, true, &mut buf);
        assert!(matches!(result, Err(CliError::Core(_))));
    }

    #[test]
    fn test_print_rules() {
        let catalog = Catalog::builtin();
        let text = render(|out| print_rules(&catalog, "漢堡", "豬肉漢堡", out));
        assert!(text.starts_with("豬肉漢堡 [burger] → Standard\n"));
        assert!(text.contains("  麵包體 (bread, choice)\n"));
        assert!(text.contains(&format!("    {:<12}{:+}\n", "不加蛋", -5)));

        let text = render(|out| print_rules(&catalog, "飲料", "紅茶", out));
        assert!(text.contains("(no modifier rules)"));
    }
}
