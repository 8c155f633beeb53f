use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

use scout_terminal::catalog::AttributeCatalog;
use scout_terminal::config::ScoutConfig;
use scout_terminal::console_log::ConsoleLogger;
use scout_terminal::dataset::load_working_table;
use scout_terminal::export::{export_csv, export_xlsx};
use scout_terminal::filter::{AgeRange, AttributeRanges, IdentificationCriteria, TextMatch, search};
use scout_terminal::ranking::rank_with;
use scout_terminal::session::ScoutSession;
use scout_terminal::table::{WorkingTable, position_label};

const USAGE: &str = "usage:
  scout_cli search [--data P] [--age LO-HI] [--nationality N]... [--position P]... [--club C]...
                   [--range COL=LO:HI]... [--token-match] [--page N (1-based)] [--out FILE.csv|FILE.xlsx]
  scout_cli rank --attr COL [--data P] [--min-minutes M] [--top N] [--json]
  scout_cli catalog [--data P]";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first().cloned() else {
        bail!("{USAGE}");
    };
    let rest = &args[1..];

    let mut cfg = ScoutConfig::from_env();
    if let Some(path) = arg_value(rest, "--data") {
        cfg.data_path = PathBuf::from(path);
        cfg.demo = false;
    }
    ConsoleLogger::stderr(cfg.log_level).install();

    let loaded = load_working_table(&cfg);
    if let Some(diag) = loaded.diagnostic {
        return Err(anyhow!(diag));
    }
    let table = loaded.table;

    match command.as_str() {
        "search" => run_search(&table, rest),
        "rank" => run_rank(&table, &cfg, rest),
        "catalog" => {
            run_catalog(&table);
            Ok(())
        }
        other => Err(anyhow!("unknown command {other:?}\n{USAGE}")),
    }
}

fn run_search(table: &WorkingTable, args: &[String]) -> Result<()> {
    let catalog = AttributeCatalog::build(table);

    let age = arg_value(args, "--age")
        .map(|raw| parse_age(&raw))
        .transpose()?;
    let identification = IdentificationCriteria {
        age,
        nationalities: arg_values(args, "--nationality"),
        positions: arg_values(args, "--position"),
        clubs: arg_values(args, "--club").into_iter().collect(),
        text_match: if has_flag(args, "--token-match") {
            TextMatch::Token
        } else {
            TextMatch::Substring
        },
    };

    let mut ranges = AttributeRanges::unrestricted(&catalog);
    for raw in arg_values(args, "--range") {
        let (column, lo, hi) = parse_range(&raw)?;
        ranges.set(&column, lo, hi)?;
    }

    let results = search(table, &identification, &ranges)?;
    let mut session = ScoutSession::new();
    session.apply_search(results);
    if let Some(raw) = arg_value(args, "--page") {
        for _ in 0..parse_page(&raw)? {
            session.next_page();
        }
    }

    println!("{}", session.status_line());
    for row in session.current_page().rows {
        let Some(p) = table.row(*row) else {
            continue;
        };
        println!(
            "{:<26} {:<20} {:>3}  {:<11} {}",
            p.name,
            p.team,
            p.age,
            position_label(p.general_position),
            p.nationality
        );
    }

    if let Some(out) = arg_value(args, "--out")
        && let Some(results) = &session.results
    {
        let path = PathBuf::from(out);
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("xlsx")) {
            export_xlsx(&path, table, results)?;
        } else {
            let bytes = export_csv(table, results)?;
            fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        }
        println!("Exported {} players to {}", results.len(), path.display());
    }
    Ok(())
}

fn run_rank(table: &WorkingTable, cfg: &ScoutConfig, args: &[String]) -> Result<()> {
    let attribute = arg_value(args, "--attr").unwrap_or_else(|| cfg.default_attribute.clone());
    let min_minutes = match arg_value(args, "--min-minutes") {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("invalid --min-minutes {raw:?}"))?,
        None => cfg.min_minutes,
    };
    let top_n = match arg_value(args, "--top") {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid --top {raw:?}"))?,
        None => cfg.top_n,
    };

    let ranking = rank_with(table, &attribute, min_minutes, top_n, &cfg.rank_options())?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }

    println!(
        "Top {} by {} (min {:.0} minutes, {} eligible)",
        ranking.top.len(),
        ranking.attribute,
        ranking.min_minutes,
        ranking.eligible
    );
    for (pos, p) in ranking.top.iter().enumerate() {
        println!(
            "{:>2}. {:<26} {:<20} {:>3}  {:<24} {}",
            pos + 1,
            p.player,
            p.team,
            p.age,
            p.position,
            p.value
        );
    }
    println!();
    println!(
        "{:<12} {:>5} {:>9} {:>9} {:>9} {:>9}",
        "position", "n", "mean", "median", "min", "max"
    );
    for stats in &ranking.position_stats {
        println!(
            "{:<12} {:>5} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
            position_label(stats.position),
            stats.count,
            stats.mean,
            stats.median,
            stats.min,
            stats.max
        );
    }
    Ok(())
}

fn run_catalog(table: &WorkingTable) {
    let catalog = AttributeCatalog::build(table);
    println!("{} players, {} attributes", table.len(), catalog.len());
    for group in catalog.categories() {
        if group.attributes.is_empty() {
            continue;
        }
        println!("{}", group.name);
        for attr in &group.attributes {
            println!("  {:<40} {:<32} max {}", attr.column, attr.label, attr.max);
        }
    }
}

fn parse_age(raw: &str) -> Result<AgeRange> {
    let (lo, hi) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("--age expects LO-HI, got {raw:?}"))?;
    let lo: u32 = lo.trim().parse().with_context(|| format!("invalid age {lo:?}"))?;
    let hi: u32 = hi.trim().parse().with_context(|| format!("invalid age {hi:?}"))?;
    Ok(AgeRange::new(lo, hi))
}

/// `--page` counts from 1; returns the 0-based page index.
fn parse_page(raw: &str) -> Result<usize> {
    let page: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid --page {raw:?}"))?;
    if page == 0 {
        bail!("--page counts from 1, got 0");
    }
    Ok(page - 1)
}

fn parse_range(raw: &str) -> Result<(String, f64, f64)> {
    let (column, bounds) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("--range expects COL=LO:HI, got {raw:?}"))?;
    let (lo, hi) = bounds
        .split_once(':')
        .ok_or_else(|| anyhow!("--range expects COL=LO:HI, got {raw:?}"))?;
    let lo: f64 = lo.trim().parse().with_context(|| format!("invalid bound {lo:?}"))?;
    let hi: f64 = hi.trim().parse().with_context(|| format!("invalid bound {hi:?}"))?;
    Ok((column.trim().to_string(), lo, hi))
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    arg_values(args, name).into_iter().last()
}

/// Every value of a repeatable `--name value` / `--name=value` flag.
fn arg_values(args: &[String], name: &str) -> Vec<String> {
    let prefix = format!("{name}=");
    let mut out = Vec::new();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            out.push(next.trim().to_string());
        }
    }
    out
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}
