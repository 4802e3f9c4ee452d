use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use colored::Colorize;
use serde_json::{json, Value};
use tally_sdk::{
    CookieHeaderSource, CookieWrite, DomainFingerprint, SdkConfig, SetCookieSink, Tally, Tracker,
};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Fingerprint(args) => cmd_fingerprint(args, &cli.format),
        Command::Inspect(args) => cmd_inspect(args, &cli),
        Command::Get(args) => cmd_get(args, &cli),
        Command::Set(args) => cmd_set(args, &cli),
        Command::Clear(args) => cmd_clear(args, &cli),
    }
}

/// A tracker over the `--cookie` header, with writes captured as
/// `Set-Cookie` lines.
struct Session {
    tracker: Tracker,
    sink: Arc<SetCookieSink>,
}

impl Session {
    fn open(cli: &Cli) -> anyhow::Result<Self> {
        let config = load_config(cli)?;
        let source = Arc::new(CookieHeaderSource::parse(&cli.cookie));
        let sink = Arc::new(SetCookieSink::new());
        let tally = Tally::new(config, source, sink.clone());
        let tracker = tally.create_tracker()?;
        debug!(pending = ?tracker.state().pending_stores(), "session opened");
        Ok(Self { tracker, sink })
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<SdkConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {path}"))?;
            SdkConfig::from_toml_str(&text).with_context(|| format!("invalid config file {path}"))?
        }
        None => SdkConfig::default(),
    };
    if let Some(domain) = &cli.domain {
        config = config.with_cookie_domain(domain.clone());
    }
    if let Some(prefix) = &cli.prefix {
        config = config.with_cookie_prefix(prefix.clone());
    }
    if cli.session_only {
        config.cookie_persistence = false;
    }
    Ok(config)
}

fn cmd_fingerprint(args: &FingerprintArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let fingerprint = DomainFingerprint::of(&args.domain);
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "domain": args.domain, "cdh": fingerprint.as_str() })
        ),
        OutputFormat::Text => println!("{} {}", fingerprint.as_str().yellow().bold(), args.domain),
    }
    Ok(())
}

fn cmd_inspect(args: &InspectArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut session = Session::open(cli)?;
    let state = session.tracker.state_mut();
    let stores: Vec<String> = state
        .pending_stores()
        .into_iter()
        .filter(|name| args.all || state.registry().contains(name))
        .map(str::to_string)
        .collect();

    let mut report = serde_json::Map::new();
    for store in &stores {
        let value = state.get(store).cloned().map(|v| v.into_value());
        report.insert(store.clone(), value.unwrap_or(Value::Null));
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Domain fingerprint: {}", state.domain_fingerprint().as_str().yellow());
            if report.is_empty() {
                println!("No stores found.");
            }
            for (store, value) in &report {
                match value {
                    Value::Null => println!("  {} {}", store.bold(), "(no matching candidate)".dimmed()),
                    other => println!("  {} {}", store.bold(), other),
                }
            }
        }
    }
    Ok(())
}

fn cmd_get(args: &GetArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut session = Session::open(cli)?;
    let state = session.tracker.state_mut();
    let value = match &args.field {
        Some(field) => state.get_field(&args.store, field).cloned(),
        None => state.get(&args.store).cloned().map(|v| v.into_value()),
    };
    let label = match &args.field {
        Some(field) => format!("{}.{}", args.store, field),
        None => args.store.clone(),
    };
    match cli.format {
        OutputFormat::Json => println!("{}", json!({ "key": label, "value": value })),
        OutputFormat::Text => match value {
            Some(value) => println!("{} = {}", label.bold(), value),
            None => println!("{} = {}", label.bold(), "(not set)".dimmed()),
        },
    }
    Ok(())
}

fn cmd_set(args: &SetArgs, cli: &Cli) -> anyhow::Result<()> {
    let value: Value = if args.json {
        serde_json::from_str(&args.value)
            .with_context(|| format!("value is not valid JSON: {}", args.value))?
    } else {
        Value::String(args.value.clone())
    };
    let mut session = Session::open(cli)?;
    session.tracker.state_mut().set(&args.store, &args.field, value);
    print_headers(&session, &cli.format)
}

fn cmd_clear(args: &ClearArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut session = Session::open(cli)?;
    let state = session.tracker.state_mut();
    match &args.field {
        Some(field) => state.clear_field(&args.store, field),
        None => state.clear(&args.store),
    }
    print_headers(&session, &cli.format)
}

fn print_headers(session: &Session, format: &OutputFormat) -> anyhow::Result<()> {
    let writes = session.sink.writes();
    match format {
        OutputFormat::Json => {
            let report: Vec<Value> = writes.iter().map(write_report).collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if writes.is_empty() {
                println!("{}", "No cookies written.".dimmed());
            }
            for write in &writes {
                let marker = if write.is_delete() { " (delete)" } else { "" };
                println!("{} {}{}", "Set-Cookie:".green(), write.to_set_cookie(), marker.dimmed());
            }
        }
    }
    Ok(())
}

/// JSON view of one write. `expires` is a Unix timestamp, `0` for session
/// cookies.
fn write_report(write: &CookieWrite) -> Value {
    json!({
        "name": write.name,
        "value": write.value,
        "expires": write.expiry.unix_timestamp(),
        "expired": write.expiry.is_past(Utc::now()),
        "delete": write.is_delete(),
        "header": write.to_set_cookie(),
    })
}
