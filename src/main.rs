//! expense-settlement CLI
//!
//! Settle a shared-expense ledger from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Report balances and recommended transfers
//! expense-settlement summary --input ledger.json
//!
//! # Output as JSON, forcing simplify mode for this report only
//! expense-settlement summary --input ledger.json --mode simplify --format json
//!
//! # Persist a settlement mode change and print the activity payload
//! expense-settlement set-mode --input ledger.json --mode simplify --actor alice
//!
//! # Generate a random ledger for testing
//! expense-settlement generate --participants 6 --expenses 40
//! ```

use chrono::Utc;
use expense_settlement::core::document::LedgerDocument;
use expense_settlement::core::error::LedgerError;
use expense_settlement::core::mode::{GroupSettings, SetSettlementMode, SettlementMode};
use expense_settlement::core::participant::{GroupId, ParticipantId};
use expense_settlement::report::summary::SummaryAssembler;
use expense_settlement::settlement::options::EngineOptions;
use expense_settlement::simulation::random_ledger::{generate_random_ledger, LedgerConfig};
use log::{error, info};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"expense-settlement: balances and debt resolution for shared expenses

USAGE:
    expense-settlement <COMMAND> [OPTIONS]

COMMANDS:
    summary     Compute balances and recommended transfers for a ledger
    set-mode    Change a group's settlement mode (simplify | itemized)
    generate    Generate a random ledger document (for testing)
    help        Show this message

OPTIONS (summary):
    --input <FILE>              Path to JSON ledger document
    --format <FORMAT>           Output format: text (default) or json
    --mode <MODE>               Use this mode for the report instead of the stored one
    --single-split <POLICY>     include (default) or exclude single-split expenses
    --transfers <ACCOUNTING>    sender (default) or both
    --order <ORDER>             membership (default) or id

OPTIONS (set-mode):
    --input <FILE>              Path to JSON ledger document
    --mode <MODE>               Requested mode
    --actor <ID>                Participant requesting the change
    --expect-version <N>        Reject the change unless the stored version is N
    --output <FILE>             Write the updated document here instead of --input

OPTIONS (generate):
    --participants <N>          Number of participants (default: 5)
    --expenses <N>              Number of expenses (default: 20)
    --transfers <N>             Number of settlement transfers (default: 3)
    --group <ID>                Group id (default: simulated)
    --output <FILE>             Write to file instead of stdout

EXAMPLES:
    expense-settlement summary --input trip.json --format json
    expense-settlement set-mode --input trip.json --mode itemized --actor bob
    expense-settlement generate --participants 8 --expenses 100 --output big.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    error!("{}", message);
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn or_fail<T>(result: Result<T, LedgerError>) -> T {
    result.unwrap_or_else(|e| fail(e))
}

/// Collect `--flag value` pairs, rejecting flags not in `allowed`.
fn parse_flags<'a>(args: &'a [String], allowed: &[&str]) -> Vec<(&'a str, &'a str)> {
    let mut flags = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !allowed.contains(&flag) {
            eprintln!("Unknown option: {}", flag);
            process::exit(1);
        }
        i += 1;
        let value = args
            .get(i)
            .map(String::as_str)
            .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
        flags.push((flag, value));
        i += 1;
    }
    flags
}

fn load_document(path: &str) -> LedgerDocument {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e)));
    or_fail(LedgerDocument::from_json(&content))
}

fn cmd_summary(args: &[String]) {
    let flags = parse_flags(
        args,
        &[
            "--input",
            "--format",
            "--mode",
            "--single-split",
            "--transfers",
            "--order",
        ],
    );

    let mut input_path = None;
    let mut format = "text";
    let mut mode_override: Option<SettlementMode> = None;
    let mut options = EngineOptions::default();
    for (flag, value) in flags {
        match flag {
            "--input" => input_path = Some(value),
            "--format" => format = value,
            "--mode" => mode_override = Some(or_fail(value.parse())),
            "--single-split" => options.single_split = or_fail(value.parse()),
            "--transfers" => options.transfer_accounting = or_fail(value.parse()),
            "--order" => options.ordering = or_fail(value.parse()),
            _ => unreachable!("filtered by parse_flags"),
        }
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let (settings, ledger) = or_fail(load_document(path).into_parts());
    let mode = mode_override.unwrap_or(settings.mode);

    let summary = or_fail(SummaryAssembler::new(options).assemble(&ledger, mode));

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|e| fail(format!("cannot serialize summary: {}", e)));
            println!("{}", json);
        }
        "text" => print!("{}", summary),
        other => fail(format!("--format must be 'text' or 'json', got '{}'", other)),
    }
}

fn cmd_set_mode(args: &[String]) {
    let flags = parse_flags(
        args,
        &["--input", "--mode", "--actor", "--expect-version", "--output"],
    );

    let mut input_path = None;
    let mut mode = None;
    let mut actor = None;
    let mut expected_version = None;
    let mut output_path = None;
    for (flag, value) in flags {
        match flag {
            "--input" => input_path = Some(value),
            "--mode" => mode = Some(or_fail(value.parse::<SettlementMode>())),
            "--actor" => actor = Some(ParticipantId::new(value)),
            "--expect-version" => {
                expected_version = Some(value.parse::<u64>().unwrap_or_else(|_| {
                    fail(format!("--expect-version requires a number, got '{}'", value))
                }))
            }
            "--output" => output_path = Some(value),
            _ => unreachable!("filtered by parse_flags"),
        }
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let mode = mode.unwrap_or_else(|| fail("--mode <MODE> is required"));
    let actor = actor.unwrap_or_else(|| fail("--actor <ID> is required"));

    let (mut settings, ledger) = or_fail(load_document(path).into_parts());
    let command = SetSettlementMode {
        group_id: settings.group_id.clone(),
        actor,
        mode,
        expected_version,
        requested_at: Utc::now(),
    };

    match or_fail(settings.apply(&command)) {
        Some(event) => {
            let json = serde_json::to_string_pretty(&event)
                .unwrap_or_else(|e| fail(format!("cannot serialize event: {}", e)));
            println!("{}", json);

            let target = output_path.unwrap_or(path);
            let document = LedgerDocument::from_parts(&settings, &ledger);
            fs::write(target, or_fail(document.to_json_pretty()))
                .unwrap_or_else(|e| fail(format!("cannot write '{}': {}", target, e)));
            info!("wrote {} (version {})", target, settings.version);
        }
        None => eprintln!("Group {} is already in {} mode.", settings.group_id, mode),
    }
}

fn cmd_generate(args: &[String]) {
    let flags = parse_flags(
        args,
        &["--participants", "--expenses", "--transfers", "--group", "--output"],
    );

    let mut config = LedgerConfig::default();
    let mut output_path = None;
    let count = |flag: &str, value: &str| -> usize {
        value
            .parse()
            .unwrap_or_else(|_| fail(format!("{} requires a number, got '{}'", flag, value)))
    };
    for (flag, value) in flags {
        match flag {
            "--participants" => config.participant_count = count(flag, value),
            "--expenses" => config.expense_count = count(flag, value),
            "--transfers" => config.transfer_count = count(flag, value),
            "--group" => config.group_id = GroupId::new(value),
            "--output" => output_path = Some(value),
            _ => unreachable!("filtered by parse_flags"),
        }
    }

    let ledger = generate_random_ledger(&config);
    let settings = GroupSettings::new(
        config.group_id.clone(),
        "Simulated group",
        SettlementMode::Itemized,
    );
    let json = or_fail(LedgerDocument::from_parts(&settings, &ledger).to_json_pretty());

    if let Some(path) = output_path {
        fs::write(path, &json).unwrap_or_else(|e| fail(format!("cannot write '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses and {} transfers across {} participants → {}",
            ledger.expenses().len(),
            ledger.transfers().len(),
            ledger.members().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "summary" => cmd_summary(rest),
        "set-mode" => cmd_set_mode(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
