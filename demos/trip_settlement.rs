//! Settling a shared trip in both modes.
//!
//! Shows how the same ledger settles with the fewest payments (simplify)
//! versus one payment per pair that actually shared costs (itemized), and
//! how a direct repayment is credited in itemized mode.

use chrono::Utc;
use expense_settlement::core::expense::Expense;
use expense_settlement::core::ledger::Ledger;
use expense_settlement::core::mode::{GroupSettings, SetSettlementMode, SettlementMode};
use expense_settlement::core::participant::{GroupId, ParticipantId};
use expense_settlement::core::transfer::SettlementTransfer;
use expense_settlement::report::summary::SummaryAssembler;
use expense_settlement::settlement::options::{EngineOptions, TransferAccounting};
use rust_decimal_macros::dec;

fn main() {
    println!("╔═════════════════════════════════════════════╗");
    println!("║  expense-settlement: Trip Settlement Demo   ║");
    println!("╚═════════════════════════════════════════════╝\n");

    let group = GroupId::new("lisbon-2026");
    let ana = ParticipantId::new("ana");
    let bruno = ParticipantId::new("bruno");
    let carla = ParticipantId::new("carla");
    let diego = ParticipantId::new("diego");
    let everyone = [ana.clone(), bruno.clone(), carla.clone(), diego.clone()];

    // --- Scenario 1: A chain of debts ---
    println!("━━━ Scenario 1: A Chain of Debts ━━━\n");

    let chain = Ledger::new(group.clone(), everyone.clone())
        .with_expense(
            Expense::new(group.clone(), ana.clone(), dec!(40))
                .with_title("Taxi")
                .with_split(bruno.clone(), dec!(40)),
        )
        .with_expense(
            Expense::new(group.clone(), bruno.clone(), dec!(40))
                .with_title("Museum")
                .with_split(carla.clone(), dec!(40)),
        )
        .with_expense(
            Expense::new(group.clone(), carla.clone(), dec!(40))
                .with_title("Dinner")
                .with_split(diego.clone(), dec!(40)),
        );

    let assembler = SummaryAssembler::default();
    for mode in [SettlementMode::Itemized, SettlementMode::Simplify] {
        match assembler.assemble(&chain, mode) {
            Ok(summary) => {
                println!("{} mode: {} payment(s)", mode, summary.transfers().len());
                for edge in summary.transfers() {
                    println!("  {}", edge);
                }
                println!();
            }
            Err(e) => eprintln!("  error: {}", e),
        }
    }

    // --- Scenario 2: A full trip with a repayment ---
    println!("━━━ Scenario 2: Full Trip With a Repayment ━━━\n");

    let trip = Ledger::new(group.clone(), everyone.clone())
        .with_expense(
            Expense::split_equally(group.clone(), ana.clone(), dec!(480), &everyone)
                .with_title("Apartment"),
        )
        .with_expense(
            Expense::split_equally(group.clone(), bruno.clone(), dec!(100), &everyone)
                .with_title("Groceries"),
        )
        .with_expense(
            Expense::split_equally(group.clone(), diego.clone(), dec!(75), &[carla.clone(), diego.clone()])
                .with_title("Surf lesson"),
        )
        .with_transfer(
            SettlementTransfer::new(group.clone(), carla.clone(), ana.clone(), dec!(50))
                .with_description("Cash at the airport"),
        );

    let mut settings = GroupSettings::new(group.clone(), "Lisbon 2026", SettlementMode::Itemized);
    let options = EngineOptions::default().with_transfer_accounting(TransferAccounting::BothParties);
    let assembler = SummaryAssembler::new(options);

    match assembler.summarize(&settings, &trip) {
        Ok(summary) => print!("{}", summary),
        Err(e) => eprintln!("  error: {}", e),
    }
    println!();

    // --- Scenario 3: Switching the group to simplify mode ---
    println!("━━━ Scenario 3: Switching Modes ━━━\n");

    let command = SetSettlementMode {
        group_id: group,
        actor: bruno,
        mode: SettlementMode::Simplify,
        expected_version: Some(settings.version),
        requested_at: Utc::now(),
    };
    match settings.apply(&command) {
        Ok(Some(event)) => println!("{}: {}\n", event.name, event.description),
        Ok(None) => println!("Mode unchanged.\n"),
        Err(e) => eprintln!("  error: {}", e),
    }

    match assembler.summarize(&settings, &trip) {
        Ok(summary) => print!("{}", summary),
        Err(e) => eprintln!("  error: {}", e),
    }
}
