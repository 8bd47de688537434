//! Random ledger generation for stress tests and benchmarks.
//!
//! Generated ledgers are well formed: every expense is split exactly to the
//! cent among a random subset of members that always includes at least one
//! participant, and every transfer goes between two distinct members.

use crate::core::expense::Expense;
use crate::core::ledger::Ledger;
use crate::core::participant::{GroupId, ParticipantId};
use crate::core::transfer::SettlementTransfer;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub group_id: GroupId,
    pub participant_count: usize,
    pub expense_count: usize,
    pub transfer_count: usize,
    /// Smallest expense / transfer, in cents.
    pub min_cents: i64,
    /// Largest expense / transfer, in cents.
    pub max_cents: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            group_id: GroupId::new("simulated"),
            participant_count: 5,
            expense_count: 20,
            transfer_count: 3,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate a random ledger using the thread-local RNG.
pub fn generate_random_ledger(config: &LedgerConfig) -> Ledger {
    generate_with_rng(config, &mut rand::thread_rng())
}

/// Generate a random ledger from a caller-supplied RNG (seed it for determinism).
pub fn generate_with_rng<R: Rng>(config: &LedgerConfig, rng: &mut R) -> Ledger {
    let members: Vec<ParticipantId> = (0..config.participant_count)
        .map(|i| ParticipantId::new(format!("P-{:03}", i)))
        .collect();
    let mut ledger = Ledger::new(config.group_id.clone(), members.clone());

    if members.is_empty() {
        return ledger;
    }

    let low = config.min_cents.max(1);
    let high = config.max_cents.max(low);

    for _ in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].clone();
        let amount = Decimal::new(rng.gen_range(low..=high), 2);

        let share_count = rng.gen_range(1..=members.len());
        let mut sharers: Vec<ParticipantId> = members
            .choose_multiple(rng, share_count)
            .cloned()
            .collect();
        sharers.sort();

        ledger.add_expense(Expense::split_equally(
            config.group_id.clone(),
            payer,
            amount,
            &sharers,
        ));
    }

    if members.len() > 1 {
        for _ in 0..config.transfer_count {
            let from_idx = rng.gen_range(0..members.len());
            let mut to_idx = rng.gen_range(0..members.len());
            while to_idx == from_idx {
                to_idx = rng.gen_range(0..members.len());
            }
            let amount = Decimal::new(rng.gen_range(low..=high), 2);
            ledger.add_transfer(SettlementTransfer::new(
                config.group_id.clone(),
                members[from_idx].clone(),
                members[to_idx].clone(),
                amount,
            ));
        }
    }

    ledger
}
