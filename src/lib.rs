//! # expense-settlement
//!
//! Balance computation and debt resolution for shared-expense ledgers.
//!
//! Given a group's expenses (each split among participants) and the direct
//! settlement transfers already made, this engine computes every
//! participant's net balance and recommends who should pay whom.
//!
//! ## Architecture
//!
//! - **core**: Ledger model: participants, expenses and splits, transfers,
//!   validation diagnostics, settlement mode and the mode command
//! - **settlement**: Balance calculator, greedy debt simplifier and the
//!   itemized pairwise consolidator
//! - **report**: Summary assembly over the two settlement modes
//! - **simulation**: Random ledgers for stress tests and benchmarks

pub mod core;
pub mod report;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::debt::DebtEdge;
    pub use crate::core::error::{Diagnostic, LedgerError};
    pub use crate::core::expense::{Expense, Split};
    pub use crate::core::ledger::Ledger;
    pub use crate::core::mode::{GroupSettings, ModeChanged, SetSettlementMode, SettlementMode};
    pub use crate::core::participant::{GroupId, ParticipantId};
    pub use crate::core::transfer::SettlementTransfer;
    pub use crate::report::summary::{Summary, SummaryAssembler};
    pub use crate::settlement::balances::{BalanceCalculator, Balances};
    pub use crate::settlement::itemized::ItemizedConsolidator;
    pub use crate::settlement::options::{
        EngineOptions, ParticipantOrder, SingleSplitPolicy, TransferAccounting,
    };
    pub use crate::settlement::simplify::{DebtSimplifier, SimplifiedDebts};
}
