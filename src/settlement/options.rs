//! Engine configuration.
//!
//! Each knob is a named enum with its product default pinned in a constant,
//! so that callers choosing a behaviour do so explicitly.

use crate::core::error::LedgerError;
use crate::core::expense::Expense;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether an expense carried entirely by one participant counts toward
/// balances and itemized debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleSplitPolicy {
    Include,
    /// Skip expenses with exactly one split, on both the paid and owed side.
    Exclude,
}

impl SingleSplitPolicy {
    pub fn admits(&self, expense: &Expense) -> bool {
        match self {
            SingleSplitPolicy::Include => true,
            SingleSplitPolicy::Exclude => !expense.is_single_split(),
        }
    }
}

/// How settlement transfers enter a participant's net balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferAccounting {
    /// `net = paid - owed + transferred_out`.
    SenderOnly,
    /// `net = paid - owed + transferred_out - transferred_in`; balances
    /// sum to zero even when transfers are present.
    BothParties,
}

/// Order in which participants enter the simplifier's queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantOrder {
    /// The order of the group's member list.
    Membership,
    /// Ascending participant id.
    ParticipantId,
}

pub const DEFAULT_SINGLE_SPLIT_POLICY: SingleSplitPolicy = SingleSplitPolicy::Include;
pub const DEFAULT_TRANSFER_ACCOUNTING: TransferAccounting = TransferAccounting::SenderOnly;
pub const DEFAULT_PARTICIPANT_ORDER: ParticipantOrder = ParticipantOrder::Membership;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub single_split: SingleSplitPolicy,
    pub transfer_accounting: TransferAccounting,
    pub ordering: ParticipantOrder,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            single_split: DEFAULT_SINGLE_SPLIT_POLICY,
            transfer_accounting: DEFAULT_TRANSFER_ACCOUNTING,
            ordering: DEFAULT_PARTICIPANT_ORDER,
        }
    }
}

impl EngineOptions {
    pub fn with_single_split(mut self, policy: SingleSplitPolicy) -> Self {
        self.single_split = policy;
        self
    }

    pub fn with_transfer_accounting(mut self, accounting: TransferAccounting) -> Self {
        self.transfer_accounting = accounting;
        self
    }

    pub fn with_ordering(mut self, ordering: ParticipantOrder) -> Self {
        self.ordering = ordering;
        self
    }
}

impl FromStr for SingleSplitPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(SingleSplitPolicy::Include),
            "exclude" => Ok(SingleSplitPolicy::Exclude),
            _ => Err(LedgerError::InvalidOption {
                option: "single-split",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for TransferAccounting {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sender" | "sender-only" => Ok(TransferAccounting::SenderOnly),
            "both" | "both-parties" => Ok(TransferAccounting::BothParties),
            _ => Err(LedgerError::InvalidOption {
                option: "transfers",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ParticipantOrder {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "membership" | "members" => Ok(ParticipantOrder::Membership),
            "id" | "participant-id" => Ok(ParticipantOrder::ParticipantId),
            _ => Err(LedgerError::InvalidOption {
                option: "order",
                value: s.to_string(),
            }),
        }
    }
}
