use crate::core::participant::{GroupId, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Hard faults that abort a computation.
///
/// Data-integrity problems in individual records are not errors; they are
/// reported as [`Diagnostic`]s and the offending record is left out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("decimal overflow while computing {context}")]
    ArithmeticOverflow { context: &'static str },
    #[error("invalid amount '{value}' in {field}: {reason}")]
    InvalidAmount {
        field: String,
        value: String,
        reason: String,
    },
    #[error("malformed ledger document: {0}")]
    Document(String),
    #[error("invalid value '{value}' for option {option}")]
    InvalidOption { option: &'static str, value: String },
    #[error("unknown settlement mode '{0}' (expected 'simplify' or 'itemized')")]
    UnknownMode(String),
    #[error("command targets group {command} but settings belong to {settings}")]
    GroupMismatch { settings: GroupId, command: GroupId },
    #[error("settings for group {group} are at version {actual}, command expected {expected}")]
    VersionConflict {
        group: GroupId,
        expected: u64,
        actual: u64,
    },
}

/// A record the engine refused to aggregate, or a condition the caller
/// should know about alongside a best-effort result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnknownParticipant {
        record: RecordRef,
        participant: ParticipantId,
    },
    NonPositiveAmount { record: RecordRef, amount: Decimal },
    NegativeSplit {
        expense: Uuid,
        participant: ParticipantId,
        amount: Decimal,
    },
    EmptySplits { expense: Uuid },
    ForeignGroup { record: RecordRef, group: GroupId },
    SelfTransfer {
        transfer: Uuid,
        participant: ParticipantId,
    },
    SplitSumMismatch {
        expense: Uuid,
        amount: Decimal,
        split_total: Decimal,
    },
    DuplicateMember { participant: ParticipantId },
    /// Credits and debits did not cancel; `residual` lists what the
    /// simplifier could not pair off (positive = still owed, negative = still owes).
    UnbalancedLedger {
        residual: Vec<(ParticipantId, Decimal)>,
    },
}

impl Diagnostic {
    /// Whether this diagnostic caused a record to be excluded from aggregation.
    pub fn rejects_record(&self) -> bool {
        !matches!(
            self,
            Diagnostic::SplitSumMismatch { .. }
                | Diagnostic::DuplicateMember { .. }
                | Diagnostic::UnbalancedLedger { .. }
        )
    }
}

/// Which kind of record a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RecordRef {
    Expense(Uuid),
    Transfer(Uuid),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Expense(id) => write!(f, "expense {}", id),
            RecordRef::Transfer(id) => write!(f, "transfer {}", id),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownParticipant {
                record,
                participant,
            } => write!(f, "{} references non-member '{}'", record, participant),
            Diagnostic::NonPositiveAmount { record, amount } => {
                write!(f, "{} has non-positive amount {}", record, amount)
            }
            Diagnostic::NegativeSplit {
                expense,
                participant,
                amount,
            } => write!(
                f,
                "expense {} has negative split {} for '{}'",
                expense, amount, participant
            ),
            Diagnostic::EmptySplits { expense } => write!(f, "expense {} has no splits", expense),
            Diagnostic::ForeignGroup { record, group } => {
                write!(f, "{} belongs to group {}", record, group)
            }
            Diagnostic::SelfTransfer {
                transfer,
                participant,
            } => write!(f, "transfer {} goes from '{}' to itself", transfer, participant),
            Diagnostic::SplitSumMismatch {
                expense,
                amount,
                split_total,
            } => write!(
                f,
                "expense {} amount {} differs from split total {}",
                expense, amount, split_total
            ),
            Diagnostic::DuplicateMember { participant } => {
                write!(f, "member '{}' listed more than once", participant)
            }
            Diagnostic::UnbalancedLedger { residual } => {
                write!(f, "ledger is unbalanced; unresolved:")?;
                for (participant, amount) in residual {
                    write!(f, " {}={}", participant, amount)?;
                }
                Ok(())
            }
        }
    }
}
