//! JSON ledger document: the exchange format the command line reads and writes.
//!
//! Amounts travel as strings and are parsed exactly; a malformed amount fails
//! the whole load with [`LedgerError::InvalidAmount`] naming the field.
//!
//! ```json
//! {
//!   "group": { "id": "goa", "name": "Goa Trip", "mode": "itemized" },
//!   "members": ["alice", "bob"],
//!   "expenses": [
//!     { "title": "Dinner", "payer": "alice", "amount": "100",
//!       "splits": [ { "participant": "alice", "amount": "50" },
//!                   { "participant": "bob", "amount": "50" } ] }
//!   ],
//!   "transfers": [ { "from": "bob", "to": "alice", "amount": "30" } ]
//! }
//! ```

use crate::core::amount;
use crate::core::error::LedgerError;
use crate::core::expense::Expense;
use crate::core::ledger::Ledger;
use crate::core::mode::{GroupSettings, SettlementMode};
use crate::core::participant::{GroupId, ParticipantId};
use crate::core::transfer::SettlementTransfer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub group: GroupRecord,
    pub members: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub transfers: Vec<TransferRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub version: u64,
}

fn default_mode() -> String {
    SettlementMode::Itemized.as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub payer: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub splits: Vec<SplitRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRecord {
    pub participant: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub from: String,
    pub to: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LedgerDocument {
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(json).map_err(|e| LedgerError::Document(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(self).map_err(|e| LedgerError::Document(e.to_string()))
    }

    /// Convert into engine types. Records without an id get a fresh one;
    /// transfers without a timestamp are stamped now.
    pub fn into_parts(self) -> Result<(GroupSettings, Ledger), LedgerError> {
        let group_id = GroupId::new(self.group.id);
        let mode: SettlementMode = self.group.mode.parse()?;
        let settings = GroupSettings {
            group_id: group_id.clone(),
            name: self.group.name,
            mode,
            version: self.group.version,
        };

        let mut ledger = Ledger::new(
            group_id.clone(),
            self.members.into_iter().map(ParticipantId::new),
        );

        for (i, record) in self.expenses.into_iter().enumerate() {
            let total = amount::parse(format!("expenses[{}].amount", i), &record.amount)?;
            let mut shares = Vec::with_capacity(record.splits.len());
            for (j, split) in record.splits.iter().enumerate() {
                let share = amount::parse(
                    format!("expenses[{}].splits[{}].amount", i, j),
                    &split.amount,
                )?;
                shares.push((ParticipantId::new(split.participant.as_str()), share));
            }

            let mut expense = Expense::with_id(
                record.id.unwrap_or_else(Uuid::new_v4),
                group_id.clone(),
                ParticipantId::new(record.payer),
                total,
            )
            .with_title(record.title)
            .with_splits(shares);
            if let Some(notes) = record.notes {
                expense = expense.with_notes(notes);
            }
            if let Some(date) = record.expense_date {
                expense = expense.with_expense_date(date);
            }
            ledger.add_expense(expense);
        }

        for (i, record) in self.transfers.into_iter().enumerate() {
            let value = amount::parse(format!("transfers[{}].amount", i), &record.amount)?;
            let mut transfer = SettlementTransfer::with_id(
                record.id.unwrap_or_else(Uuid::new_v4),
                group_id.clone(),
                ParticipantId::new(record.from),
                ParticipantId::new(record.to),
                value,
                record.timestamp.unwrap_or_else(Utc::now),
            );
            if let Some(description) = record.description {
                transfer = transfer.with_description(description);
            }
            ledger.add_transfer(transfer);
        }

        Ok((settings, ledger))
    }

    /// Build a document from engine types, e.g. to persist a mode change.
    pub fn from_parts(settings: &GroupSettings, ledger: &Ledger) -> Self {
        Self {
            group: GroupRecord {
                id: settings.group_id.to_string(),
                name: settings.name.clone(),
                mode: settings.mode.as_str().to_string(),
                version: settings.version,
            },
            members: ledger.members().iter().map(|m| m.to_string()).collect(),
            expenses: ledger
                .expenses()
                .iter()
                .map(|e| ExpenseRecord {
                    id: Some(e.id()),
                    title: e.title().to_string(),
                    payer: e.payer().to_string(),
                    amount: e.amount().to_string(),
                    expense_date: e.expense_date(),
                    notes: e.notes().map(str::to_string),
                    splits: e
                        .splits()
                        .iter()
                        .map(|s| SplitRecord {
                            participant: s.participant.to_string(),
                            amount: s.amount.to_string(),
                        })
                        .collect(),
                })
                .collect(),
            transfers: ledger
                .transfers()
                .iter()
                .map(|t| TransferRecord {
                    id: Some(t.id()),
                    from: t.from().to_string(),
                    to: t.to().to_string(),
                    amount: t.amount().to_string(),
                    timestamp: Some(t.timestamp()),
                    description: t.description().map(str::to_string),
                })
                .collect(),
        }
    }
}
