use crate::core::participant::{GroupId, ParticipantId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Money that actually moved between two participants outside the
/// expense-splitting mechanism (a direct payment).
///
/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransfer {
    id: Uuid,
    group_id: GroupId,
    from: ParticipantId,
    to: ParticipantId,
    amount: Decimal,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    description: Option<String>,
}

impl SettlementTransfer {
    /// Record a transfer made now.
    pub fn new(group_id: GroupId, from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        Self::with_id(Uuid::new_v4(), group_id, from, to, amount, Utc::now())
    }

    /// Create a transfer with a specific ID and timestamp.
    pub fn with_id(
        id: Uuid,
        group_id: GroupId,
        from: ParticipantId,
        to: ParticipantId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            from,
            to,
            amount,
            timestamp,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn from(&self) -> &ParticipantId {
        &self.from
    }

    pub fn to(&self) -> &ParticipantId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
