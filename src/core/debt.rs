use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recommended payment: `from` should pay `to` the given amount.
///
/// Debt edges are produced by the engine, never supplied by callers, so the
/// constructor enforces their invariants directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    from: ParticipantId,
    to: ParticipantId,
    amount: Decimal,
}

impl DebtEdge {
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if `from == to`.
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "DebtEdge amount must be positive, got {}",
            amount
        );
        assert!(from != to, "DebtEdge cannot point from '{}' to itself", from);
        Self { from, to, amount }
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
}

impl fmt::Display for DebtEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.from, self.to, self.amount)
    }
}
