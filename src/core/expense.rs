use crate::core::amount;
use crate::core::error::LedgerError;
use crate::core::participant::{GroupId, ParticipantId};
use chrono::{DateTime, Utc};
use rust_decimal::RoundingStrategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One participant's assigned share of an expense.
///
/// Splits are owned by their expense: they are created with it and replaced
/// wholesale when the expense changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub expense_id: Uuid,
    pub participant: ParticipantId,
    pub amount: Decimal,
}

/// A recorded expense, paid by one participant and shared by its splits.
///
/// Construction never panics: amounts and participants are validated when the
/// expense enters a [`Ledger`](crate::core::ledger::Ledger), where malformed
/// expenses are excluded and reported instead.
///
/// # Examples
///
/// ```
/// use expense_settlement::core::expense::Expense;
/// use expense_settlement::core::participant::{GroupId, ParticipantId};
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(GroupId::new("trip"), ParticipantId::new("alice"), dec!(90))
///     .with_title("Dinner")
///     .with_split(ParticipantId::new("alice"), dec!(30))
///     .with_split(ParticipantId::new("bob"), dec!(60));
///
/// assert_eq!(dinner.split_total().unwrap(), dec!(90));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    group_id: GroupId,
    payer: ParticipantId,
    amount: Decimal,
    splits: Vec<Split>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    expense_date: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(group_id: GroupId, payer: ParticipantId, amount: Decimal) -> Self {
        Self::with_id(Uuid::new_v4(), group_id, payer, amount)
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, group_id: GroupId, payer: ParticipantId, amount: Decimal) -> Self {
        Self {
            id,
            group_id,
            payer,
            amount,
            splits: Vec::new(),
            title: String::new(),
            notes: None,
            expense_date: None,
        }
    }

    /// Create an expense shared equally among `participants`.
    ///
    /// Shares are cut to the cent; leftover cents go one each to the first
    /// participants so the splits always add up to `amount` exactly.
    pub fn split_equally(
        group_id: GroupId,
        payer: ParticipantId,
        amount: Decimal,
        participants: &[ParticipantId],
    ) -> Self {
        let mut expense = Self::new(group_id, payer, amount);
        if participants.is_empty() {
            return expense;
        }

        let count = Decimal::from(participants.len());
        let share = (amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
        let cent = Decimal::new(1, 2);
        let mut leftover = amount - share * count;

        for participant in participants {
            let mut portion = share;
            if leftover >= cent {
                portion += cent;
                leftover -= cent;
            }
            expense = expense.with_split(participant.clone(), portion);
        }
        expense
    }

    /// Add a participant's share.
    pub fn with_split(mut self, participant: ParticipantId, amount: Decimal) -> Self {
        self.splits.push(Split {
            expense_id: self.id,
            participant,
            amount,
        });
        self
    }

    /// Replace all splits at once.
    pub fn with_splits(mut self, shares: impl IntoIterator<Item = (ParticipantId, Decimal)>) -> Self {
        let id = self.id;
        self.splits = shares
            .into_iter()
            .map(|(participant, amount)| Split {
                expense_id: id,
                participant,
                amount,
            })
            .collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_expense_date(mut self, date: DateTime<Utc>) -> Self {
        self.expense_date = Some(date);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn expense_date(&self) -> Option<DateTime<Utc>> {
        self.expense_date
    }

    /// Sum of all split amounts.
    pub fn split_total(&self) -> Result<Decimal, LedgerError> {
        amount::sum(self.splits.iter().map(|s| s.amount), "split total")
    }

    /// True when exactly one participant carries the whole expense.
    pub fn is_single_split(&self) -> bool {
        self.splits.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn group() -> GroupId {
        GroupId::new("G")
    }

    #[test]
    fn test_expense_creation() {
        let expense = Expense::new(group(), ParticipantId::new("A"), dec!(100))
            .with_split(ParticipantId::new("A"), dec!(50))
            .with_split(ParticipantId::new("B"), dec!(50));

        assert_eq!(expense.payer().as_str(), "A");
        assert_eq!(expense.amount(), dec!(100));
        assert_eq!(expense.splits().len(), 2);
        assert!(expense.splits().iter().all(|s| s.expense_id == expense.id()));
    }

    #[test]
    fn test_with_splits_replaces() {
        let expense = Expense::new(group(), ParticipantId::new("A"), dec!(10))
            .with_split(ParticipantId::new("A"), dec!(10))
            .with_splits([(ParticipantId::new("B"), dec!(10))]);

        assert_eq!(expense.splits().len(), 1);
        assert_eq!(expense.splits()[0].participant.as_str(), "B");
        assert!(expense.is_single_split());
    }

    #[test]
    fn test_split_equally_exact_to_the_cent() {
        let people = [
            ParticipantId::new("A"),
            ParticipantId::new("B"),
            ParticipantId::new("C"),
        ];
        let expense = Expense::split_equally(group(), people[0].clone(), dec!(100), &people);

        let amounts: Vec<Decimal> = expense.splits().iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(expense.split_total().unwrap(), dec!(100));
    }

    #[test]
    fn test_split_equally_even() {
        let people = [ParticipantId::new("A"), ParticipantId::new("B")];
        let expense = Expense::split_equally(group(), people[1].clone(), dec!(50), &people);
        assert!(expense.splits().iter().all(|s| s.amount == dec!(25)));
    }

    #[test]
    fn test_split_equally_no_participants() {
        let expense = Expense::split_equally(group(), ParticipantId::new("A"), dec!(50), &[]);
        assert!(expense.splits().is_empty());
    }

    #[test]
    fn test_metadata() {
        let expense = Expense::new(group(), ParticipantId::new("A"), dec!(12))
            .with_title("Taxi")
            .with_notes("airport run");
        assert_eq!(expense.title(), "Taxi");
        assert_eq!(expense.notes(), Some("airport run"));
        assert_eq!(expense.expense_date(), None);
    }

    #[test]
    fn test_split_total_overflow_is_an_error() {
        let expense = Expense::new(GroupId::new("G"), ParticipantId::new("A"), Decimal::MAX)
            .with_split(ParticipantId::new("A"), Decimal::MAX)
            .with_split(ParticipantId::new("B"), Decimal::MAX);
        assert!(matches!(
            expense.split_total(),
            Err(LedgerError::ArithmeticOverflow { .. })
        ));
    }
}
