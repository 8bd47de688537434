use crate::core::amount;
use crate::core::error::{Diagnostic, LedgerError, RecordRef};
use crate::core::expense::Expense;
use crate::core::participant::{GroupId, ParticipantId};
use crate::core::transfer::SettlementTransfer;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Immutable snapshot of one group's financial facts.
///
/// The member list is the universe of participants: the order of `members`
/// is preserved and is what [`ParticipantOrder::Membership`] refers to.
///
/// [`ParticipantOrder::Membership`]: crate::settlement::options::ParticipantOrder::Membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    group_id: GroupId,
    members: Vec<ParticipantId>,
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    transfers: Vec<SettlementTransfer>,
}

impl Ledger {
    pub fn new(group_id: GroupId, members: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            group_id,
            members: members.into_iter().collect(),
            expenses: Vec::new(),
            transfers: Vec::new(),
        }
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn add_transfer(&mut self, transfer: SettlementTransfer) {
        self.transfers.push(transfer);
    }

    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.add_expense(expense);
        self
    }

    pub fn with_transfer(mut self, transfer: SettlementTransfer) -> Self {
        self.add_transfer(transfer);
        self
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn transfers(&self) -> &[SettlementTransfer] {
        &self.transfers
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.transfers.is_empty()
    }

    /// Check every record against the member list and amount rules.
    ///
    /// Malformed records are excluded as a unit and reported; the view that
    /// comes back only holds records safe to aggregate. Fails only on
    /// arithmetic overflow.
    pub fn validate(&self) -> Result<LedgerView<'_>, LedgerError> {
        let mut diagnostics = Vec::new();

        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(self.members.len());
        for member in &self.members {
            if seen.insert(member) {
                members.push(member);
            } else {
                diagnostics.push(Diagnostic::DuplicateMember {
                    participant: member.clone(),
                });
            }
        }

        let mut expenses = Vec::with_capacity(self.expenses.len());
        for expense in &self.expenses {
            let problems = self.expense_problems(expense, &seen);
            if problems.is_empty() {
                let split_total = expense.split_total()?;
                if split_total != expense.amount() {
                    diagnostics.push(Diagnostic::SplitSumMismatch {
                        expense: expense.id(),
                        amount: expense.amount(),
                        split_total,
                    });
                }
                expenses.push(expense);
            } else {
                diagnostics.extend(problems);
            }
        }

        let mut transfers = Vec::with_capacity(self.transfers.len());
        for transfer in &self.transfers {
            let problems = self.transfer_problems(transfer, &seen);
            if problems.is_empty() {
                transfers.push(transfer);
            } else {
                diagnostics.extend(problems);
            }
        }

        for diagnostic in &diagnostics {
            warn!("group {}: {}", self.group_id, diagnostic);
        }

        Ok(LedgerView {
            group_id: &self.group_id,
            members,
            expenses,
            transfers,
            diagnostics,
        })
    }

    fn expense_problems(
        &self,
        expense: &Expense,
        members: &HashSet<&ParticipantId>,
    ) -> Vec<Diagnostic> {
        let record = RecordRef::Expense(expense.id());
        let mut problems = Vec::new();

        if expense.group_id() != &self.group_id {
            problems.push(Diagnostic::ForeignGroup {
                record,
                group: expense.group_id().clone(),
            });
        }
        if expense.amount() <= Decimal::ZERO {
            problems.push(Diagnostic::NonPositiveAmount {
                record,
                amount: expense.amount(),
            });
        }
        if !members.contains(expense.payer()) {
            problems.push(Diagnostic::UnknownParticipant {
                record,
                participant: expense.payer().clone(),
            });
        }
        if expense.splits().is_empty() {
            problems.push(Diagnostic::EmptySplits {
                expense: expense.id(),
            });
        }
        for split in expense.splits() {
            if !members.contains(&split.participant) {
                problems.push(Diagnostic::UnknownParticipant {
                    record,
                    participant: split.participant.clone(),
                });
            }
            if split.amount < Decimal::ZERO {
                problems.push(Diagnostic::NegativeSplit {
                    expense: expense.id(),
                    participant: split.participant.clone(),
                    amount: split.amount,
                });
            }
        }
        problems
    }

    fn transfer_problems(
        &self,
        transfer: &SettlementTransfer,
        members: &HashSet<&ParticipantId>,
    ) -> Vec<Diagnostic> {
        let record = RecordRef::Transfer(transfer.id());
        let mut problems = Vec::new();

        if transfer.group_id() != &self.group_id {
            problems.push(Diagnostic::ForeignGroup {
                record,
                group: transfer.group_id().clone(),
            });
        }
        if transfer.amount() <= Decimal::ZERO {
            problems.push(Diagnostic::NonPositiveAmount {
                record,
                amount: transfer.amount(),
            });
        }
        if transfer.from() == transfer.to() {
            problems.push(Diagnostic::SelfTransfer {
                transfer: transfer.id(),
                participant: transfer.from().clone(),
            });
        }
        for participant in [transfer.from(), transfer.to()] {
            if !members.contains(participant) {
                problems.push(Diagnostic::UnknownParticipant {
                    record,
                    participant: participant.clone(),
                });
            }
        }
        problems
    }
}

/// The subset of a [`Ledger`] that passed validation.
#[derive(Debug, Clone)]
pub struct LedgerView<'a> {
    group_id: &'a GroupId,
    members: Vec<&'a ParticipantId>,
    expenses: Vec<&'a Expense>,
    transfers: Vec<&'a SettlementTransfer>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> LedgerView<'a> {
    pub fn group_id(&self) -> &'a GroupId {
        self.group_id
    }

    /// Members in listed order, duplicates removed.
    pub fn members(&self) -> &[&'a ParticipantId] {
        &self.members
    }

    pub fn expenses(&self) -> &[&'a Expense] {
        &self.expenses
    }

    pub fn transfers(&self) -> &[&'a SettlementTransfer] {
        &self.transfers
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Total amount of every accepted expense.
    pub fn total_spend(&self) -> Result<Decimal, LedgerError> {
        amount::sum(self.expenses.iter().map(|e| e.amount()), "total spend")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn p(id: &str) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn group() -> GroupId {
        GroupId::new("G")
    }

    fn ledger() -> Ledger {
        Ledger::new(group(), [p("A"), p("B"), p("C")])
    }

    #[test]
    fn test_well_formed_ledger_has_no_diagnostics() {
        let ledger = ledger()
            .with_expense(
                Expense::new(group(), p("A"), dec!(90))
                    .with_split(p("A"), dec!(30))
                    .with_split(p("B"), dec!(30))
                    .with_split(p("C"), dec!(30)),
            )
            .with_transfer(SettlementTransfer::new(group(), p("B"), p("A"), dec!(30)));

        let view = ledger.validate().unwrap();
        assert!(view.diagnostics().is_empty());
        assert_eq!(view.expenses().len(), 1);
        assert_eq!(view.transfers().len(), 1);
        assert_eq!(view.total_spend().unwrap(), dec!(90));
    }

    #[test]
    fn test_expense_with_non_member_split_is_rejected_whole() {
        let ledger = ledger()
            .with_expense(
                Expense::new(group(), p("A"), dec!(100))
                    .with_split(p("A"), dec!(50))
                    .with_split(p("Z"), dec!(50)),
            )
            .with_expense(
                Expense::new(group(), p("B"), dec!(20))
                    .with_split(p("B"), dec!(10))
                    .with_split(p("C"), dec!(10)),
            );

        let view = ledger.validate().unwrap();
        assert_eq!(view.expenses().len(), 1);
        assert_eq!(view.expenses()[0].payer(), &p("B"));
        assert!(matches!(
            &view.diagnostics()[0],
            Diagnostic::UnknownParticipant { participant, .. } if participant == &p("Z")
        ));
    }

    #[test]
    fn test_rejects_non_positive_negative_and_empty() {
        let ledger = ledger()
            .with_expense(Expense::new(group(), p("A"), dec!(0)).with_split(p("A"), dec!(0)))
            .with_expense(
                Expense::new(group(), p("A"), dec!(10))
                    .with_split(p("A"), dec!(15))
                    .with_split(p("B"), dec!(-5)),
            )
            .with_expense(Expense::new(group(), p("A"), dec!(10)));

        let view = ledger.validate().unwrap();
        assert!(view.expenses().is_empty());
        let kinds: Vec<_> = view.diagnostics().iter().map(|d| d.rejects_record()).collect();
        assert_eq!(kinds, vec![true, true, true]);
        assert!(view
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::EmptySplits { .. })));
        assert!(view
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::NegativeSplit { .. })));
    }

    #[test]
    fn test_split_mismatch_is_warning_only() {
        let ledger = ledger().with_expense(
            Expense::new(group(), p("A"), dec!(100))
                .with_split(p("A"), dec!(33.33))
                .with_split(p("B"), dec!(33.33))
                .with_split(p("C"), dec!(33.33)),
        );

        let view = ledger.validate().unwrap();
        assert_eq!(view.expenses().len(), 1);
        assert_eq!(
            view.diagnostics(),
            &[Diagnostic::SplitSumMismatch {
                expense: ledger.expenses()[0].id(),
                amount: dec!(100),
                split_total: dec!(99.99),
            }]
        );
    }

    #[test]
    fn test_bad_transfers_rejected() {
        let ledger = ledger()
            .with_transfer(SettlementTransfer::new(group(), p("A"), p("A"), dec!(5)))
            .with_transfer(SettlementTransfer::new(group(), p("A"), p("Q"), dec!(5)))
            .with_transfer(SettlementTransfer::new(GroupId::new("other"), p("A"), p("B"), dec!(5)))
            .with_transfer(SettlementTransfer::new(group(), p("A"), p("B"), dec!(5)));

        let view = ledger.validate().unwrap();
        assert_eq!(view.transfers().len(), 1);
        assert_eq!(view.diagnostics().len(), 3);
    }

    #[test]
    fn test_duplicate_members_collapsed() {
        let ledger = Ledger::new(group(), [p("A"), p("B"), p("A")]);
        let view = ledger.validate().unwrap();
        assert_eq!(view.members(), &[&p("A"), &p("B")]);
        assert_eq!(
            view.diagnostics(),
            &[Diagnostic::DuplicateMember { participant: p("A") }]
        );
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::new(group(), Vec::new());
        assert!(ledger.is_empty());
        let view = ledger.validate().unwrap();
        assert_eq!(view.total_spend().unwrap(), Decimal::ZERO);
        assert!(view.diagnostics().is_empty());
    }
}
