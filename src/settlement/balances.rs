use crate::core::amount;
use crate::core::error::LedgerError;
use crate::core::ledger::LedgerView;
use crate::core::participant::ParticipantId;
use crate::settlement::options::{EngineOptions, ParticipantOrder, TransferAccounting};
use indexmap::IndexMap;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One participant's aggregate position in a group.
///
/// A positive `net` means the group owes the participant; a negative `net`
/// means the participant owes the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub participant: ParticipantId,
    /// Sum of expense amounts this participant paid.
    pub paid: Decimal,
    /// Sum of this participant's splits across all expenses.
    pub owed: Decimal,
    pub transferred_out: Decimal,
    pub transferred_in: Decimal,
    pub net: Decimal,
}

impl ParticipantBalance {
    fn zero(participant: ParticipantId) -> Self {
        Self {
            participant,
            paid: Decimal::ZERO,
            owed: Decimal::ZERO,
            transferred_out: Decimal::ZERO,
            transferred_in: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    /// What this participant still has to pay in: `|net|` for debtors, else zero.
    pub fn outstanding(&self) -> Decimal {
        if self.net < Decimal::ZERO {
            -self.net
        } else {
            Decimal::ZERO
        }
    }
}

/// Net balances for every member of a group, in member-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    entries: Vec<ParticipantBalance>,
}

impl Balances {
    pub fn entries(&self) -> &[ParticipantBalance] {
        &self.entries
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&ParticipantBalance> {
        self.entries.iter().find(|b| &b.participant == participant)
    }

    /// Net balance of a participant, zero if unknown.
    pub fn net(&self, participant: &ParticipantId) -> Decimal {
        self.get(participant).map(|b| b.net).unwrap_or(Decimal::ZERO)
    }

    /// Sum of all net balances.
    pub fn total_net(&self) -> Result<Decimal, LedgerError> {
        amount::sum(self.entries.iter().map(|b| b.net), "total net")
    }

    /// Whether credits and debits cancel exactly.
    pub fn is_conserved(&self) -> Result<bool, LedgerError> {
        Ok(self.total_net()? == Decimal::ZERO)
    }

    /// `(participant, net)` pairs in the requested order, ready for the simplifier.
    pub fn net_positions(&self, order: ParticipantOrder) -> Vec<(ParticipantId, Decimal)> {
        let mut positions: Vec<(ParticipantId, Decimal)> = self
            .entries
            .iter()
            .map(|b| (b.participant.clone(), b.net))
            .collect();
        if order == ParticipantOrder::ParticipantId {
            positions.sort_by(|a, b| a.0.cmp(&b.0));
        }
        positions
    }
}

/// Reduces a validated ledger to one net balance per member.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Compute every member's balance.
    ///
    /// # Algorithm
    ///
    /// 1. `paid(u)`: sum of amounts of admitted expenses paid by `u`.
    /// 2. `owed(u)`: sum of `u`'s split amounts over admitted expenses.
    /// 3. `transferred_out(u)`: sum of transfers sent by `u`.
    /// 4. `net(u) = paid(u) - owed(u) + transferred_out(u)`, minus
    ///    `transferred_in(u)` under [`TransferAccounting::BothParties`].
    ///
    /// Expenses are admitted by the configured single-split policy. Members
    /// with no activity get a zero balance.
    pub fn compute(view: &LedgerView<'_>, options: &EngineOptions) -> Result<Balances, LedgerError> {
        let mut totals: IndexMap<&ParticipantId, ParticipantBalance> = view
            .members()
            .iter()
            .map(|&m| (m, ParticipantBalance::zero(m.clone())))
            .collect();

        for expense in view
            .expenses()
            .iter()
            .filter(|e| options.single_split.admits(e))
        {
            if let Some(entry) = totals.get_mut(expense.payer()) {
                entry.paid = amount::add(entry.paid, expense.amount(), "paid")?;
            }
            for split in expense.splits() {
                if let Some(entry) = totals.get_mut(&split.participant) {
                    entry.owed = amount::add(entry.owed, split.amount, "owed")?;
                }
            }
        }

        for transfer in view.transfers() {
            if let Some(entry) = totals.get_mut(transfer.from()) {
                entry.transferred_out =
                    amount::add(entry.transferred_out, transfer.amount(), "transferred out")?;
            }
            if let Some(entry) = totals.get_mut(transfer.to()) {
                entry.transferred_in =
                    amount::add(entry.transferred_in, transfer.amount(), "transferred in")?;
            }
        }

        let mut entries = Vec::with_capacity(totals.len());
        for (_, mut entry) in totals {
            let mut net = amount::sub(entry.paid, entry.owed, "net balance")?;
            net = amount::add(net, entry.transferred_out, "net balance")?;
            if options.transfer_accounting == TransferAccounting::BothParties {
                net = amount::sub(net, entry.transferred_in, "net balance")?;
            }
            entry.net = net;
            debug!(
                "balance {}: paid={} owed={} out={} in={} net={}",
                entry.participant,
                entry.paid,
                entry.owed,
                entry.transferred_out,
                entry.transferred_in,
                entry.net
            );
            entries.push(entry);
        }

        Ok(Balances { entries })
    }
}
