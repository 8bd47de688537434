use crate::core::amount;
use crate::core::debt::DebtEdge;
use crate::core::error::LedgerError;
use crate::core::expense::Expense;
use crate::core::participant::ParticipantId;
use crate::core::transfer::SettlementTransfer;
use indexmap::IndexMap;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

type Pair<'a> = (&'a ParticipantId, &'a ParticipantId);

/// Pairwise debt consolidation that keeps per-expense provenance.
///
/// Unlike [`DebtSimplifier`](crate::settlement::simplify::DebtSimplifier),
/// every recommended payment here corresponds to real debts between the two
/// participants involved; nobody is asked to pay someone they never shared
/// an expense with.
pub struct ItemizedConsolidator;

impl ItemizedConsolidator {
    /// Consolidate expense debts into at most one payment per participant pair.
    ///
    /// # Algorithm
    ///
    /// 1. For every split whose participant is not the payer, the participant
    ///    owes the payer the split amount.
    /// 2. That debt is reduced by whatever part of the participant's direct
    ///    transfers to the payer has not yet been credited against an earlier
    ///    expense. Each transfer is consumed at most once over the whole run.
    /// 3. Positive remainders accumulate per ordered (debtor, creditor) pair.
    /// 4. Each unordered pair is netted once; a non-zero net becomes one edge
    ///    pointing from the net debtor to the net creditor.
    ///
    /// Edges come out in the order their pairs first accrued debt.
    pub fn consolidate(
        expenses: &[&Expense],
        transfers: &[&SettlementTransfer],
    ) -> Result<Vec<DebtEdge>, LedgerError> {
        let mut transfer_totals: HashMap<Pair<'_>, Decimal> = HashMap::new();
        for transfer in transfers {
            let total = transfer_totals
                .entry((transfer.from(), transfer.to()))
                .or_insert(Decimal::ZERO);
            *total = amount::add(*total, transfer.amount(), "transfer total")?;
        }

        let mut applied: HashMap<Pair<'_>, Decimal> = HashMap::new();
        let mut grouped: IndexMap<&ParticipantId, IndexMap<&ParticipantId, Decimal>> =
            IndexMap::new();

        for expense in expenses {
            let creditor = expense.payer();
            for split in expense.splits() {
                let debtor = &split.participant;
                if debtor == creditor {
                    continue;
                }
                let key = (debtor, creditor);

                let paid = transfer_totals.get(&key).copied().unwrap_or(Decimal::ZERO);
                let already = applied.get(&key).copied().unwrap_or(Decimal::ZERO);
                let remaining = amount::sub(paid, already, "unapplied transfers")?;

                let adjusted =
                    amount::sub(split.amount, remaining.max(Decimal::ZERO), "adjusted debt")?;
                if remaining > Decimal::ZERO {
                    let consumed = split.amount.min(remaining).max(Decimal::ZERO);
                    let entry = applied.entry(key).or_insert(Decimal::ZERO);
                    *entry = amount::add(*entry, consumed, "applied transfers")?;
                }

                if adjusted > Decimal::ZERO {
                    let entry = grouped
                        .entry(debtor)
                        .or_default()
                        .entry(creditor)
                        .or_insert(Decimal::ZERO);
                    *entry = amount::add(*entry, adjusted, "pairwise debt")?;
                }
            }
        }

        Self::net_pairs(&grouped)
    }

    fn net_pairs(
        grouped: &IndexMap<&ParticipantId, IndexMap<&ParticipantId, Decimal>>,
    ) -> Result<Vec<DebtEdge>, LedgerError> {
        let mut edges = Vec::new();
        let mut processed: HashSet<Pair<'_>> = HashSet::new();

        for (&from, row) in grouped {
            for (&to, &owed) in row {
                if owed <= Decimal::ZERO {
                    continue;
                }
                let pair = if from <= to { (from, to) } else { (to, from) };
                if !processed.insert(pair) {
                    continue;
                }

                let reverse = grouped
                    .get(to)
                    .and_then(|r| r.get(from))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let net = amount::sub(owed, reverse, "pair net")?;
                debug!(
                    "itemized: {} owes {} {}, reverse {}, net {}",
                    from, to, owed, reverse, net
                );

                if net > Decimal::ZERO {
                    edges.push(DebtEdge::new(from.clone(), to.clone(), net));
                } else if net < Decimal::ZERO {
                    edges.push(DebtEdge::new(to.clone(), from.clone(), -net));
                }
            }
        }
        Ok(edges)
    }
}
