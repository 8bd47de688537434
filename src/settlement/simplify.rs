use crate::core::amount;
use crate::core::debt::DebtEdge;
use crate::core::error::{Diagnostic, LedgerError};
use crate::core::participant::ParticipantId;
use indexmap::IndexMap;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Output of [`DebtSimplifier::simplify`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedDebts {
    pub transfers: Vec<DebtEdge>,
    /// Balances left unmatched once either queue ran dry. Empty for a
    /// balanced input; creditors positive, debtors negative.
    pub residual: Vec<(ParticipantId, Decimal)>,
}

impl SimplifiedDebts {
    pub fn is_balanced(&self) -> bool {
        self.residual.is_empty()
    }

    /// The unbalanced-ledger diagnostic, if any.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        if self.is_balanced() {
            None
        } else {
            Some(Diagnostic::UnbalancedLedger {
                residual: self.residual.clone(),
            })
        }
    }

    /// Total amount moved by the recommended transfers.
    pub fn total_transferred(&self) -> Result<Decimal, LedgerError> {
        amount::sum(self.transfers.iter().map(|t| t.amount()), "transferred total")
    }
}

/// Greedy minimum-transfer debt simplification over net balances.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Turn net balances into a short list of debtor → creditor payments.
    ///
    /// # Algorithm
    ///
    /// 1. Merge repeated entries for the same participant into one balance,
    ///    at the position the participant first appeared.
    /// 2. Split balances into a creditor queue (net > 0) and a debtor queue
    ///    (net < 0, held as a positive amount), keeping input order. Zero
    ///    balances are dropped.
    /// 3. Pop the front of each queue and pay `t = min(credit, debt)` from
    ///    debtor to creditor.
    /// 4. A participant with a remainder goes back on the *front* of its queue.
    /// 5. Stop when either queue is empty. Anything left over means the
    ///    balances did not sum to zero and is returned as `residual`.
    ///
    /// Output is fully determined by the order of `balances`; callers fix
    /// that order explicitly.
    pub fn simplify(balances: &[(ParticipantId, Decimal)]) -> Result<SimplifiedDebts, LedgerError> {
        let mut merged: IndexMap<&ParticipantId, Decimal> = IndexMap::new();
        for (participant, net) in balances {
            let entry = merged.entry(participant).or_insert(Decimal::ZERO);
            *entry = amount::add(*entry, *net, "merged balance")?;
        }
        if merged.len() < balances.len() {
            warn!(
                "simplify: merged {} duplicate balance entries",
                balances.len() - merged.len()
            );
        }

        let mut creditors: VecDeque<(ParticipantId, Decimal)> = VecDeque::new();
        let mut debtors: VecDeque<(ParticipantId, Decimal)> = VecDeque::new();

        for (participant, net) in merged {
            if net > Decimal::ZERO {
                creditors.push_back((participant.clone(), net));
            } else if net < Decimal::ZERO {
                debtors.push_back((participant.clone(), -net));
            }
        }

        let mut transfers = Vec::new();
        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some((creditor, credit)), Some((debtor, debt))) =
                (creditors.pop_front(), debtors.pop_front())
            else {
                break;
            };
            let amount = credit.min(debt);
            debug!("simplify: {} pays {} {}", debtor, creditor, amount);

            let credit_left = amount::sub(credit, amount, "creditor remainder")?;
            let debt_left = amount::sub(debt, amount, "debtor remainder")?;

            transfers.push(DebtEdge::new(debtor.clone(), creditor.clone(), amount));

            if credit_left > Decimal::ZERO {
                creditors.push_front((creditor, credit_left));
            }
            if debt_left > Decimal::ZERO {
                debtors.push_front((debtor, debt_left));
            }
        }

        let residual: Vec<(ParticipantId, Decimal)> = creditors
            .into_iter()
            .chain(debtors.into_iter().map(|(p, debt)| (p, -debt)))
            .collect();

        if !residual.is_empty() {
            warn!(
                "simplify: balances do not sum to zero, {} participant(s) left unmatched",
                residual.len()
            );
        }

        Ok(SimplifiedDebts {
            transfers,
            residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn p(id: &str) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn edge(from: &str, to: &str, amount: Decimal) -> DebtEdge {
        DebtEdge::new(p(from), p(to), amount)
    }

    #[test]
    fn test_one_debtor_two_creditors() {
        let balances = vec![(p("A"), dec!(-70)), (p("B"), dec!(20)), (p("C"), dec!(50))];
        let result = DebtSimplifier::simplify(&balances).unwrap();

        assert_eq!(
            result.transfers,
            vec![edge("A", "B", dec!(20)), edge("A", "C", dec!(50))]
        );
        assert!(result.is_balanced());
        assert_eq!(result.total_transferred().unwrap(), dec!(70));
    }

    #[test]
    fn test_single_pair() {
        let balances = vec![(p("A"), dec!(-50)), (p("B"), dec!(50))];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert_eq!(result.transfers, vec![edge("A", "B", dec!(50))]);
    }

    #[test]
    fn test_all_zero() {
        let balances = vec![(p("A"), dec!(0)), (p("B"), dec!(0)), (p("C"), dec!(0))];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert!(result.transfers.is_empty());
        assert!(result.is_balanced());
    }

    #[test]
    fn test_empty() {
        let result = DebtSimplifier::simplify(&[]).unwrap();
        assert!(result.transfers.is_empty());
        assert!(result.diagnostic().is_none());
    }

    #[test]
    fn test_two_debtors_two_creditors() {
        let balances = vec![
            (p("A"), dec!(-100)),
            (p("B"), dec!(-50)),
            (p("C"), dec!(100)),
            (p("D"), dec!(50)),
        ];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert_eq!(
            result.transfers,
            vec![edge("A", "C", dec!(100)), edge("B", "D", dec!(50))]
        );
    }

    #[test]
    fn test_remainder_goes_to_front() {
        // C's leftover credit is served before D.
        let balances = vec![
            (p("B"), dec!(-30)),
            (p("C"), dec!(50)),
            (p("E"), dec!(-40)),
            (p("D"), dec!(20)),
        ];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert_eq!(
            result.transfers,
            vec![
                edge("B", "C", dec!(30)),
                edge("E", "C", dec!(20)),
                edge("E", "D", dec!(20)),
            ]
        );
        assert!(result.is_balanced());
    }

    #[test]
    fn test_order_changes_pairing() {
        let forward = vec![(p("A"), dec!(-70)), (p("B"), dec!(20)), (p("C"), dec!(50))];
        let reversed = vec![(p("C"), dec!(50)), (p("B"), dec!(20)), (p("A"), dec!(-70))];

        let a = DebtSimplifier::simplify(&forward).unwrap();
        let b = DebtSimplifier::simplify(&reversed).unwrap();
        assert_eq!(a.transfers[0], edge("A", "B", dec!(20)));
        assert_eq!(b.transfers[0], edge("A", "C", dec!(50)));
    }

    #[test]
    fn test_unbalanced_input_reports_residual() {
        let balances = vec![(p("A"), dec!(-30)), (p("B"), dec!(50))];
        let result = DebtSimplifier::simplify(&balances).unwrap();

        assert_eq!(result.transfers, vec![edge("A", "B", dec!(30))]);
        assert_eq!(result.residual, vec![(p("B"), dec!(20))]);
        assert_eq!(
            result.diagnostic(),
            Some(Diagnostic::UnbalancedLedger {
                residual: vec![(p("B"), dec!(20))]
            })
        );
    }

    #[test]
    fn test_unbalanced_debtor_residual_is_negative() {
        let balances = vec![(p("A"), dec!(-80)), (p("B"), dec!(50))];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert_eq!(result.residual, vec![(p("A"), dec!(-30))]);
    }

    #[test]
    fn test_repeated_participant_never_pays_itself() {
        let balances = vec![(p("A"), dec!(10)), (p("A"), dec!(-10))];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert!(result.transfers.is_empty());
        assert!(result.is_balanced());
    }

    #[test]
    fn test_repeated_entries_merge_at_first_position() {
        // A: +30 - 10 = +20, listed before C.
        let balances = vec![
            (p("A"), dec!(30)),
            (p("B"), dec!(-40)),
            (p("C"), dec!(20)),
            (p("A"), dec!(-10)),
        ];
        let result = DebtSimplifier::simplify(&balances).unwrap();
        assert_eq!(
            result.transfers,
            vec![edge("B", "A", dec!(20)), edge("B", "C", dec!(20))]
        );
        assert!(result.is_balanced());
    }
}
