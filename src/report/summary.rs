use crate::core::amount;
use crate::core::debt::DebtEdge;
use crate::core::error::{Diagnostic, LedgerError};
use crate::core::expense::Expense;
use crate::core::ledger::Ledger;
use crate::core::mode::{GroupSettings, SettlementMode};
use crate::core::participant::{GroupId, ParticipantId};
use crate::settlement::balances::{BalanceCalculator, ParticipantBalance};
use crate::settlement::itemized::ItemizedConsolidator;
use crate::settlement::options::EngineOptions;
use crate::settlement::simplify::DebtSimplifier;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-participant line of a [`Summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: ParticipantId,
    pub paid: Decimal,
    pub owed: Decimal,
    pub transferred_out: Decimal,
    pub net: Decimal,
    /// `|net|` for participants who still owe, otherwise zero.
    pub outstanding: Decimal,
}

impl From<&ParticipantBalance> for ParticipantSummary {
    fn from(balance: &ParticipantBalance) -> Self {
        Self {
            participant: balance.participant.clone(),
            paid: balance.paid,
            owed: balance.owed,
            transferred_out: balance.transferred_out,
            net: balance.net,
            outstanding: balance.outstanding(),
        }
    }
}

/// Settlement report for one group.
///
/// Exactly one of `simplified_transfers` / `itemized_transfers` is `Some`,
/// matching `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub group_id: GroupId,
    pub mode: SettlementMode,
    pub total_spend: Decimal,
    /// Sum of `paid - outstanding` over all participants.
    pub total_balance: Decimal,
    pub per_participant: Vec<ParticipantSummary>,
    pub simplified_transfers: Option<Vec<DebtEdge>>,
    pub itemized_transfers: Option<Vec<DebtEdge>>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Summary {
    /// The recommended transfers for whichever mode produced this summary.
    pub fn transfers(&self) -> &[DebtEdge] {
        self.simplified_transfers
            .as_deref()
            .or(self.itemized_transfers.as_deref())
            .unwrap_or(&[])
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&ParticipantSummary> {
        self.per_participant.iter().find(|p| &p.participant == id)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Builds [`Summary`] reports. A pure query: it never changes the group's
/// mode; use [`GroupSettings::apply`] for that.
#[derive(Debug, Clone, Default)]
pub struct SummaryAssembler {
    options: EngineOptions,
}

impl SummaryAssembler {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Summarise using the mode stored in the group's settings.
    pub fn summarize(&self, settings: &GroupSettings, ledger: &Ledger) -> Result<Summary, LedgerError> {
        self.assemble(ledger, settings.mode)
    }

    /// Validate the ledger, compute balances and run the algorithm `mode` selects.
    pub fn assemble(&self, ledger: &Ledger, mode: SettlementMode) -> Result<Summary, LedgerError> {
        let view = ledger.validate()?;
        let total_spend = view.total_spend()?;
        let balances = BalanceCalculator::compute(&view, &self.options)?;

        let per_participant: Vec<ParticipantSummary> =
            balances.entries().iter().map(ParticipantSummary::from).collect();

        let mut total_balance = Decimal::ZERO;
        for line in &per_participant {
            let contribution = amount::sub(line.paid, line.outstanding, "total balance")?;
            total_balance = amount::add(total_balance, contribution, "total balance")?;
        }

        let mut diagnostics = Vec::new();
        let (simplified_transfers, itemized_transfers) = match mode {
            SettlementMode::Simplify => {
                let positions = balances.net_positions(self.options.ordering);
                let simplified = DebtSimplifier::simplify(&positions)?;
                diagnostics.extend(simplified.diagnostic());
                (Some(simplified.transfers), None)
            }
            SettlementMode::Itemized => {
                let expenses: Vec<&Expense> = view
                    .expenses()
                    .iter()
                    .copied()
                    .filter(|e| self.options.single_split.admits(e))
                    .collect();
                let edges = ItemizedConsolidator::consolidate(&expenses, view.transfers())?;
                (None, Some(edges))
            }
        };

        let group_id = view.group_id().clone();
        let mut all_diagnostics = view.into_diagnostics();
        all_diagnostics.extend(diagnostics);

        debug!(
            "summary for {} ({}): spend={} participants={} diagnostics={}",
            group_id,
            mode,
            total_spend,
            per_participant.len(),
            all_diagnostics.len()
        );

        Ok(Summary {
            group_id,
            mode,
            total_spend,
            total_balance,
            per_participant,
            simplified_transfers,
            itemized_transfers,
            diagnostics: all_diagnostics,
        })
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Summary: {} ===", self.group_id)?;
        writeln!(f, "Mode:           {}", self.mode)?;
        writeln!(f, "Total Spend:    {}", self.total_spend)?;
        writeln!(f, "Total Balance:  {}", self.total_balance)?;

        writeln!(f, "\nParticipants:")?;
        for line in &self.per_participant {
            writeln!(
                f,
                "  {:<16} paid {:>10}  owed {:>10}  sent {:>10}  net {:>10}",
                line.participant.as_str(),
                line.paid,
                line.owed,
                line.transferred_out,
                line.net
            )?;
        }

        writeln!(f, "\nRecommended Transfers:")?;
        if self.transfers().is_empty() {
            writeln!(f, "  (none, everyone is settled)")?;
        }
        for edge in self.transfers() {
            writeln!(f, "  {}", edge)?;
        }

        if !self.diagnostics.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "  {}", diagnostic)?;
            }
        }
        Ok(())
    }
}
