//! External settlement attribution for QR payments.
//!
//! The engine has no access to provider settlement reports. Where they are
//! missing, `FixedRatioSplit` apportions internal QR totals with a static
//! ratio and labels the result as an approximation. It never attributes
//! individual transactions. Callers holding real settlement totals pass
//! `ExternalSettlements` instead.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendora_shared::config::{ProviderRatio, SettlementConfig};

use super::allocation::Apportion;
use crate::aggregation::Bucket;

/// Totals settled by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettlement {
    /// Provider name.
    pub provider: String,
    /// Number of settled payments.
    pub count: u64,
    /// Settled amount.
    pub amount: Decimal,
}

/// Source of externally settled QR totals.
pub trait SettlementSource: Send + Sync {
    /// Short label recorded in report metadata.
    fn label(&self) -> &str;

    /// Returns true if the totals are derived rather than reported by providers.
    fn is_approximation(&self) -> bool;

    /// Per-provider settled totals for a `YYYY-MM` month, given the internal QR bucket.
    fn settlements(&self, month: &str, internal: &Bucket) -> Vec<ProviderSettlement>;
}

/// Static-ratio provider split.
#[derive(Debug, Clone)]
pub struct FixedRatioSplit {
    providers: Vec<ProviderRatio>,
}

impl FixedRatioSplit {
    /// Label recorded in report metadata.
    pub const LABEL: &'static str = "fixed-ratio-split (approximation)";

    /// Creates a split over the given providers.
    #[must_use]
    pub fn new(providers: Vec<ProviderRatio>) -> Self {
        Self { providers }
    }

    /// Creates a split from configuration.
    #[must_use]
    pub fn from_config(config: &SettlementConfig) -> Self {
        Self::new(config.providers.clone())
    }
}

impl Default for FixedRatioSplit {
    fn default() -> Self {
        Self::from_config(&SettlementConfig::default())
    }
}

impl SettlementSource for FixedRatioSplit {
    fn label(&self) -> &str {
        Self::LABEL
    }

    fn is_approximation(&self) -> bool {
        true
    }

    fn settlements(&self, _month: &str, internal: &Bucket) -> Vec<ProviderSettlement> {
        let ratios: Vec<Decimal> = self.providers.iter().map(|p| p.ratio).collect();
        let amounts = Apportion::by_ratios(internal.amount, &ratios, 2);
        let counts = Apportion::counts(internal.count, &ratios);

        self.providers
            .iter()
            .zip(amounts)
            .zip(counts)
            .map(|((provider, amount), count)| ProviderSettlement {
                provider: provider.name.clone(),
                count,
                amount,
            })
            .collect()
    }
}

/// Settlement totals supplied by the caller, keyed by `YYYY-MM` month.
#[derive(Debug, Clone, Default)]
pub struct ExternalSettlements {
    label: String,
    by_month: BTreeMap<String, Vec<ProviderSettlement>>,
}

impl ExternalSettlements {
    /// Creates an empty set with a metadata label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            by_month: BTreeMap::new(),
        }
    }

    /// Records a provider's settled totals for a month.
    #[must_use]
    pub fn with_settlement(
        mut self,
        month: impl Into<String>,
        provider: impl Into<String>,
        count: u64,
        amount: Decimal,
    ) -> Self {
        self.by_month
            .entry(month.into())
            .or_default()
            .push(ProviderSettlement {
                provider: provider.into(),
                count,
                amount,
            });
        self
    }
}

impl SettlementSource for ExternalSettlements {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_approximation(&self) -> bool {
        false
    }

    fn settlements(&self, month: &str, _internal: &Bucket) -> Vec<ProviderSettlement> {
        let mut rows = self.by_month.get(month).cloned().unwrap_or_default();
        rows.sort_by(|a, b| a.provider.cmp(&b.provider));
        rows
    }
}
