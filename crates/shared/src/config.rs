//! Application configuration management.
//!
//! Every tunable the engine reads (thresholds, price tables, provider
//! ratios, top-K) is loaded here and passed down explicitly. There are no
//! hidden globals.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Report engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Report engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Settlement discrepancy thresholds.
    #[serde(default)]
    pub reconciliation: ReconciliationThresholds,
    /// Alert rule thresholds.
    #[serde(default)]
    pub alerts: AlertThresholds,
    /// Ingredient price and package tables.
    #[serde(default)]
    pub ingredients: IngredientCatalog,
    /// QR settlement provider split.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Number of products and machines in the cross-analysis matrix.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reconciliation: ReconciliationThresholds::default(),
            alerts: AlertThresholds::default(),
            ingredients: IngredientCatalog::default(),
            settlement: SettlementConfig::default(),
            top_k: default_top_k(),
        }
    }
}

/// Thresholds (in percent of the internal amount) for reconciliation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationThresholds {
    /// Difference percent at or above which a month is a warning.
    #[serde(default = "default_warning_percent")]
    pub warning_percent: Decimal,
    /// Difference percent at or above which a month is critical.
    #[serde(default = "default_critical_percent")]
    pub critical_percent: Decimal,
}

fn default_warning_percent() -> Decimal {
    Decimal::TWO
}

fn default_critical_percent() -> Decimal {
    Decimal::new(5, 0)
}

impl Default for ReconciliationThresholds {
    fn default() -> Self {
        Self {
            warning_percent: default_warning_percent(),
            critical_percent: default_critical_percent(),
        }
    }
}

/// Thresholds for the rule-based alert layer.
///
/// Margin thresholds are magnitudes: a value of 5 fires when the margin
/// trend drops below -5 percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Delivery failure rate (percent) above which a warning fires.
    #[serde(default = "default_failure_warning")]
    pub failure_rate_warning_percent: Decimal,
    /// Delivery failure rate (percent) above which a critical alert fires.
    #[serde(default = "default_failure_critical")]
    pub failure_rate_critical_percent: Decimal,
    /// Margin decline (points) beyond which a warning fires.
    #[serde(default = "default_margin_warning")]
    pub margin_decline_warning_points: Decimal,
    /// Margin decline (points) beyond which a critical alert fires.
    #[serde(default = "default_margin_critical")]
    pub margin_decline_critical_points: Decimal,
}

fn default_failure_warning() -> Decimal {
    Decimal::new(5, 0)
}

fn default_failure_critical() -> Decimal {
    Decimal::TEN
}

fn default_margin_warning() -> Decimal {
    Decimal::new(5, 0)
}

fn default_margin_critical() -> Decimal {
    Decimal::TEN
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            failure_rate_warning_percent: default_failure_warning(),
            failure_rate_critical_percent: default_failure_critical(),
            margin_decline_warning_points: default_margin_warning(),
            margin_decline_critical_points: default_margin_critical(),
        }
    }
}

/// Ingredient price-per-unit and package-size tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCatalog {
    /// Price per unit of each ingredient.
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,
    /// Units per package, where known.
    #[serde(default)]
    pub package_sizes: BTreeMap<String, Decimal>,
}

/// A named QR settlement provider and its fixed share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRatio {
    /// Provider name.
    pub name: String,
    /// Share of QR volume, between 0 and 1.
    pub ratio: Decimal,
}

/// QR settlement split configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Providers and their fixed shares. Shares must sum to 1.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderRatio>,
}

fn default_providers() -> Vec<ProviderRatio> {
    vec![
        ProviderRatio {
            name: "payme".to_string(),
            ratio: Decimal::new(6, 1),
        },
        ProviderRatio {
            name: "click".to_string(),
            ratio: Decimal::new(4, 1),
        },
    ]
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VENDORA").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.engine.validate()?;
        Ok(app)
    }
}

impl EngineConfig {
    /// Checks cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` describing the first violated constraint.
    pub fn validate(&self) -> AppResult<()> {
        let thresholds = &self.reconciliation;
        if thresholds.warning_percent.is_sign_negative()
            || thresholds.warning_percent > thresholds.critical_percent
        {
            return Err(AppError::Validation(format!(
                "reconciliation thresholds must satisfy 0 <= warning ({}) <= critical ({})",
                thresholds.warning_percent, thresholds.critical_percent
            )));
        }

        let alerts = &self.alerts;
        if alerts.failure_rate_warning_percent > alerts.failure_rate_critical_percent {
            return Err(AppError::Validation(
                "failure rate warning threshold exceeds critical threshold".to_string(),
            ));
        }
        if alerts.margin_decline_warning_points > alerts.margin_decline_critical_points {
            return Err(AppError::Validation(
                "margin decline warning threshold exceeds critical threshold".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(AppError::Validation("top_k must be at least 1".to_string()));
        }

        if let Some((name, _)) = self
            .ingredients
            .prices
            .iter()
            .find(|(_, price)| price.is_sign_negative())
        {
            return Err(AppError::Validation(format!(
                "ingredient price for {name} is negative"
            )));
        }
        if let Some((name, _)) = self
            .ingredients
            .package_sizes
            .iter()
            .find(|(_, size)| size.is_sign_negative() || size.is_zero())
        {
            return Err(AppError::Validation(format!(
                "package size for {name} must be positive"
            )));
        }

        let providers = &self.settlement.providers;
        if providers.is_empty() {
            return Err(AppError::Validation(
                "at least one settlement provider is required".to_string(),
            ));
        }
        if providers.iter().any(|p| p.ratio.is_sign_negative()) {
            return Err(AppError::Validation(
                "settlement provider ratios must not be negative".to_string(),
            ));
        }
        let total: Decimal = providers.iter().map(|p| p.ratio).sum();
        if total != Decimal::ONE {
            return Err(AppError::Validation(format!(
                "settlement provider ratios must sum to 1, got {total}"
            )));
        }

        Ok(())
    }
}
