//! Report request and document types.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use vendora_shared::types::{LocationId, MachineId, OrganizationId, ProductId, ReportId};

use super::error::ReportError;
use crate::aggregation::Period;
use crate::analytics::CrossAnalytics;
use crate::finance::FinancialReport;
use crate::payments::PaymentTypesReport;
use crate::transaction::{PaymentType, TransactionRecord};

/// Document schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Which structures a report contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Payment-type report only.
    PaymentTypes,
    /// Financial report only.
    Financial,
    /// Both reports plus cross analytics.
    Full,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaymentTypes => write!(f, "payment_types"),
            Self::Financial => write!(f, "financial"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "payment_types" => Ok(Self::PaymentTypes),
            "financial" => Ok(Self::Financial),
            "full" => Ok(Self::Full),
            _ => Err(ReportError::UnknownReportKind(s.to_string())),
        }
    }
}

/// Record filters. An empty ID set does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Keep only these machines.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub machine_ids: BTreeSet<MachineId>,
    /// Keep only these products.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub product_ids: BTreeSet<ProductId>,
    /// Keep only machines at these locations.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub location_ids: BTreeSet<LocationId>,
    /// Keep TEST dispenses.
    #[serde(default)]
    pub include_test_orders: bool,
}

impl ReportFilters {
    /// Returns true if the record passes every ID filter.
    ///
    /// A record missing a key never passes a filter on that key.
    #[must_use]
    pub fn matches_keys(&self, record: &TransactionRecord) -> bool {
        fn passes<K: Ord>(set: &BTreeSet<K>, key: Option<&K>) -> bool {
            set.is_empty() || key.is_some_and(|k| set.contains(k))
        }

        passes(&self.machine_ids, record.machine.id.as_ref())
            && passes(&self.product_ids, record.product.id.as_ref())
            && passes(&self.location_ids, record.machine.location_id.as_ref())
    }

    /// Returns true if the record is a TEST dispense this request drops.
    #[must_use]
    pub fn drops_test(&self, record: &TransactionRecord) -> bool {
        !self.include_test_orders && record.payment_type == PaymentType::Test
    }
}

/// A report generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Organization the transactions belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Reporting period.
    pub period: Period,
    /// Structures to build.
    pub kind: ReportKind,
    /// Record filters.
    #[serde(default)]
    pub filters: ReportFilters,
}

impl ReportRequest {
    /// Creates an unfiltered request.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate, kind: ReportKind) -> Self {
        Self {
            organization_id: None,
            period: Period::new(from, to),
            kind,
            filters: ReportFilters::default(),
        }
    }

    /// Sets the organization.
    #[must_use]
    pub fn with_organization(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Sets the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: ReportFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Record counts describing input quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Records handed to the engine.
    pub received_records: u64,
    /// Records rejected by normalization.
    pub rejected_records: u64,
    /// Records outside the period or filters.
    pub filtered_out: u64,
    /// TEST dispenses dropped because the request excludes them.
    pub test_orders_excluded: u64,
    /// Records the report was built from.
    pub included_records: u64,
    /// Included records without a machine ID.
    pub missing_machine: u64,
    /// Included records without a product ID.
    pub missing_product: u64,
}

/// Report metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report ID.
    pub report_id: ReportId,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
    /// Document schema version.
    pub schema_version: String,
    /// Organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Reporting period.
    pub period: Period,
    /// Structures included.
    pub report_kind: ReportKind,
    /// Applied filters.
    pub filters: ReportFilters,
    /// Whether TEST dispenses were kept.
    pub include_test_orders: bool,
    /// Settlement source label.
    pub settlement_source: String,
    /// Whether settlement totals are an approximation.
    pub settlement_approximated: bool,
    /// Input quality counters.
    pub data_quality: DataQuality,
}

/// The generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Metadata.
    pub metadata: ReportMetadata,
    /// Payment-type report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_types: Option<PaymentTypesReport>,
    /// Financial report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial: Option<FinancialReport>,
    /// Cross analytics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<CrossAnalytics>,
}
