//! Report generation service.

use chrono::Utc;
use tracing::{debug, info, warn};
use vendora_shared::config::EngineConfig;
use vendora_shared::types::ReportId;

use super::error::ReportError;
use super::types::{
    DataQuality, ReportDocument, ReportKind, ReportMetadata, ReportRequest, SCHEMA_VERSION,
};
use crate::analytics::AnalyticsBuilder;
use crate::finance::FinancialReportBuilder;
use crate::payments::{PaymentReportBuilder, SettlementSource};
use crate::transaction::{Normalizer, RawTransactionRecord, TransactionRecord};

/// Assembles report documents.
///
/// Holds only configuration. Every call builds fresh local state, so one
/// engine can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ReportEngine {
    config: EngineConfig,
}

impl ReportEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generates a report from raw transaction rows.
    ///
    /// Rows that fail normalization are skipped and counted in
    /// `metadata.data_quality.rejected_records`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if the period is inverted.
    /// Returns `ReportError::InvalidTopK` if the configured top-K is zero.
    pub fn generate(
        &self,
        request: &ReportRequest,
        raw_records: &[RawTransactionRecord],
        settlement: &dyn SettlementSource,
    ) -> Result<ReportDocument, ReportError> {
        self.validate(request)?;

        let batch = Normalizer::normalize_batch(raw_records);
        Ok(self.assemble(request, &batch.records, batch.rejected.len() as u64, settlement))
    }

    /// Generates a report from already-normalized transactions.
    ///
    /// # Errors
    ///
    /// Same as [`ReportEngine::generate`].
    pub fn generate_normalized(
        &self,
        request: &ReportRequest,
        records: &[TransactionRecord],
        settlement: &dyn SettlementSource,
    ) -> Result<ReportDocument, ReportError> {
        self.validate(request)?;
        Ok(self.assemble(request, records, 0, settlement))
    }

    fn validate(&self, request: &ReportRequest) -> Result<(), ReportError> {
        if !request.period.is_ordered() {
            return Err(ReportError::InvalidDateRange {
                start: request.period.from,
                end: request.period.to,
            });
        }
        if self.config.top_k == 0 {
            return Err(ReportError::InvalidTopK);
        }
        Ok(())
    }

    fn assemble(
        &self,
        request: &ReportRequest,
        records: &[TransactionRecord],
        rejected: u64,
        settlement: &dyn SettlementSource,
    ) -> ReportDocument {
        let (included, quality) = Self::filter(request, records, rejected);
        let period = &request.period;

        debug!(
            received = quality.received_records,
            included = quality.included_records,
            "Filtered transactions"
        );

        let (payment_types, financial, analytics) = match request.kind {
            ReportKind::PaymentTypes => (
                Some(PaymentReportBuilder::build(&included, settlement)),
                None,
                None,
            ),
            ReportKind::Financial => (
                None,
                Some(FinancialReportBuilder::build(
                    &included,
                    period,
                    &self.config.ingredients,
                )),
                None,
            ),
            ReportKind::Full => {
                let (payment_types, financial) = rayon::join(
                    || PaymentReportBuilder::build(&included, settlement),
                    || FinancialReportBuilder::build(&included, period, &self.config.ingredients),
                );
                let analytics =
                    AnalyticsBuilder::build(&included, &financial, settlement, period, &self.config);
                (Some(payment_types), Some(financial), Some(analytics))
            }
        };

        let report_id = ReportId::new();
        info!(
            report_id = %report_id,
            kind = %request.kind,
            records = quality.included_records,
            "Report generated"
        );

        ReportDocument {
            metadata: ReportMetadata {
                report_id,
                generated_at: Utc::now(),
                schema_version: SCHEMA_VERSION.to_string(),
                organization_id: request.organization_id,
                period: *period,
                report_kind: request.kind,
                filters: request.filters.clone(),
                include_test_orders: request.filters.include_test_orders,
                settlement_source: settlement.label().to_string(),
                settlement_approximated: settlement.is_approximation(),
                data_quality: quality,
            },
            payment_types,
            financial,
            analytics,
        }
    }

    fn filter(
        request: &ReportRequest,
        records: &[TransactionRecord],
        rejected: u64,
    ) -> (Vec<TransactionRecord>, DataQuality) {
        let mut quality = DataQuality {
            received_records: records.len() as u64 + rejected,
            rejected_records: rejected,
            ..DataQuality::default()
        };

        let mut included = Vec::with_capacity(records.len());
        for record in records {
            if !request.period.contains(record.date()) || !request.filters.matches_keys(record) {
                quality.filtered_out += 1;
                continue;
            }
            if request.filters.drops_test(record) {
                quality.test_orders_excluded += 1;
                continue;
            }
            if record.machine.id.is_none() {
                quality.missing_machine += 1;
            }
            if record.product.id.is_none() {
                quality.missing_product += 1;
            }
            included.push(record.clone());
        }
        quality.included_records = included.len() as u64;

        if quality.missing_machine > 0 || quality.missing_product > 0 {
            warn!(
                missing_machine = quality.missing_machine,
                missing_product = quality.missing_product,
                "Records without a dimension key are counted in totals only"
            );
        }
        if rejected > 0 {
            warn!(rejected, "Skipped records that failed normalization");
        }

        (included, quality)
    }
}
