//! Single-pass dimensional aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use vendora_shared::types::{MachineId, ProductId};

use super::bucket::Bucket;
use crate::transaction::{MachineRef, PaymentType, ProductRef, TransactionRecord};

/// Days in the weekday dimension.
pub const WEEKDAYS: usize = 7;

/// Hours in the hour dimension.
pub const HOURS: usize = 24;

/// Weekday names by Sunday-based index.
pub const WEEKDAY_NAMES: [&str; WEEKDAYS] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Sunday-based weekday indices in Monday-first order.
pub const MONDAY_FIRST: [usize; WEEKDAYS] = [1, 2, 3, 4, 5, 6, 0];

/// Buckets keyed along the seven report dimensions.
///
/// Generic over the bucket type so every report structure reuses the same
/// pass with its own accumulator. Keyed maps are ordered, so iteration never
/// depends on input order.
#[derive(Debug, Clone, Default)]
pub struct Dimensions<B> {
    /// Bucket over every record.
    pub total: B,
    /// By payment type.
    pub by_payment_type: BTreeMap<PaymentType, B>,
    /// By machine. Records without a machine ID are left out.
    pub by_machine: BTreeMap<MachineId, B>,
    /// By product. Records without a product ID are left out.
    pub by_product: BTreeMap<ProductId, B>,
    /// By `YYYY-MM` month key.
    pub by_month: BTreeMap<String, B>,
    /// By weekday, index 0 = Sunday.
    pub by_weekday: [B; WEEKDAYS],
    /// By calendar date.
    pub by_date: BTreeMap<NaiveDate, B>,
    /// By hour of day.
    pub by_hour: [B; HOURS],
    /// Machine labels seen in the pass.
    pub machines: BTreeMap<MachineId, MachineRef>,
    /// Product labels seen in the pass.
    pub products: BTreeMap<ProductId, ProductRef>,
    /// Records excluded from `by_machine`.
    pub unkeyed_machines: u64,
    /// Records excluded from `by_product`.
    pub unkeyed_products: u64,
}

impl<B: Default> Dimensions<B> {
    /// Folds every record into each dimension in one pass.
    ///
    /// `fold` is applied once per dimension a record lands in.
    pub fn build<'a, I, F>(records: I, mut fold: F) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
        F: FnMut(&mut B, &TransactionRecord),
    {
        Self::build_with(
            records,
            |_| (),
            |bucket: &mut B, record: &TransactionRecord, (): ()| fold(bucket, record),
        )
    }

    /// Like [`Dimensions::build`], but derives one value per record up front
    /// and hands it to every fold of that record.
    pub fn build_with<'a, I, T, D, F>(records: I, mut derive: D, mut fold: F) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
        T: Copy,
        D: FnMut(&TransactionRecord) -> T,
        F: FnMut(&mut B, &TransactionRecord, T),
    {
        let mut dims = Self::default();
        for record in records {
            let value = derive(record);
            dims.push(record, &mut |bucket: &mut B, record: &TransactionRecord| {
                fold(bucket, record, value);
            });
        }
        dims
    }

    fn push<F>(&mut self, record: &TransactionRecord, fold: &mut F)
    where
        F: FnMut(&mut B, &TransactionRecord),
    {
        fold(&mut self.total, record);
        fold(self.by_payment_type.entry(record.payment_type).or_default(), record);
        fold(self.by_month.entry(record.month_key()).or_default(), record);
        fold(&mut self.by_weekday[record.weekday_index()], record);
        fold(self.by_date.entry(record.date()).or_default(), record);
        fold(&mut self.by_hour[record.hour()], record);

        match record.machine.id {
            Some(id) => {
                fold(self.by_machine.entry(id).or_default(), record);
                merge_machine(self.machines.entry(id).or_default(), &record.machine);
            }
            None => self.unkeyed_machines += 1,
        }

        match record.product.id {
            Some(id) => {
                fold(self.by_product.entry(id).or_default(), record);
                merge_product(self.products.entry(id).or_default(), &record.product);
            }
            None => self.unkeyed_products += 1,
        }
    }
}

impl<B> Dimensions<B> {
    /// Display label and address for a machine.
    ///
    /// Falls back to the ID when the join produced no machine code.
    #[must_use]
    pub fn machine_label(&self, id: &MachineId) -> (String, Option<String>) {
        match self.machines.get(id) {
            Some(machine) if !machine.code.is_empty() => (
                machine.code.clone(),
                Some(machine.address.clone()).filter(|a| !a.is_empty()),
            ),
            _ => (id.to_string(), None),
        }
    }

    /// Display label and category for a product.
    ///
    /// Falls back to the ID when the join produced no product name.
    #[must_use]
    pub fn product_label(&self, id: &ProductId) -> (String, Option<String>) {
        match self.products.get(id) {
            Some(product) if !product.name.is_empty() => (
                product.name.clone(),
                Some(product.category.clone()).filter(|c| !c.is_empty()),
            ),
            _ => (id.to_string(), None),
        }
    }
}

/// Builds the plain count/amount dimensions.
pub struct Aggregator;

impl Aggregator {
    /// Aggregates records into count/amount buckets.
    pub fn aggregate<'a, I>(records: I) -> Dimensions<Bucket>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        Dimensions::build(records, Bucket::add)
    }
}

// Label merging keeps the smallest non-empty value so the outcome does not
// depend on which record was seen first.
fn prefer(current: &mut String, candidate: &str) {
    if candidate.is_empty() {
        return;
    }
    if current.is_empty() || candidate < current.as_str() {
        *current = candidate.to_string();
    }
}

fn merge_machine(current: &mut MachineRef, seen: &MachineRef) {
    current.id = current.id.or(seen.id);
    prefer(&mut current.code, &seen.code);
    prefer(&mut current.address, &seen.address);
    current.location_id = match (current.location_id, seen.location_id) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
}

fn merge_product(current: &mut ProductRef, seen: &ProductRef) {
    current.id = current.id.or(seen.id);
    prefer(&mut current.name, &seen.name);
    prefer(&mut current.category, &seen.category);
}
