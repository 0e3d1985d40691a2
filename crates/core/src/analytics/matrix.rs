//! Product by machine cross-analysis.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendora_shared::types::{MachineId, ProductId};

use crate::aggregation::{Bucket, Dimensions};
use crate::transaction::TransactionRecord;

/// One row or column heading of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixAxis {
    /// Product or machine ID.
    pub key: String,
    /// Product name or machine code.
    pub label: String,
    /// Transactions over the period.
    pub count: u64,
    /// Amount over the period.
    pub amount: Decimal,
}

/// Transaction counts for the top products across the top machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossMatrix {
    /// Top products, one per row.
    pub products: Vec<MatrixAxis>,
    /// Top machines, one per column.
    pub machines: Vec<MatrixAxis>,
    /// `cells[i][j]` counts transactions of product `i` on machine `j`.
    pub cells: Vec<Vec<u64>>,
}

impl CrossMatrix {
    /// Builds the matrix for the `top_k` products and machines by count.
    #[must_use]
    pub fn build(
        records: &[&TransactionRecord],
        dims: &Dimensions<Bucket>,
        top_k: usize,
    ) -> Self {
        let products = top(&dims.by_product, top_k, |id| dims.product_label(id).0);
        let machines = top(&dims.by_machine, top_k, |id| dims.machine_label(id).0);

        let mut pairs: HashMap<(ProductId, MachineId), u64> = HashMap::new();
        for record in records {
            if let (Some(product), Some(machine)) = (record.product.id, record.machine.id) {
                *pairs.entry((product, machine)).or_default() += 1;
            }
        }

        let cells = products
            .iter()
            .map(|(product, _)| {
                machines
                    .iter()
                    .map(|(machine, _)| pairs.get(&(*product, *machine)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            products: products.into_iter().map(|(_, axis)| axis).collect(),
            machines: machines.into_iter().map(|(_, axis)| axis).collect(),
            cells,
        }
    }
}

// Count desc, then amount desc, then label asc, then ID asc.
fn top<K, F>(buckets: &BTreeMap<K, Bucket>, k: usize, label: F) -> Vec<(K, MatrixAxis)>
where
    K: Copy + Ord + ToString,
    F: Fn(&K) -> String,
{
    let mut ranked: Vec<(K, MatrixAxis)> = buckets
        .iter()
        .map(|(id, bucket)| {
            (
                *id,
                MatrixAxis {
                    key: id.to_string(),
                    label: label(id),
                    count: bucket.count,
                    amount: bucket.amount,
                },
            )
        })
        .collect();

    ranked.sort_by(|(id_a, a), (id_b, b)| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.amount.cmp(&a.amount))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| id_a.cmp(id_b))
    });
    ranked.truncate(k);
    ranked
}
