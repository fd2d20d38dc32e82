// Frequency distribution and per-category rate summaries for one
// categorical column (billing class, contract type).
use crate::stats::{mean, median, sample_std};
use crate::types::{Column, Dataset};
use crate::util::round2;
use serde::Serialize;
use std::collections::HashMap;

/// Rate figures for one category, each rounded to 2 decimals.
/// `std_dev` is `None` below two observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRateStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
    pub rates: Option<CategoryRateStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub column: &'static str,
    pub total: usize,
    pub entries: Vec<CategoryCount>,
}

impl CategoryDistribution {
    pub fn get(&self, value: &str) -> Option<&CategoryCount> {
        self.entries.iter().find(|e| e.value == value)
    }
}

/// Value counts for `column` over every record, most frequent first.
///
/// Ties keep first-appearance order. Percentages use the full record count
/// as denominator, whether or not a record has a rate.
pub fn category_distribution(data: &Dataset, column: Column) -> CategoryDistribution {
    struct Acc {
        value: String,
        count: usize,
        rates: Vec<f64>,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in data.records() {
        let Some(value) = r.category(column) else { continue };
        let slot = *index.entry(value).or_insert_with(|| {
            groups.push(Acc {
                value: value.to_string(),
                count: 0,
                rates: vec![],
            });
            groups.len() - 1
        });
        let acc = &mut groups[slot];
        acc.count += 1;
        if let Some(rate) = r.negotiated_rate {
            acc.rates.push(rate);
        }
    }

    // Stable: equal counts stay in first-seen order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let total = data.len();
    let entries = groups
        .into_iter()
        .map(|acc| CategoryCount {
            percentage: share(acc.count, total),
            rates: rate_stats(&acc.rates),
            value: acc.value,
            count: acc.count,
        })
        .collect();

    CategoryDistribution {
        column: column.header(),
        total,
        entries,
    }
}

fn rate_stats(rates: &[f64]) -> Option<CategoryRateStats> {
    Some(CategoryRateStats {
        mean: round2(mean(rates)?),
        median: round2(median(rates)?),
        std_dev: sample_std(rates).map(round2),
        count: rates.len(),
    })
}

pub(crate) fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}
