// Per-city counts and rate figures.
//
// `city_stats` is the canonical ranking; the chart subset is always a prefix
// of it.
use crate::categories::share;
use crate::stats::{mean, median};
use crate::types::Dataset;
use crate::util::truncate_display;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStat {
    pub city: String,
    pub count: usize,
    pub percentage: f64,
    pub avg_rate: Option<f64>,
    pub median_rate: Option<f64>,
}

/// One row per distinct city (exact string match), most providers first.
/// Ties keep first-appearance order.
pub fn city_stats(data: &Dataset) -> Vec<CityStat> {
    #[derive(Default)]
    struct Acc<'a> {
        city: &'a str,
        count: usize,
        rates: Vec<f64>,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in data.records() {
        let Some(city) = r.city.as_deref() else { continue };
        let slot = *index.entry(city).or_insert_with(|| {
            groups.push(Acc {
                city,
                ..Acc::default()
            });
            groups.len() - 1
        });
        groups[slot].count += 1;
        if let Some(rate) = r.negotiated_rate {
            groups[slot].rates.push(rate);
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let total = data.len();
    groups
        .into_iter()
        .map(|acc| CityStat {
            city: acc.city.to_string(),
            count: acc.count,
            percentage: share(acc.count, total),
            avg_rate: mean(&acc.rates),
            median_rate: median(&acc.rates),
        })
        .collect()
}

/// The first `limit` entries of the ranking, in ranking order.
pub fn top_cities(ranking: &[CityStat], limit: usize) -> &[CityStat] {
    &ranking[..ranking.len().min(limit)]
}

/// Average rate for one city, computed straight from the records.
pub fn city_chart_average(data: &Dataset, city: &str) -> Option<f64> {
    let rates: Vec<f64> = data
        .records()
        .iter()
        .filter(|r| r.city.as_deref() == Some(city))
        .filter_map(|r| r.negotiated_rate)
        .collect();
    mean(&rates)
}

pub fn display_city_name(city: &str, max_chars: usize) -> String {
    truncate_display(city, max_chars)
}
