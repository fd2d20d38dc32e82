// Descriptive statistics over the negotiated rate column.
//
// Everything here returns plain numbers; formatting happens in `reports`.
use serde::Serialize;
use std::cmp::Ordering;

/// Percentile levels reported for every rate summary, ascending.
pub const PERCENTILES: [u8; 5] = [25, 50, 75, 90, 95];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    pub p: u8,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub percentiles: Vec<PercentileValue>,
}

impl RateSummary {
    /// Summarize the non-missing values of `rates`. `None` when nothing is left.
    pub fn from_rates<I>(rates: I) -> Option<RateSummary>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let sorted = sorted_values(rates.into_iter().flatten());
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let percentiles = PERCENTILES
            .iter()
            .map(|&p| PercentileValue {
                p,
                value: quantile_sorted(&sorted, p as f64 / 100.0),
            })
            .collect();
        Some(RateSummary {
            count: sorted.len(),
            mean: mean(&sorted)?,
            median: quantile_sorted(&sorted, 0.5),
            min,
            max,
            range: max - min,
            percentiles,
        })
    }

    pub fn percentile(&self, p: u8) -> Option<f64> {
        self.percentiles.iter().find(|pv| pv.p == p).map(|pv| pv.value)
    }
}

fn sorted_values<I: Iterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut v: Vec<f64> = values.filter(|x| x.is_finite()).collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    v
}

pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(v.iter().sum::<f64>() / v.len() as f64)
}

pub fn median(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sorted = sorted_values(v.iter().copied());
    Some(quantile_sorted(&sorted, 0.5))
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std(v: &[f64]) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let m = mean(v)?;
    let ss: f64 = v.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (v.len() - 1) as f64).sqrt())
}

/// Linear-interpolation quantile, `q` in [0, 1].
pub fn quantile(v: &[f64], q: f64) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sorted = sorted_values(v.iter().copied());
    Some(quantile_sorted(&sorted, q))
}

// Position is q * (n - 1) between order statistics. `sorted` must be non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let w = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn five_value_example() {
        let rates = [100.0, 200.0, 300.0, 400.0, 500.0].map(Some);
        let s = RateSummary::from_rates(rates).unwrap();
        assert_eq!(s.count, 5);
        assert!(approx(s.mean, 300.0));
        assert!(approx(s.median, 300.0));
        assert!(approx(s.min, 100.0));
        assert!(approx(s.max, 500.0));
        assert!(approx(s.range, 400.0));
        assert!(approx(s.percentile(25).unwrap(), 200.0));
        assert!(approx(s.percentile(50).unwrap(), 300.0));
        assert!(approx(s.percentile(75).unwrap(), 400.0));
        assert!(approx(s.percentile(90).unwrap(), 460.0));
        assert!(approx(s.percentile(95).unwrap(), 480.0));
    }

    #[test]
    fn missing_values_are_dropped() {
        let s = RateSummary::from_rates(vec![None, Some(10.0), None, Some(30.0)]).unwrap();
        assert_eq!(s.count, 2);
        assert!(approx(s.mean, 20.0));
        assert!(approx(s.median, 20.0));
    }

    #[test]
    fn all_missing_gives_no_summary() {
        assert!(RateSummary::from_rates(vec![None, None]).is_none());
        assert!(RateSummary::from_rates(Vec::<Option<f64>>::new()).is_none());
    }

    #[test]
    fn single_value_collapses() {
        let s = RateSummary::from_rates(vec![Some(42.0)]).unwrap();
        assert_eq!(s.range, 0.0);
        assert!(s.percentiles.iter().all(|pv| pv.value == 42.0));
        assert_eq!(
            s.percentiles.iter().map(|pv| pv.p).collect::<Vec<_>>(),
            PERCENTILES.to_vec()
        );
    }

    #[test]
    fn unsorted_input_interpolates() {
        assert!(approx(quantile(&[4.0, 1.0, 3.0, 2.0], 0.5).unwrap(), 2.5));
        assert!(approx(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5));
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // mean 5, squared deviations sum 32, / 7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(sample_std(&v).unwrap(), (32.0f64 / 7.0).sqrt()));
        assert!(sample_std(&[1.0]).is_none());
    }
}
