use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use statrs::statistics::Statistics;

/// One-way ANOVA of a numeric column against a binary label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnovaScore {
    /// F-statistic; `inf` for perfect separation, `NaN` when undefined.
    pub f_statistic: f64,
    /// Upper-tail probability of `f_statistic` under F(1, n - 2).
    pub p_value: f64,
}

/// Shared statistics utilities for feature scoring and scaling.
pub struct Stats;

impl Stats {
    /// ANOVA F-test of `values` grouped by `labels` (0/1).
    ///
    /// Missing values (`NaN`) are skipped together with their label.
    pub fn anova_f(values: &[f64], labels: &[u8]) -> AnovaScore {
        let mut count = [0usize; 2];
        let mut sum = [0.0f64; 2];
        for (&v, &label) in values.iter().zip(labels) {
            if v.is_nan() {
                continue;
            }
            let g = usize::from(label == 1);
            count[g] += 1;
            sum[g] += v;
        }

        let n = count[0] + count[1];
        if count[0] == 0 || count[1] == 0 || n < 3 {
            return AnovaScore {
                f_statistic: f64::NAN,
                p_value: f64::NAN,
            };
        }

        let group_mean = [sum[0] / count[0] as f64, sum[1] / count[1] as f64];
        let grand_mean = (sum[0] + sum[1]) / n as f64;

        let ss_between: f64 = (0..2)
            .map(|g| count[g] as f64 * (group_mean[g] - grand_mean).powi(2))
            .sum();
        let ss_within: f64 = values
            .iter()
            .zip(labels)
            .filter(|(v, _)| !v.is_nan())
            .map(|(&v, &label)| (v - group_mean[usize::from(label == 1)]).powi(2))
            .sum();

        let df_within = (n - 2) as f64;
        let f_statistic = if ss_within > 0.0 {
            ss_between / (ss_within / df_within)
        } else if ss_between > 0.0 {
            f64::INFINITY
        } else {
            f64::NAN
        };

        AnovaScore {
            f_statistic,
            p_value: Self::f_upper_tail(f_statistic, df_within),
        }
    }

    fn f_upper_tail(f_statistic: f64, df_within: f64) -> f64 {
        if f_statistic.is_nan() {
            return f64::NAN;
        }
        if f_statistic.is_infinite() {
            return 0.0;
        }
        match FisherSnedecor::new(1.0, df_within) {
            Ok(dist) => dist.sf(f_statistic),
            Err(_) => f64::NAN,
        }
    }

    /// Mean and population standard deviation of a column.
    pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0);
        }
        let mean = values.iter().mean();
        let variance = values.iter().population_variance();
        (mean, variance.max(0.0).sqrt())
    }

    /// True when the column holds at most one distinct non-missing value.
    pub fn is_constant(values: impl IntoIterator<Item = f64>) -> bool {
        let mut first: Option<f64> = None;
        for v in values.into_iter().filter(|v| !v.is_nan()) {
            match first {
                None => first = Some(v),
                Some(f) if f != v => return false,
                Some(_) => {}
            }
        }
        true
    }
}
