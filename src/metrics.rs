//! Risk and structural metrics over a compiled network.
//!
//! Every value is computed over non-dummy activities only, and the whole set
//! is produced at once as a [`MetricsSnapshot`].
//!
//! Severity buckets score linearly (`Negligible` 0, `Low` 1/3, `Medium` 2/3,
//! `High` 1) and carry the Fibonacci weights 0, 1, 3 and 8. Geometric variants
//! use the same inputs as their arithmetic counterparts; a single zero term
//! makes the geometric mean 0.

use crate::activity::{Severity, SeverityMap};
use crate::compilation::CompiledGraph;
use crate::graph::DependentActivity;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum MetricsUnavailable {
    #[error("the activity network did not compile")]
    InvalidGraph,
    #[error("the activity network has no scorable activities")]
    NoActivities,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Share of activities on the critical path.
    pub criticality: f64,
    pub fibonacci: Option<f64>,
    /// Duration-weighted mean severity score.
    pub activity: Option<f64>,
    pub activity_std_dev_correction: Option<f64>,
    pub geometric_criticality: f64,
    pub geometric_fibonacci: Option<f64>,
    pub geometric_activity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub risk: RiskMetrics,
    pub cyclomatic_complexity: i64,
    pub duration: i64,
    pub duration_man_months: f64,
}

struct Scored<'a> {
    activity: &'a DependentActivity,
    severity: Severity,
}

/// Scores a compiled network. Invalid graphs produce no values at all.
pub fn metrics(
    compiled: &CompiledGraph,
    severities: &SeverityMap,
) -> Result<MetricsSnapshot, MetricsUnavailable> {
    let (Some(duration), Some(cyclomatic_complexity)) =
        (compiled.duration(), compiled.cyclomatic_complexity())
    else {
        return Err(MetricsUnavailable::InvalidGraph);
    };

    let activities: Vec<&DependentActivity> = compiled
        .activities()
        .iter()
        .filter(|a| !a.is_dummy())
        .collect();
    if activities.is_empty() {
        return Err(MetricsUnavailable::NoActivities);
    }

    let (criticality, geometric_criticality) = criticality_risk(&activities);

    // Severity-based metrics need a classification for every activity.
    let scored: Option<Vec<Scored<'_>>> = activities
        .iter()
        .map(|&activity| {
            severities.get(&activity.id()).map(|&severity| Scored {
                activity,
                severity,
            })
        })
        .collect();

    let (fibonacci, geometric_fibonacci) = match &scored {
        Some(scored) => {
            let (arith, geo) = fibonacci_risk(scored);
            (Some(arith), Some(geo))
        }
        None => (None, None),
    };
    let (activity, activity_std_dev_correction, geometric_activity) = match &scored {
        Some(scored) => activity_risk(scored),
        None => (None, None, None),
    };

    if scored.is_none() {
        debug!(
            activities = activities.len(),
            classified = severities.len(),
            "severity-based risk metrics unavailable"
        );
    }

    Ok(MetricsSnapshot {
        risk: RiskMetrics {
            criticality,
            fibonacci,
            activity,
            activity_std_dev_correction,
            geometric_criticality,
            geometric_fibonacci,
            geometric_activity,
        },
        cyclomatic_complexity,
        duration,
        duration_man_months: compiled.calendar().duration_to_man_months(duration),
    })
}

fn criticality_risk(activities: &[&DependentActivity]) -> (f64, f64) {
    let critical = activities.iter().filter(|a| a.is_critical()).count();
    let arith = critical as f64 / activities.len() as f64;
    // geometric mean of 0/1 indicators
    let geo = if critical == activities.len() { 1.0 } else { 0.0 };
    (arith, geo)
}

fn fibonacci_risk(scored: &[Scored<'_>]) -> (f64, f64) {
    let max_weight = Severity::max_fibonacci_weight();
    let weights: Vec<f64> = scored
        .iter()
        .map(|s| s.severity.fibonacci_weight())
        .collect();
    let n = weights.len() as f64;

    let arith = weights.iter().sum::<f64>() / (n * max_weight);
    let geo = geometric_mean(weights.iter().map(|&w| (w, 1.0))).unwrap_or(0.0) / max_weight;
    (arith, geo)
}

fn activity_risk(scored: &[Scored<'_>]) -> (Option<f64>, Option<f64>, Option<f64>) {
    let total_duration: f64 = scored.iter().map(|s| s.activity.duration() as f64).sum();
    if total_duration == 0.0 {
        return (None, None, None);
    }

    let mean = scored
        .iter()
        .map(|s| s.activity.duration() as f64 * s.severity.score())
        .sum::<f64>()
        / total_duration;

    let scores: Vec<f64> = scored.iter().map(|s| s.severity.score()).collect();
    let corrected = (mean + population_std_dev(&scores)).clamp(0.0, 1.0);

    let geo = geometric_mean(
        scored
            .iter()
            .map(|s| (s.severity.score(), s.activity.duration() as f64)),
    );

    (Some(mean), Some(corrected), geo)
}

/// Weighted geometric mean of `(value, weight)` pairs. Zero-weight terms drop
/// out; any zero value with positive weight yields 0. `None` if the weights
/// sum to zero.
fn geometric_mean<I>(terms: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut weight_sum = 0.0;
    let mut log_sum = 0.0;
    let mut has_zero = false;
    for (value, weight) in terms {
        if weight <= 0.0 {
            continue;
        }
        weight_sum += weight;
        if value <= 0.0 {
            has_zero = true;
        } else {
            log_sum += weight * value.ln();
        }
    }
    if weight_sum == 0.0 {
        return None;
    }
    if has_zero {
        return Some(0.0);
    }
    Some((log_sum / weight_sum).exp())
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn geometric_mean_collapses_on_zero() {
        assert_eq!(geometric_mean([(0.5, 1.0), (0.0, 1.0)]), Some(0.0));
    }

    #[test]
    fn geometric_mean_ignores_zero_weight_terms() {
        let mean = geometric_mean([(0.0, 0.0), (0.25, 1.0), (1.0, 1.0)]).unwrap();
        assert_abs_diff_eq!(mean, 0.5, epsilon = 1e-12);
        assert_eq!(geometric_mean([(0.3, 0.0)]), None);
    }

    #[test]
    fn std_dev_is_population_form() {
        assert_abs_diff_eq!(population_std_dev(&[0.0, 1.0]), 0.5, epsilon = 1e-12);
        assert_eq!(population_std_dev(&[]), 0.0);
    }
}
