use super::energy::EnergyMetrics;
use super::occupancy::OccupancyMetrics;
use crate::config::AnalysisConstants;
use crate::util::{average, ratio};
use serde::Serialize;

/// Pearson correlation coefficient of two equal-length sequences.
///
/// Returns `None` when the coefficient is undefined: mismatched lengths,
/// fewer than two points, a non-finite value, or a constant input.
pub fn correlate(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return None;
    }
    if is_constant(x) || is_constant(y) {
        return None;
    }
    let mean_x = average(x);
    let mean_y = average(y);
    let (mut sxy, mut sxx, mut syy) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom <= 0.0 {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

fn is_constant(v: &[f64]) -> bool {
    v.windows(2).all(|w| w[0] == w[1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    pub fn of(r: f64) -> Self {
        let m = r.abs();
        if m > 0.5 {
            CorrelationStrength::Strong
        } else if m > 0.3 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    /// Short phrase such as `"strong negative"` or `"weak"`.
    pub fn describe(r: f64) -> String {
        match Self::of(r) {
            CorrelationStrength::Weak => "weak".to_string(),
            strength => {
                let sign = if r < 0.0 { "negative" } else { "positive" };
                let word = match strength {
                    CorrelationStrength::Strong => "strong",
                    _ => "moderate",
                };
                format!("{word} {sign}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMetrics {
    pub electricity: Option<f64>,
    pub gas: Option<f64>,
    pub water: Option<f64>,
    pub sample_size: usize,
    /// Set when `sample_size` is below the configured robust minimum.
    pub small_sample: bool,
    pub occupancy_rate: f64,
    pub idle_conditioning_cost: f64,
    pub electricity_per_swipe: Option<f64>,
    pub water_per_swipe: Option<f64>,
}

pub fn correlation_metrics(
    occupancy: &OccupancyMetrics,
    energy: &EnergyMetrics,
    constants: &AnalysisConstants,
) -> CorrelationMetrics {
    let swipes = occupancy.monthly_series();
    let series = &energy.series;
    let sample_size = swipes.len().min(series.len());

    let building = &constants.building;
    let capacity = building.headcount as f64 * building.working_days_per_month;
    let occupancy_rate = ratio(occupancy.mean_monthly_swipes, capacity)
        .map(|r| r * 100.0)
        .unwrap_or(0.0);
    let idle_share = ((100.0 - occupancy_rate) / 100.0).max(0.0);
    let annual_electricity_cost = energy.annual.electricity_kwh * constants.prices.electricity_per_kwh;

    let mean_swipes = average(&swipes);
    CorrelationMetrics {
        electricity: correlate(&swipes, &series.electricity_kwh),
        gas: correlate(&swipes, &series.gas_ccf),
        water: correlate(&swipes, &series.water_gal),
        sample_size,
        small_sample: sample_size < constants.min_robust_sample,
        occupancy_rate,
        idle_conditioning_cost: idle_share * constants.prices.hvac_share * annual_electricity_cost,
        electricity_per_swipe: ratio(average(&series.electricity_kwh), mean_swipes),
        water_per_swipe: ratio(average(&series.water_gal), mean_swipes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn perfect_positive_relation() {
        assert_eq!(correlate(&[10.0, 20.0], &[10.0, 20.0]), Some(1.0));
    }

    #[test]
    fn perfect_negative_relation() {
        let r = correlate(&[1.0, 2.0, 3.0], &[9.0, 6.0, 3.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_input_is_undefined() {
        assert_eq!(correlate(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(correlate(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1]), None);
    }

    #[test]
    fn mismatched_or_tiny_input_is_undefined() {
        assert_eq!(correlate(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(correlate(&[1.0], &[1.0]), None);
        assert_eq!(correlate(&[], &[]), None);
        assert_eq!(correlate(&[1.0, f64::NAN], &[1.0, 2.0]), None);
    }

    #[test]
    fn known_coefficient() {
        // Hand-computed: r = 0.8 for this pair.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = correlate(&x, &y).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn strength_wording() {
        assert_eq!(CorrelationStrength::describe(0.72), "strong positive");
        assert_eq!(CorrelationStrength::describe(-0.62), "strong negative");
        assert_eq!(CorrelationStrength::describe(0.35), "moderate positive");
        assert_eq!(CorrelationStrength::describe(-0.1), "weak");
    }

    proptest! {
        #[test]
        fn coefficient_is_bounded(
            pairs in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 2..40)
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            if let Some(r) = correlate(&x, &y) {
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }

        #[test]
        fn constant_side_is_always_undefined(
            c in -1e6f64..1e6,
            y in prop::collection::vec(-1e6f64..1e6, 2..40)
        ) {
            let x = vec![c; y.len()];
            prop_assert_eq!(correlate(&x, &y), None);
            prop_assert_eq!(correlate(&y, &x), None);
        }
    }
}
