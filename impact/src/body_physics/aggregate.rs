/// Secondary weight for resistances.
pub const FORCE_WEIGHT: f32 = 0.5;
/// Secondary weight for risks.
pub const RISK_WEIGHT: f32 = 0.65;

/// `max + weight * mean(values below max)`, clamped to `1`.
///
/// Every value equal to the maximum counts as "the maximum" and is left out
/// of the mean. Empty input yields `0`.
pub fn dominant_sum(values: &[f32], weight: f32) -> f32 {
    let Some(max) = values.iter().copied().reduce(f32::max) else {
        return 0.0;
    };
    let (sum, n) = values
        .iter()
        .filter(|v| **v != max)
        .fold((0.0_f32, 0_u32), |(s, n), v| (s + v, n + 1));
    let rest = if n > 0 { sum / n as f32 } else { 0.0 };
    (max + rest * weight).min(1.0)
}

pub fn calculate_total_force(values: &[f32]) -> f32 {
    dominant_sum(values, FORCE_WEIGHT)
}

pub fn calculate_total_risk(values: &[f32]) -> f32 {
    dominant_sum(values, RISK_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn single_value_passes_through() {
        assert!((calculate_total_force(&[0.8]) - 0.8).abs() < EPS);
    }

    #[test]
    fn secondary_values_add_half_their_mean() {
        let v = calculate_total_force(&[0.8, 0.4, 0.2]);
        assert!((v - 0.95).abs() < EPS, "got {v}");
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(calculate_total_force(&[]), 0.0);
        assert_eq!(calculate_total_risk(&[]), 0.0);
    }

    #[test]
    fn ties_with_the_maximum_are_not_averaged() {
        assert!((calculate_total_force(&[0.5, 0.5]) - 0.5).abs() < EPS);
        assert!((calculate_total_force(&[0.5, 0.5, 0.2]) - 0.6).abs() < EPS);
    }

    #[test]
    fn risk_uses_heavier_secondary_weight_and_clamps() {
        assert!((calculate_total_risk(&[0.4, 0.2]) - 0.53).abs() < EPS);
        assert_eq!(calculate_total_risk(&[0.9, 0.8, 0.7]), 1.0);
    }

    #[test]
    fn results_stay_in_unit_range() {
        let samples: [&[f32]; 5] = [&[0.0], &[1.0, 1.0, 1.0], &[0.0, 0.0, 1.0], &[0.3, 0.9, 0.9, 0.1], &[0.05; 8]];
        for s in samples {
            for v in [calculate_total_force(s), calculate_total_risk(s)] {
                assert!((0.0..=1.0).contains(&v), "{s:?} -> {v}");
            }
        }
    }
}
