use serde::Serialize;

use super::distribution::PointDistribution;

/// One row of a distribution preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementPreview {
    /// 1-based placement
    pub placement: u32,
    /// Points, rounded to 2 decimals
    pub points: f64,
    /// Running share of the adjusted pool in percent, rounded to 2 decimals
    pub cumulative: f64,
}

/// Build the placement/points/cumulative table shown when simulating payouts.
pub fn preview_distribution(distribution: &PointDistribution) -> Vec<PlacementPreview> {
    let total = distribution.adjusted_total_points;
    let mut running = 0.0;

    distribution
        .points
        .iter()
        .zip(1u32..)
        .map(|(&value, placement)| {
            running += value;
            let cumulative = if total > 0.0 {
                running / total * 100.0
            } else {
                0.0
            };
            PlacementPreview {
                placement,
                points: round2(value),
                cumulative: round2(cumulative),
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
