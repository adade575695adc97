use serde::Serialize;
use tracing::{debug, trace};

use super::config::{
    RankingConfig, TournamentType, TournamentTypeConfig, EXTRA_POINTS_PER_PERSON,
    PERCENT_FOR_FIRST_PLACE, PERCENT_RECEIVING_POINTS,
};
use crate::error::RankingError;

/// Search interval for the decay exponent.
const ALPHA_LOWER: f64 = 0.0;
const ALPHA_UPPER: f64 = 3.0;

/// Inputs to one payout calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionRequest {
    pub baseline_points: f64,
    pub num_players: u32,
    pub tournament_type: TournamentType,
    pub first_place_fraction: f64,
    pub receiving_fraction: f64,
    pub extra_per_player: f64,
}

impl DistributionRequest {
    /// Request with the stock coefficients (15% to first, half the field paid, +20 per player).
    pub fn new(baseline_points: f64, num_players: u32, tournament_type: TournamentType) -> Self {
        Self {
            baseline_points,
            num_players,
            tournament_type,
            first_place_fraction: PERCENT_FOR_FIRST_PLACE,
            receiving_fraction: PERCENT_RECEIVING_POINTS,
            extra_per_player: EXTRA_POINTS_PER_PERSON,
        }
    }

    /// Request using a season's coefficients for `tournament_type`.
    pub fn for_type(
        config: &TournamentTypeConfig,
        tournament_type: TournamentType,
        num_players: u32,
    ) -> Self {
        Self {
            baseline_points: config.baseline_points,
            num_players,
            tournament_type,
            first_place_fraction: config.first_place_fraction,
            receiving_fraction: config.receiving_fraction,
            extra_per_player: config.points_per_player,
        }
    }

    /// Reject inputs that have no meaningful payout. Never clamps.
    pub fn validate(&self) -> Result<(), RankingError> {
        if !self.baseline_points.is_finite() || self.baseline_points < 0.0 {
            return Err(RankingError::invalid(
                "baseline_points",
                format!("must be a non-negative number, got {}", self.baseline_points),
            ));
        }
        check_fraction("first_place_fraction", self.first_place_fraction)?;
        check_fraction("receiving_fraction", self.receiving_fraction)?;
        if !self.extra_per_player.is_finite() || self.extra_per_player < 0.0 {
            return Err(RankingError::invalid(
                "extra_per_player",
                format!("must be a non-negative number, got {}", self.extra_per_player),
            ));
        }
        Ok(())
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), RankingError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(RankingError::invalid(
            field,
            format!("must be in (0, 1], got {}", value),
        ))
    }
}

/// Per-placement payout for one tournament. Index 0 is first place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDistribution {
    pub points: Vec<f64>,
    pub adjusted_total_points: f64,
    /// Calibrated decay exponent; `None` when no search ran
    pub alpha: Option<f64>,
}

impl PointDistribution {
    pub fn total(&self) -> f64 {
        self.points.iter().sum()
    }

    /// Points for a 1-based placement, 0 outside the paid field.
    pub fn points_for_placement(&self, placement: u32) -> f64 {
        placement
            .checked_sub(1)
            .and_then(|index| self.points.get(index as usize))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Calculate how a tournament's beans are split across its field.
///
/// Winner-take-all types pay the whole baseline to first place. Fields below
/// the type's legal minimum pay nothing. Otherwise first place gets a fixed
/// share of the adjusted pool and the paid placements decay as `first / i^alpha`,
/// with `alpha` found by bisection so the payout lands on the pool.
pub fn calculate_point_distribution(
    request: &DistributionRequest,
    ranking: &RankingConfig,
) -> Result<PointDistribution, RankingError> {
    request.validate()?;
    let threshold = ranking.convergence_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(RankingError::invalid(
            "convergence_threshold",
            format!("must be a positive number, got {}", threshold),
        ));
    }

    let rules = ranking.tournament(request.tournament_type);
    let num_players = request.num_players as usize;

    if rules.winner_take_all {
        let mut points = vec![0.0; num_players];
        if let Some(first) = points.first_mut() {
            *first = request.baseline_points;
        }
        return Ok(PointDistribution {
            points,
            adjusted_total_points: request.baseline_points,
            alpha: None,
        });
    }

    if request.num_players < rules.min_players_to_be_legal {
        debug!(
            tournament_type = %request.tournament_type,
            num_players = request.num_players,
            min_players = rules.min_players_to_be_legal,
            "field below legal minimum, no payout"
        );
        return Ok(PointDistribution {
            points: vec![0.0; num_players],
            adjusted_total_points: request.baseline_points,
            alpha: None,
        });
    }

    let adjusted_total_points =
        request.baseline_points + f64::from(request.num_players) * request.extra_per_player;
    let total_winners = ((f64::from(request.num_players) * request.receiving_fraction).ceil()
        as usize)
        .min(num_players);
    let first_place_points = adjusted_total_points * request.first_place_fraction;

    let mut points = Vec::with_capacity(num_players);
    let mut lower = ALPHA_LOWER;
    let mut upper = ALPHA_UPPER;
    let mut alpha;
    let mut iterations = 0u32;

    loop {
        alpha = (upper + lower) / 2.0;
        let sum = fill_payout_curve(
            &mut points,
            first_place_points,
            total_winners,
            num_players,
            alpha,
        );
        iterations += 1;
        trace!(alpha, sum, adjusted_total_points, "bisection step");

        // Too generous means the decay is too shallow.
        if sum > adjusted_total_points {
            lower = alpha;
        } else {
            upper = alpha;
        }
        if upper - lower <= threshold {
            break;
        }
    }

    debug!(
        tournament_type = %request.tournament_type,
        num_players = request.num_players,
        total_winners,
        adjusted_total_points,
        alpha,
        iterations,
        "calibrated point distribution"
    );

    Ok(PointDistribution {
        points,
        adjusted_total_points,
        alpha: Some(alpha),
    })
}

/// Overwrite `points` with the curve for `alpha` and return its sum.
fn fill_payout_curve(
    points: &mut Vec<f64>,
    first_place_points: f64,
    total_winners: usize,
    num_players: usize,
    alpha: f64,
) -> f64 {
    points.clear();
    let mut sum = 0.0;
    for i in 1..=num_players {
        let value = if i <= total_winners {
            first_place_points / (i as f64).powf(alpha)
        } else {
            0.0
        };
        points.push(value);
        sum += value;
    }
    sum
}
