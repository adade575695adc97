use std::collections::HashMap;
use std::sync::Arc;

use super::config::{RankingConfig, TournamentType};
use super::distribution::{calculate_point_distribution, DistributionRequest, PointDistribution};
use crate::error::RankingError;

/// Everything the calculator output depends on, with floats compared by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    baseline_points: u64,
    num_players: u32,
    tournament_type: TournamentType,
    first_place_fraction: u64,
    receiving_fraction: u64,
    extra_per_player: u64,
    min_players_to_be_legal: u32,
    winner_take_all: bool,
    convergence_threshold: u64,
}

impl CacheKey {
    fn new(request: &DistributionRequest, ranking: &RankingConfig) -> Self {
        let rules = ranking.tournament(request.tournament_type);
        Self {
            baseline_points: request.baseline_points.to_bits(),
            num_players: request.num_players,
            tournament_type: request.tournament_type,
            first_place_fraction: request.first_place_fraction.to_bits(),
            receiving_fraction: request.receiving_fraction.to_bits(),
            extra_per_player: request.extra_per_player.to_bits(),
            min_players_to_be_legal: rules.min_players_to_be_legal,
            winner_take_all: rules.winner_take_all,
            convergence_threshold: ranking.convergence_threshold.to_bits(),
        }
    }
}

/// Memoizes point distributions so repeated tournament shapes are calibrated once.
#[derive(Debug, Default)]
pub struct DistributionCache {
    entries: HashMap<CacheKey, Arc<PointDistribution>>,
    hits: usize,
}

impl DistributionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached distribution for `request`, calculating it on first use.
    /// Failed calculations are not cached.
    pub fn get_or_calculate(
        &mut self,
        request: &DistributionRequest,
        ranking: &RankingConfig,
    ) -> Result<Arc<PointDistribution>, RankingError> {
        let key = CacheKey::new(request, ranking);
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(found));
        }

        let distribution = Arc::new(calculate_point_distribution(request, ranking)?);
        self.entries.insert(key, Arc::clone(&distribution));
        Ok(distribution)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_request_hits_cache() {
        let ranking = RankingConfig::default();
        let mut cache = DistributionCache::new();
        let request = DistributionRequest::new(1000.0, 40, TournamentType::National);

        let first = cache.get_or_calculate(&request, &ranking).unwrap();
        let second = cache.get_or_calculate(&request, &ranking).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_different_field_size_misses() {
        let ranking = RankingConfig::default();
        let mut cache = DistributionCache::new();

        cache
            .get_or_calculate(&DistributionRequest::new(1000.0, 40, TournamentType::National), &ranking)
            .unwrap();
        cache
            .get_or_calculate(&DistributionRequest::new(1000.0, 41, TournamentType::National), &ranking)
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_rule_changes_miss() {
        let mut ranking = RankingConfig::default();
        let mut cache = DistributionCache::new();
        let request = DistributionRequest::new(1000.0, 10, TournamentType::National);

        let below = cache.get_or_calculate(&request, &ranking).unwrap();
        assert!(below.points.iter().all(|&p| p == 0.0));

        ranking.tournaments.national.min_players_to_be_legal = 8;
        let legal = cache.get_or_calculate(&request, &ranking).unwrap();
        assert!(legal.points[0] > 0.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_not_cached() {
        let ranking = RankingConfig::default();
        let mut cache = DistributionCache::new();
        let request = DistributionRequest::new(-5.0, 10, TournamentType::National);

        assert!(cache.get_or_calculate(&request, &ranking).is_err());
        assert!(cache.is_empty());
    }
}
