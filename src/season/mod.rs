pub mod aggregate;
pub mod filter;
pub mod standings;
pub mod types;

pub use aggregate::aggregate_season;
pub use filter::{normalize_tag_name, LeaderboardFilter};
pub use standings::{facts_for_tournament, facts_for_tournaments};
pub use types::{Format, LeaderboardEntry, PlacementFact, ResultsFile, Standing, TournamentRecord};

use std::collections::{BTreeMap, HashMap};

use crate::ranking::RankingConfig;

/// Source of per-season ranking rules.
pub trait RankingLookup {
    fn ranking_for(&self, season_id: u32) -> Option<&RankingConfig>;
}

impl RankingLookup for BTreeMap<u32, RankingConfig> {
    fn ranking_for(&self, season_id: u32) -> Option<&RankingConfig> {
        self.get(&season_id)
    }
}

impl RankingLookup for HashMap<u32, RankingConfig> {
    fn ranking_for(&self, season_id: u32) -> Option<&RankingConfig> {
        self.get(&season_id)
    }
}
