use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ranking::RankingConfig;
use crate::season::RankingLookup;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub seasons: Vec<SeasonConfig>,
}

/// A season and the ranking rules its tournaments are scored with.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeasonConfig {
    pub id: u32,
    pub name: String,
    pub started_at: NaiveDate,
    /// Open-ended when absent
    #[serde(default)]
    pub ended_at: Option<NaiveDate>,
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl SeasonConfig {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.started_at <= date && self.ended_at.map_or(true, |end| date <= end)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seasons: vec![SeasonConfig {
                id: 0,
                name: "Season 0".to_string(),
                started_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
                ended_at: None,
                ranking: RankingConfig::default(),
            }],
        }
    }
}

impl Config {
    pub fn season(&self, id: u32) -> Option<&SeasonConfig> {
        self.seasons.iter().find(|s| s.id == id)
    }

    /// The season running on `today`; the latest start wins if windows overlap.
    pub fn current_season(&self, today: NaiveDate) -> Option<&SeasonConfig> {
        self.seasons
            .iter()
            .filter(|s| s.contains(today))
            .max_by_key(|s| (s.started_at, s.id))
    }

    /// Season used when none is requested: the current one, else the most recently started.
    pub fn default_season(&self, today: NaiveDate) -> Option<&SeasonConfig> {
        self.current_season(today).or_else(|| {
            self.seasons
                .iter()
                .filter(|s| s.started_at <= today)
                .max_by_key(|s| (s.started_at, s.id))
        })
    }
}

impl RankingLookup for Config {
    fn ranking_for(&self, season_id: u32) -> Option<&RankingConfig> {
        self.season(season_id).map(|s| &s.ranking)
    }
}
