use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RankingError;

/// Percentage of the adjusted point pool awarded to first place.
pub const PERCENT_FOR_FIRST_PLACE: f64 = 0.15;

/// Fraction of the field that receives any points at all.
pub const PERCENT_RECEIVING_POINTS: f64 = 0.5;

/// Points added to the pool for every participant.
pub const EXTRA_POINTS_PER_PERSON: f64 = 20.0;

/// Fields smaller than this pay nothing.
pub const MIN_PLAYERS_TO_BE_LEGAL: u32 = 12;

/// Width of the alpha search interval at which bisection stops.
pub const CONVERGENCE_THRESHOLD: f64 = 0.001;

/// Tournament categories that award beans.
///
/// Serialized with the labels used by tournament sources
/// (`"national championship"`), parsed leniently from short forms too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum TournamentType {
    #[serde(rename = "circuit opener")]
    CircuitOpener,
    #[serde(rename = "national championship")]
    National,
    #[serde(rename = "continental championship")]
    Continental,
    #[serde(rename = "intercontinental championship")]
    Intercontinental,
    #[serde(rename = "worlds championship")]
    Worlds,
}

impl TournamentType {
    /// Every variant, smallest tier first.
    pub const ALL: [TournamentType; 5] = [
        TournamentType::CircuitOpener,
        TournamentType::National,
        TournamentType::Continental,
        TournamentType::Intercontinental,
        TournamentType::Worlds,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TournamentType::CircuitOpener => "circuit opener",
            TournamentType::National => "national championship",
            TournamentType::Continental => "continental championship",
            TournamentType::Intercontinental => "intercontinental championship",
            TournamentType::Worlds => "worlds championship",
        }
    }

    /// Field name of this type in [`TournamentConfigs`].
    pub fn config_key(&self) -> &'static str {
        match self {
            TournamentType::CircuitOpener => "circuit_opener",
            TournamentType::National => "national",
            TournamentType::Continental => "continental",
            TournamentType::Intercontinental => "intercontinental",
            TournamentType::Worlds => "worlds",
        }
    }
}

impl fmt::Display for TournamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TournamentType {
    type Err = RankingError;

    /// Accepts the full label or a short form, ignoring case and `-`/`_` separators.
    /// "national championship", "national", "nationals" and "Circuit-Opener" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ");
        let key = normalized.strip_suffix(" championship").unwrap_or(&normalized);

        match key {
            "circuit opener" | "co" => Ok(TournamentType::CircuitOpener),
            "national" | "nationals" => Ok(TournamentType::National),
            "continental" | "continentals" => Ok(TournamentType::Continental),
            "intercontinental" | "interconts" => Ok(TournamentType::Intercontinental),
            "worlds" | "world" => Ok(TournamentType::Worlds),
            _ => Err(RankingError::UnknownTournamentType(s.to_string())),
        }
    }
}

/// Payout rules for one tournament type.
///
/// Example YAML:
/// ```yaml
/// baseline_points: 1000
/// points_per_player: 20
/// min_players_to_be_legal: 12
/// tournament_limit: 3
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TournamentTypeConfig {
    /// Point budget before size scaling
    pub baseline_points: f64,

    /// Points added to the budget per participant
    #[serde(default = "default_points_per_player")]
    pub points_per_player: f64,

    /// Smallest field that pays out
    #[serde(default = "default_min_players")]
    pub min_players_to_be_legal: u32,

    /// Share of the adjusted budget paid to first place, in (0, 1]
    #[serde(default = "default_first_place_fraction")]
    pub first_place_fraction: f64,

    /// Share of the field paid anything, in (0, 1]
    #[serde(default = "default_receiving_fraction")]
    pub receiving_fraction: f64,

    /// How many results of this type count toward a season total
    pub tournament_limit: u32,

    /// Pay the whole baseline to first place and nothing to anyone else
    #[serde(default)]
    pub winner_take_all: bool,
}

fn default_points_per_player() -> f64 {
    EXTRA_POINTS_PER_PERSON
}

fn default_min_players() -> u32 {
    MIN_PLAYERS_TO_BE_LEGAL
}

fn default_first_place_fraction() -> f64 {
    PERCENT_FOR_FIRST_PLACE
}

fn default_receiving_fraction() -> f64 {
    PERCENT_RECEIVING_POINTS
}

fn default_convergence_threshold() -> f64 {
    CONVERGENCE_THRESHOLD
}

impl TournamentTypeConfig {
    /// Config with the stock coefficients and the given baseline and limit.
    pub fn new(baseline_points: f64, tournament_limit: u32) -> Self {
        Self {
            baseline_points,
            points_per_player: EXTRA_POINTS_PER_PERSON,
            min_players_to_be_legal: MIN_PLAYERS_TO_BE_LEGAL,
            first_place_fraction: PERCENT_FOR_FIRST_PLACE,
            receiving_fraction: PERCENT_RECEIVING_POINTS,
            tournament_limit,
            winner_take_all: false,
        }
    }

    /// First-place payout for a legal, non winner-take-all field of `num_players`.
    pub fn first_place_points(&self, num_players: u32) -> f64 {
        if self.winner_take_all {
            return self.baseline_points;
        }
        (self.baseline_points + f64::from(num_players) * self.points_per_player)
            * self.first_place_fraction
    }
}

/// One payout record per tournament type.
///
/// A struct rather than a map so every type is always configured.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TournamentConfigs {
    pub circuit_opener: TournamentTypeConfig,
    pub national: TournamentTypeConfig,
    pub continental: TournamentTypeConfig,
    pub intercontinental: TournamentTypeConfig,
    pub worlds: TournamentTypeConfig,
}

impl TournamentConfigs {
    pub fn get(&self, tournament_type: TournamentType) -> &TournamentTypeConfig {
        match tournament_type {
            TournamentType::CircuitOpener => &self.circuit_opener,
            TournamentType::National => &self.national,
            TournamentType::Continental => &self.continental,
            TournamentType::Intercontinental => &self.intercontinental,
            TournamentType::Worlds => &self.worlds,
        }
    }

    pub fn get_mut(&mut self, tournament_type: TournamentType) -> &mut TournamentTypeConfig {
        match tournament_type {
            TournamentType::CircuitOpener => &mut self.circuit_opener,
            TournamentType::National => &mut self.national,
            TournamentType::Continental => &mut self.continental,
            TournamentType::Intercontinental => &mut self.intercontinental,
            TournamentType::Worlds => &mut self.worlds,
        }
    }

    /// (type, config) pairs in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (TournamentType, &TournamentTypeConfig)> {
        TournamentType::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

impl Default for TournamentConfigs {
    fn default() -> Self {
        Self {
            circuit_opener: TournamentTypeConfig::new(50.0, 5),
            national: TournamentTypeConfig::new(1000.0, 3),
            continental: TournamentTypeConfig::new(2000.0, 1),
            intercontinental: TournamentTypeConfig {
                winner_take_all: true,
                ..TournamentTypeConfig::new(200.0, 1)
            },
            worlds: TournamentTypeConfig::new(4000.0, 1),
        }
    }
}

/// Ranking rules for a single season.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RankingConfig {
    /// Alpha interval width at which the payout search stops
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,

    pub tournaments: TournamentConfigs,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: CONVERGENCE_THRESHOLD,
            tournaments: TournamentConfigs::default(),
        }
    }
}

impl RankingConfig {
    pub fn tournament(&self, tournament_type: TournamentType) -> &TournamentTypeConfig {
        self.tournaments.get(tournament_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranking_config() {
        let config = RankingConfig::default();

        assert_eq!(config.convergence_threshold, 0.001);
        assert_eq!(config.tournament(TournamentType::Worlds).baseline_points, 4000.0);
        assert_eq!(config.tournament(TournamentType::Continental).baseline_points, 2000.0);
        assert_eq!(config.tournament(TournamentType::National).baseline_points, 1000.0);
        assert_eq!(config.tournament(TournamentType::Intercontinental).baseline_points, 200.0);
        assert_eq!(config.tournament(TournamentType::CircuitOpener).baseline_points, 50.0);
    }

    #[test]
    fn test_default_limits() {
        let config = RankingConfig::default();
        let limits: Vec<u32> = config
            .tournaments
            .iter()
            .map(|(_, c)| c.tournament_limit)
            .collect();
        assert_eq!(limits, vec![5, 3, 1, 1, 1]);
    }

    #[test]
    fn test_only_intercontinental_is_winner_take_all() {
        let config = TournamentConfigs::default();
        for (tournament_type, c) in config.iter() {
            assert_eq!(
                c.winner_take_all,
                tournament_type == TournamentType::Intercontinental,
                "{}",
                tournament_type
            );
        }
    }

    #[test]
    fn test_ranking_config_serde_roundtrip() {
        let config = RankingConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: RankingConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_type_config_uses_defaults() {
        let yaml = r#"
baseline_points: 1000
tournament_limit: 3
"#;
        let config: TournamentTypeConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config, TournamentTypeConfig::new(1000.0, 3));
    }

    #[test]
    fn test_type_config_rejects_unknown_fields() {
        let yaml = r#"
baseline_points: 1000
tournament_limit: 3
bonus: 7
"#;
        let result: Result<TournamentTypeConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let yaml = r#"
tournaments:
  circuit_opener: { baseline_points: 50, tournament_limit: 5 }
  national: { baseline_points: 1000, tournament_limit: 3 }
  continental: { baseline_points: 2000, tournament_limit: 1 }
  worlds: { baseline_points: 4000, tournament_limit: 1 }
"#;
        let result: Result<RankingConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_tournament_type_labels() {
        for tournament_type in TournamentType::ALL {
            let parsed: TournamentType = tournament_type.label().parse().unwrap();
            assert_eq!(parsed, tournament_type);
        }
    }

    #[test]
    fn test_parse_tournament_type_short_forms() {
        assert_eq!("national".parse::<TournamentType>().unwrap(), TournamentType::National);
        assert_eq!("Nationals".parse::<TournamentType>().unwrap(), TournamentType::National);
        assert_eq!(
            "circuit-opener".parse::<TournamentType>().unwrap(),
            TournamentType::CircuitOpener
        );
        assert_eq!(
            "intercontinental_championship".parse::<TournamentType>().unwrap(),
            TournamentType::Intercontinental
        );
    }

    #[test]
    fn test_parse_unknown_tournament_type() {
        let err = "store championship".parse::<TournamentType>().unwrap_err();
        assert_eq!(
            err,
            RankingError::UnknownTournamentType("store championship".to_string())
        );
    }

    #[test]
    fn test_first_place_points_for_fifty_players() {
        let config = TournamentConfigs::default();
        // (1000 + 50 * 20) * 0.15
        assert!((config.national.first_place_points(50) - 300.0).abs() < 1e-9);
        assert_eq!(config.intercontinental.first_place_points(50), 200.0);
    }
}
