use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RankingError;
use crate::ranking::TournamentType;

/// Card pool format a tournament was played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Standard,
    Startup,
    Eternal,
    Other,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Standard => "standard",
            Format::Startup => "startup",
            Format::Eternal => "eternal",
            Format::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Format::Standard),
            "startup" => Ok(Format::Startup),
            "eternal" => Ok(Format::Eternal),
            "other" => Ok(Format::Other),
            _ => Err(RankingError::invalid(
                "format",
                format!("unknown format `{}`", s),
            )),
        }
    }
}

/// A player's final placement in a tournament with the points it earned.
///
/// Facts are values: re-ingesting a tournament replaces its facts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlacementFact {
    pub player_id: u64,
    #[serde(default)]
    pub player_name: Option<String>,
    pub tournament_id: u64,
    pub tournament_type: TournamentType,
    pub season_id: u32,
    /// 1-based final standing
    pub placement: u32,
    pub points: f64,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub format: Option<Format>,
    /// Normalized tag names attached to the tournament
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One leaderboard row, derived from placement facts on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the sorted leaderboard
    pub rank: u32,
    pub player_id: u64,
    pub player_name: Option<String>,
    pub season_id: u32,
    pub total_points: f64,
    /// Facts that counted toward the total, best first within each type
    pub contributing_placements: Vec<PlacementFact>,
}

/// A finished tournament as delivered by a results source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TournamentRecord {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub season_id: u32,
    pub tournament_type: TournamentType,
    #[serde(default)]
    pub format: Option<Format>,
    /// Registered field size; falls back to the number of standings
    #[serde(default)]
    pub players_count: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Standing {
    pub player_id: u64,
    #[serde(default)]
    pub player_name: Option<String>,
    pub placement: u32,
    #[serde(default)]
    pub faction: Option<String>,
}

/// Top-level shape of a results file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResultsFile {
    pub tournaments: Vec<TournamentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("Standard".parse::<Format>().unwrap(), Format::Standard);
        assert_eq!(" eternal ".parse::<Format>().unwrap(), Format::Eternal);
        assert!("draft".parse::<Format>().is_err());
    }

    #[test]
    fn test_results_file_from_json() {
        let json = r#"{
            "tournaments": [{
                "id": 7,
                "name": "Dutch Nationals",
                "season_id": 2,
                "tournament_type": "national championship",
                "format": "standard",
                "tags": ["store-champs"],
                "standings": [
                    { "player_id": 1, "player_name": "alice", "placement": 1, "faction": "shaper" },
                    { "player_id": 2, "placement": 2 }
                ]
            }]
        }"#;
        let results: ResultsFile = serde_json::from_str(json).unwrap();
        let tournament = &results.tournaments[0];

        assert_eq!(tournament.tournament_type, TournamentType::National);
        assert_eq!(tournament.format, Some(Format::Standard));
        assert_eq!(tournament.players_count, None);
        assert_eq!(tournament.standings.len(), 2);
        assert_eq!(tournament.standings[1].player_name, None);
        assert_eq!(tournament.standings[0].faction.as_deref(), Some("shaper"));
    }

    #[test]
    fn test_unknown_tournament_type_in_json() {
        let json = r#"{ "id": 1, "season_id": 0, "tournament_type": "store championship", "standings": [] }"#;
        let result: Result<TournamentRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
