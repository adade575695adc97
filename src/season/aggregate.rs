use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::filter::LeaderboardFilter;
use super::types::{LeaderboardEntry, PlacementFact};
use super::RankingLookup;
use crate::error::RankingError;
use crate::ranking::TournamentType;

/// Best result first; ties go to the lower tournament id, then the better placement.
fn by_points_desc(a: &&PlacementFact, b: &&PlacementFact) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then(a.tournament_id.cmp(&b.tournament_id))
        .then(a.placement.cmp(&b.placement))
}

/// Build the leaderboard for one season.
///
/// Facts from other seasons and facts the filter rejects are ignored. For
/// every player, each tournament type contributes only its `tournament_limit`
/// best results. Rows are ordered by total descending, ties by player id.
pub fn aggregate_season<L: RankingLookup + ?Sized>(
    season_id: u32,
    facts: &[PlacementFact],
    seasons: &L,
    filter: &LeaderboardFilter,
) -> Result<Vec<LeaderboardEntry>, RankingError> {
    let ranking = seasons
        .ranking_for(season_id)
        .ok_or(RankingError::UnresolvedSeason(season_id))?;

    let mut by_player: BTreeMap<u64, BTreeMap<TournamentType, Vec<&PlacementFact>>> =
        BTreeMap::new();
    let mut considered = 0usize;

    for fact in facts
        .iter()
        .filter(|f| f.season_id == season_id && filter.matches(f))
    {
        if !fact.points.is_finite() || fact.points < 0.0 {
            return Err(RankingError::invalid(
                "points",
                format!(
                    "player {} in tournament {} has {} points",
                    fact.player_id, fact.tournament_id, fact.points
                ),
            ));
        }
        by_player
            .entry(fact.player_id)
            .or_default()
            .entry(fact.tournament_type)
            .or_default()
            .push(fact);
        considered += 1;
    }

    let mut entries: Vec<LeaderboardEntry> = by_player
        .into_iter()
        .map(|(player_id, by_type)| {
            let mut contributing = Vec::new();
            let mut total_points = 0.0;
            let mut seen_tournaments = BTreeSet::new();

            for (tournament_type, mut results) in by_type {
                let limit = ranking.tournament(tournament_type).tournament_limit as usize;
                results.sort_by(by_points_desc);

                // A tournament counts once per player even if it was reported twice.
                let kept = results
                    .into_iter()
                    .filter(|f| seen_tournaments.insert(f.tournament_id))
                    .take(limit);
                for fact in kept {
                    total_points += fact.points;
                    contributing.push(fact.clone());
                }
            }

            let player_name = contributing.iter().find_map(|f| f.player_name.clone());
            LeaderboardEntry {
                rank: 0,
                player_id,
                player_name,
                season_id,
                total_points,
                contributing_placements: contributing,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_points
            .total_cmp(&a.total_points)
            .then(a.player_id.cmp(&b.player_id))
    });
    for (entry, rank) in entries.iter_mut().zip(1u32..) {
        entry.rank = rank;
    }

    debug!(
        season_id,
        facts = facts.len(),
        considered,
        players = entries.len(),
        "aggregated season leaderboard"
    );

    Ok(entries)
}
