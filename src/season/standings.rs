use tracing::debug;

use super::filter::normalize_tag_name;
use super::types::{PlacementFact, TournamentRecord};
use super::RankingLookup;
use crate::error::RankingError;
use crate::ranking::{DistributionCache, DistributionRequest};

/// Turn a finished tournament's standings into placement facts.
///
/// The field size is the registered player count when known, otherwise the
/// number of standings. Placements past the paid field earn 0.
pub fn facts_for_tournament<L: RankingLookup + ?Sized>(
    tournament: &TournamentRecord,
    seasons: &L,
    cache: &mut DistributionCache,
) -> Result<Vec<PlacementFact>, RankingError> {
    let ranking = seasons
        .ranking_for(tournament.season_id)
        .ok_or(RankingError::UnresolvedSeason(tournament.season_id))?;

    if let Some(standing) = tournament.standings.iter().find(|s| s.placement == 0) {
        return Err(RankingError::invalid(
            "placement",
            format!(
                "player {} in tournament {} has placement 0, placements start at 1",
                standing.player_id, tournament.id
            ),
        ));
    }

    let num_players = match tournament.players_count {
        Some(count) => count,
        None => u32::try_from(tournament.standings.len()).map_err(|_| {
            RankingError::invalid("players_count", "too many standings for one tournament")
        })?,
    };

    let request = DistributionRequest::for_type(
        ranking.tournament(tournament.tournament_type),
        tournament.tournament_type,
        num_players,
    );
    let distribution = cache.get_or_calculate(&request, ranking)?;
    let tags: Vec<String> = tournament.tags.iter().map(|t| normalize_tag_name(t)).collect();

    debug!(
        tournament_id = tournament.id,
        num_players,
        standings = tournament.standings.len(),
        "applied point distribution"
    );

    Ok(tournament
        .standings
        .iter()
        .map(|standing| PlacementFact {
            player_id: standing.player_id,
            player_name: standing.player_name.clone(),
            tournament_id: tournament.id,
            tournament_type: tournament.tournament_type,
            season_id: tournament.season_id,
            placement: standing.placement,
            points: distribution.points_for_placement(standing.placement),
            faction: standing.faction.clone(),
            format: tournament.format,
            tags: tags.clone(),
        })
        .collect())
}

/// Placement facts for every tournament, in input order.
pub fn facts_for_tournaments<L: RankingLookup + ?Sized>(
    tournaments: &[TournamentRecord],
    seasons: &L,
    cache: &mut DistributionCache,
) -> Result<Vec<PlacementFact>, RankingError> {
    let mut facts = Vec::new();
    for tournament in tournaments {
        facts.extend(facts_for_tournament(tournament, seasons, cache)?);
    }
    Ok(facts)
}
