use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::config::Config;
use crate::ranking::{PlacementPreview, PointDistribution, RankingConfig};
use crate::season::LeaderboardEntry;

/// Field size used for the first-place column of the tiers listing.
const TIER_SAMPLE_FIELD: u32 = 50;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a bean amount with two decimals
pub fn format_points(points: f64) -> String {
    format!("{:.2}", points)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn display_name(entry: &LeaderboardEntry) -> String {
    match entry.player_name {
        Some(ref name) => name.clone(),
        None => format!("player #{}", entry.player_id),
    }
}

/// Format a payout preview: a header with the adjusted pool, then one line per
/// paid placement (placement, points, cumulative %). Unpaid placements are summarized.
pub fn format_distribution_table(
    distribution: &PointDistribution,
    rows: &[PlacementPreview],
    use_colors: bool,
) -> String {
    let header = format!(
        "Adjusted total: {} beans across {} players",
        format_points(distribution.adjusted_total_points),
        distribution.points.len()
    );
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    let paid: Vec<&PlacementPreview> = rows.iter().filter(|r| r.points > 0.0).collect();
    for row in &paid {
        let index_str = format!("{:>3}.", row.placement);
        let points_str = format!("{:>10}", format_points(row.points));
        let cumulative_str = format!("{:>7}%", format_points(row.cumulative));
        if use_colors {
            lines.push(format!(
                "{} {}  {}",
                index_str.dimmed(),
                points_str.bold(),
                cumulative_str.cyan()
            ));
        } else {
            lines.push(format!("{} {}  {}", index_str, points_str, cumulative_str));
        }
    }

    let unpaid = rows.len() - paid.len();
    if unpaid > 0 {
        lines.push(format!("{} placements receive no points", unpaid));
    }

    lines.join("\n")
}

/// Format preview rows as tab-separated values: placement, points, cumulative
pub fn format_distribution_tsv(rows: &[PlacementPreview]) -> String {
    rows.iter()
        .map(|r| format!("{}\t{:.2}\t{:.2}", r.placement, r.points, r.cumulative))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format leaderboard rows with columns: Rank, Beans, Player, Results counted
/// Rank column: 4 chars (fits "999."), right-aligned
/// Beans column is right-aligned, 10 chars wide
pub fn format_leaderboard_table(entries: &[LeaderboardEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No results found.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 4;
    let points_width = 10;
    let separator = "  ";

    entries
        .iter()
        .map(|entry| {
            let rank_str = format!("{:>3}.", entry.rank);
            let points_str = format!("{:>width$}", format_points(entry.total_points), width = points_width);
            let counted = format!("({} counted)", entry.contributing_placements.len());

            let fixed_width = rank_width + 1 + points_width + separator.len() * 2 + counted.len();
            let name = display_name(entry);
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&name, width - fixed_width),
                Some(_) => truncate_name(&name, 20),
                None => name,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    points_str.bold(),
                    separator,
                    name.yellow(),
                    separator,
                    counted.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, points_str, separator, name, separator, counted
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format leaderboard rows as tab-separated values for scripting
/// Columns: rank, player_id, name, total, results counted (no headers, no colors)
pub fn format_leaderboard_tsv(entries: &[LeaderboardEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\t{:.2}\t{}",
                entry.rank,
                entry.player_id,
                entry.player_name.as_deref().unwrap_or(""),
                entry.total_points,
                entry.contributing_placements.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the per-type rules of a season: baseline, beans per player, minimum
/// field, limit, and the first-place payout for a 50-player field
pub fn format_tiers(ranking: &RankingConfig, use_colors: bool) -> String {
    ranking
        .tournaments
        .iter()
        .map(|(tournament_type, config)| {
            let label = format!("{:<30}", tournament_type.label());
            let details = if config.winner_take_all {
                format!(
                    "baseline {:>7}  winner takes all  limit {}",
                    format_points(config.baseline_points),
                    config.tournament_limit
                )
            } else {
                format!(
                    "baseline {:>7}  +{} per player  min {}  limit {}  1st @{}: {}",
                    format_points(config.baseline_points),
                    config.points_per_player,
                    config.min_players_to_be_legal,
                    config.tournament_limit,
                    TIER_SAMPLE_FIELD,
                    format_points(config.first_place_points(TIER_SAMPLE_FIELD))
                )
            };
            if use_colors {
                format!("{}{}", label.cyan(), details)
            } else {
                format!("{}{}", label, details)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format configured seasons, marking the current one with `*`
pub fn format_seasons(config: &Config, current: Option<u32>, use_colors: bool) -> String {
    if config.seasons.is_empty() {
        return "No seasons configured.".to_string();
    }

    config
        .seasons
        .iter()
        .map(|season| {
            let marker = if current == Some(season.id) { "*" } else { " " };
            let window = match season.ended_at {
                Some(end) => format!("{} - {}", season.started_at, end),
                None => format!("{} -", season.started_at),
            };
            let line = format!("{} {:>3}  {}  {}", marker, season.id, season.name, window);
            if use_colors && current == Some(season.id) {
                line.bold().to_string()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
