pub mod formatter;

pub use formatter::{
    format_distribution_table, format_distribution_tsv, format_leaderboard_table,
    format_leaderboard_tsv, format_points, format_seasons, format_tiers, should_use_colors,
};
