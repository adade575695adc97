use thiserror::Error;

/// Failures surfaced by the point calculator and the season aggregator.
///
/// Degenerate inputs (an empty field, a field below the legal minimum) are
/// not errors; they produce all-zero distributions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("unknown tournament type `{0}`")]
    UnknownTournamentType(String),

    #[error("no ranking configuration for season {0}")]
    UnresolvedSeason(u32),
}

impl RankingError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RankingError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
