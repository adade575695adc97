use super::config::{RankingConfig, TournamentTypeConfig};

/// Validate a season's ranking rules.
/// Returns all validation errors at once (not just the first).
pub fn validate_ranking(config: &RankingConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    collect_ranking_errors(config, "ranking", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Push one message per problem in `config`, each prefixed with `path`.
pub(crate) fn collect_ranking_errors(config: &RankingConfig, path: &str, errors: &mut Vec<String>) {
    let threshold = config.convergence_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        errors.push(format!("{}.convergence_threshold: must be positive", path));
    }

    for (tournament_type, type_config) in config.tournaments.iter() {
        let type_path = format!("{}.tournaments.{}", path, tournament_type.config_key());
        collect_type_errors(type_config, &type_path, errors);
    }
}

fn collect_type_errors(config: &TournamentTypeConfig, path: &str, errors: &mut Vec<String>) {
    if !config.baseline_points.is_finite() || config.baseline_points < 0.0 {
        errors.push(format!("{}.baseline_points: must be non-negative", path));
    }

    if !config.points_per_player.is_finite() || config.points_per_player < 0.0 {
        errors.push(format!("{}.points_per_player: must be non-negative", path));
    }

    if !is_fraction(config.first_place_fraction) {
        errors.push(format!(
            "{}.first_place_fraction: must be in (0, 1], got {}",
            path, config.first_place_fraction
        ));
    }

    if !is_fraction(config.receiving_fraction) {
        errors.push(format!(
            "{}.receiving_fraction: must be in (0, 1], got {}",
            path, config.receiving_fraction
        ));
    }

    if config.tournament_limit < 1 {
        errors.push(format!("{}.tournament_limit: must be at least 1", path));
    }
}

fn is_fraction(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_ranking(&RankingConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_baseline() {
        let mut config = RankingConfig::default();
        config.tournaments.national.baseline_points = -10.0;
        let errors = validate_ranking(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("ranking.tournaments.national.baseline_points"));
    }

    #[test]
    fn test_fraction_bounds() {
        let mut config = RankingConfig::default();
        config.tournaments.worlds.first_place_fraction = 0.0;
        config.tournaments.worlds.receiving_fraction = 1.2;
        let errors = validate_ranking(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("worlds.first_place_fraction"));
        assert!(errors[1].contains("worlds.receiving_fraction"));
    }

    #[test]
    fn test_full_fraction_is_valid() {
        let mut config = RankingConfig::default();
        config.tournaments.continental.receiving_fraction = 1.0;
        config.tournaments.continental.first_place_fraction = 1.0;
        assert!(validate_ranking(&config).is_ok());
    }

    #[test]
    fn test_zero_limit() {
        let mut config = RankingConfig::default();
        config.tournaments.circuit_opener.tournament_limit = 0;
        let errors = validate_ranking(&config).unwrap_err();
        assert!(errors[0].contains("circuit_opener.tournament_limit"));
    }

    #[test]
    fn test_bad_threshold() {
        let mut config = RankingConfig::default();
        config.convergence_threshold = -0.5;
        let errors = validate_ranking(&config).unwrap_err();
        assert!(errors[0].contains("convergence_threshold"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RankingConfig::default();
        config.convergence_threshold = 0.0; // Error 1
        config.tournaments.national.points_per_player = -1.0; // Error 2
        config.tournaments.intercontinental.tournament_limit = 0; // Error 3
        let errors = validate_ranking(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
