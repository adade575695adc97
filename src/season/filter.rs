use std::collections::BTreeSet;

use super::types::{Format, PlacementFact};

/// Normalize a tag name for storage and comparison.
/// "Store Champs" becomes "store-champs".
pub fn normalize_tag_name(name: &str) -> String {
    name.split(' ')
        .map(|chunk| chunk.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Restricts which placement facts take part in a leaderboard view.
///
/// Filters select facts; they never change a fact's points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardFilter {
    pub faction: Option<String>,
    pub format: Option<Format>,
    /// Normalized tag names; a fact matches if it carries any of them
    pub tags: BTreeSet<String>,
}

impl LeaderboardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(normalize_tag_name(tag));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.faction.is_none() && self.format.is_none() && self.tags.is_empty()
    }

    pub fn matches(&self, fact: &PlacementFact) -> bool {
        if let Some(ref faction) = self.faction {
            match fact.faction {
                Some(ref f) if f.eq_ignore_ascii_case(faction) => {}
                _ => return false,
            }
        }

        if let Some(format) = self.format {
            if fact.format != Some(format) {
                return false;
            }
        }

        if !self.tags.is_empty()
            && !fact
                .tags
                .iter()
                .any(|tag| self.tags.contains(&normalize_tag_name(tag)))
        {
            return false;
        }

        true
    }

    /// Keep only the facts this filter selects
    pub fn apply<'a>(&self, facts: &'a [PlacementFact]) -> Vec<&'a PlacementFact> {
        facts.iter().filter(|fact| self.matches(fact)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::TournamentType;

    fn fact(faction: Option<&str>, format: Option<Format>, tags: &[&str]) -> PlacementFact {
        PlacementFact {
            player_id: 1,
            player_name: None,
            tournament_id: 10,
            tournament_type: TournamentType::National,
            season_id: 0,
            placement: 1,
            points: 100.0,
            faction: faction.map(str::to_string),
            format,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("Store Champs"), "store-champs");
        assert_eq!(normalize_tag_name("online"), "online");
        assert_eq!(normalize_tag_name("A  B"), "a--b");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = LeaderboardFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&fact(None, None, &[])));
    }

    #[test]
    fn test_faction_filter_case_insensitive() {
        let filter = LeaderboardFilter::new().with_faction("Shaper");
        assert!(filter.matches(&fact(Some("shaper"), None, &[])));
        assert!(!filter.matches(&fact(Some("anarch"), None, &[])));
        assert!(!filter.matches(&fact(None, None, &[])));
    }

    #[test]
    fn test_format_filter() {
        let filter = LeaderboardFilter::new().with_format(Format::Startup);
        assert!(filter.matches(&fact(None, Some(Format::Startup), &[])));
        assert!(!filter.matches(&fact(None, Some(Format::Standard), &[])));
        assert!(!filter.matches(&fact(None, None, &[])));
    }

    #[test]
    fn test_tag_filter_matches_any() {
        let filter = LeaderboardFilter::new().with_tag("Store Champs").with_tag("online");
        assert!(filter.matches(&fact(None, None, &["store-champs"])));
        assert!(filter.matches(&fact(None, None, &["Online", "other"])));
        assert!(!filter.matches(&fact(None, None, &["other"])));
        assert!(!filter.matches(&fact(None, None, &[])));
    }

    #[test]
    fn test_filters_combine() {
        let filter = LeaderboardFilter::new()
            .with_faction("shaper")
            .with_format(Format::Standard);
        assert!(filter.matches(&fact(Some("shaper"), Some(Format::Standard), &[])));
        assert!(!filter.matches(&fact(Some("shaper"), Some(Format::Eternal), &[])));
    }

    #[test]
    fn test_apply_keeps_points_untouched() {
        let facts = vec![
            fact(Some("shaper"), None, &[]),
            fact(Some("anarch"), None, &[]),
        ];
        let kept = LeaderboardFilter::new().with_faction("anarch").apply(&facts);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], &facts[1]);
    }
}
