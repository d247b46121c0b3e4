//! Tests for group classification and the group index.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, GroupPatternError};
    use crate::groups::{classify, default_group_patterns, GroupIndex, GroupPatterns};
    use crate::metadata::AssetClassMetadata;
    use std::collections::BTreeMap;

    fn patterns() -> GroupPatterns {
        GroupPatterns::new([
            ("Charts", vec!["*.chart"]),
            ("Valuation", vec!["statusinvest.derived"]),
            ("Derived", vec!["*.derived", "*.chart"]),
            ("Fundamentals", vec!["statusinvest"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_match_beats_wildcard() {
        let classified = classify(["statusinvest.derived"], &patterns());
        assert_eq!(classified["statusinvest.derived"], "Valuation");
    }

    #[test]
    fn test_exact_match_beats_earlier_declared_wildcard() {
        let patterns = GroupPatterns::new([
            ("Wild", vec!["*.position"]),
            ("Exact", vec!["b3.position"]),
        ])
        .unwrap();

        let classified = classify(["b3.position"], &patterns);
        assert_eq!(classified["b3.position"], "Exact");
    }

    #[test]
    fn test_first_declared_wildcard_wins() {
        let classified = classify(["yahoo.derived.chart"], &patterns());
        assert_eq!(classified["yahoo.derived.chart"], "Charts");
    }

    #[test]
    fn test_wildcard_matches_suffix() {
        let classified = classify(["b3.derived"], &patterns());
        assert_eq!(classified["b3.derived"], "Derived");
    }

    #[test]
    fn test_unmatched_prefix_is_left_unclassified() {
        let classified = classify(["brapi.quote"], &patterns());
        assert!(classified.is_empty());
    }

    #[test]
    fn test_invalid_patterns_are_rejected_at_load() {
        let empty = GroupPatterns::new([("G", vec!["*"])]);
        assert!(matches!(
            empty,
            Err(Error::GroupPattern(GroupPatternError::EmptyPattern(_)))
        ));

        let misplaced = GroupPatterns::new([("G", vec!["a.*.b"])]);
        assert!(matches!(
            misplaced,
            Err(Error::GroupPattern(GroupPatternError::MisplacedWildcard { .. }))
        ));

        let duplicate = GroupPatterns::new([("G", vec!["a"]), ("G", vec!["b"])]);
        assert!(matches!(
            duplicate,
            Err(Error::GroupPattern(GroupPatternError::DuplicateGroup(_)))
        ));
    }

    #[test]
    fn test_index_builds_both_directions() {
        let keys = [
            "ticker",
            "statusinvest.dy",
            "statusinvest.lpa",
            "statusinvest.derived.graham_price",
            "yahoo.derived.chart.1mo",
            "yahoo.derived.chart.1y",
            "brapi.quote.price",
        ];

        let index = GroupIndex::build(&keys, &patterns());

        assert_eq!(index.group_by_prefix()["statusinvest"], "Fundamentals");
        assert_eq!(
            index.prefixes_by_group()["Charts"],
            vec!["yahoo.derived.chart".to_string()]
        );
        assert_eq!(index.unclassified(), &["brapi.quote".to_string()]);
        assert_eq!(index.group_label("brapi.quote"), "brapi.quote");

        let group_names: Vec<String> = index.groups().into_iter().map(|(g, _)| g).collect();
        assert_eq!(
            group_names,
            vec!["Charts", "Valuation", "Fundamentals", "brapi.quote"]
        );
    }

    #[test]
    fn test_search_matches_keys_labels_and_groups() {
        let metadata = AssetClassMetadata {
            schema: vec![
                "statusinvest.dy".to_string(),
                "statusinvest.p_vp".to_string(),
                "yahoo.derived.chart.1mo".to_string(),
            ],
            labels: BTreeMap::from([(
                "statusinvest.dy".to_string(),
                "Dividend Yield".to_string(),
            )]),
            ..Default::default()
        };
        let index = GroupIndex::from_metadata(&metadata, &patterns());

        assert_eq!(index.search("dividend"), vec!["statusinvest.dy".to_string()]);
        assert_eq!(index.search("P_VP"), vec!["statusinvest.p_vp".to_string()]);
        assert_eq!(
            index.search("charts"),
            vec!["yahoo.derived.chart.1mo".to_string()]
        );
        assert!(index.search("  ").is_empty());
    }

    #[test]
    fn test_default_patterns_load() {
        let defaults = default_group_patterns().unwrap();
        assert_eq!(defaults.group_of("b3.derived.position"), Some("Posição"));
        assert_eq!(defaults.group_of("statusinvest.derived"), Some("Valuation"));
        assert_eq!(defaults.group_of("yahoo.derived.chart"), Some("Gráficos"));
        assert_eq!(defaults.group_of("brapi.derived"), Some("Derivados"));
        assert_eq!(defaults.group_of("unknown"), None);
    }
}
