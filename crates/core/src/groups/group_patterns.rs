use crate::errors::{GroupPatternError, Result};

/// Marks a suffix pattern, e.g. `*.chart`
pub const WILDCARD: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPattern {
    /// Matches one prefix exactly.
    Exact(String),
    /// Matches every prefix ending with the stored suffix.
    Suffix(String),
}

impl GroupPattern {
    fn parse(group: &str, raw: &str) -> std::result::Result<Self, GroupPatternError> {
        let pattern = match raw.strip_prefix(WILDCARD) {
            Some(suffix) => GroupPattern::Suffix(suffix.to_string()),
            None => GroupPattern::Exact(raw.to_string()),
        };
        let body = match &pattern {
            GroupPattern::Exact(body) | GroupPattern::Suffix(body) => body,
        };
        if body.is_empty() {
            return Err(GroupPatternError::EmptyPattern(group.to_string()));
        }
        if body.contains(WILDCARD) {
            return Err(GroupPatternError::MisplacedWildcard {
                group: group.to_string(),
                pattern: raw.to_string(),
            });
        }
        Ok(pattern)
    }

    pub fn matches_exactly(&self, prefix: &str) -> bool {
        matches!(self, GroupPattern::Exact(exact) if exact == prefix)
    }

    pub fn matches_suffix(&self, prefix: &str) -> bool {
        matches!(self, GroupPattern::Suffix(suffix) if prefix.ends_with(suffix.as_str()))
    }
}

/// Ordered group declarations. Order matters: when several groups' wildcard
/// patterns match a prefix, the first declared group wins.
#[derive(Debug, Clone, Default)]
pub struct GroupPatterns {
    groups: Vec<(String, Vec<GroupPattern>)>,
}

impl GroupPatterns {
    pub fn new<G, P>(groups: impl IntoIterator<Item = (G, Vec<P>)>) -> Result<Self>
    where
        G: Into<String>,
        P: AsRef<str>,
    {
        let mut parsed: Vec<(String, Vec<GroupPattern>)> = Vec::new();
        for (group, raw_patterns) in groups {
            let group = group.into();
            if parsed.iter().any(|(existing, _)| existing == &group) {
                return Err(GroupPatternError::DuplicateGroup(group).into());
            }
            let patterns = raw_patterns
                .iter()
                .map(|raw| GroupPattern::parse(&group, raw.as_ref()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            parsed.push((group, patterns));
        }
        Ok(GroupPatterns { groups: parsed })
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[GroupPattern])> {
        self.groups
            .iter()
            .map(|(group, patterns)| (group.as_str(), patterns.as_slice()))
    }

    /// Group of `prefix`: an exact match anywhere wins, otherwise the first
    /// group whose wildcard matches.
    pub fn group_of(&self, prefix: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.matches_exactly(prefix)))
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|(_, patterns)| patterns.iter().any(|p| p.matches_suffix(prefix)))
            })
            .map(|(group, _)| group.as_str())
    }
}

/// Groups offered by the dashboard's column picker.
pub fn default_group_patterns() -> Result<GroupPatterns> {
    GroupPatterns::new([
        ("Posição", vec!["b3.position", "b3.derived.position"]),
        ("Cotação", vec!["yahoo.quote"]),
        ("Gráficos", vec!["*.chart"]),
        ("Valuation", vec!["statusinvest.derived"]),
        ("Fundamentos", vec!["statusinvest", "*.fundamentals"]),
        ("Derivados", vec!["*.derived"]),
    ])
}
