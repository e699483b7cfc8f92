//! Ordering policy for roots (organization chart rank) and siblings (eselon depth).
//!
//! Both orderings are pure functions of a unit's `name`, `level` and `id`, so sorting
//! the same set twice always yields the same sequence regardless of delivery order.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::entities::Unit;
use crate::domain::error::{DomainError, DomainResult};

/// Rank for names no rule claims: after named categories, before the catch-all group.
pub const DEFAULT_RANK: u32 = 500;

/// Declarative form of one chart rule, as stored in configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankRuleSpec {
    /// Case-insensitive regex matched against the unit name
    pub pattern: String,
    /// Fixed rank, or base rank when `ordinal` is set
    pub rank: u32,
    /// Capture group 1 holds a Roman or Arabic ordinal added to `rank`
    #[serde(default)]
    pub ordinal: bool,
}

impl RankRuleSpec {
    pub fn fixed(pattern: &str, rank: u32) -> Self {
        Self {
            pattern: pattern.to_string(),
            rank,
            ordinal: false,
        }
    }

    pub fn ordinal(pattern: &str, base_rank: u32) -> Self {
        Self {
            pattern: pattern.to_string(),
            rank: base_rank,
            ordinal: true,
        }
    }
}

/// Built-in organization chart, evaluated top to bottom.
pub fn default_chart() -> Vec<RankRuleSpec> {
    vec![
        RankRuleSpec::fixed(r"^Sekretariat Utama", 10),
        RankRuleSpec::fixed(r"^Inspektorat Utama", 20),
        RankRuleSpec::fixed(r"^Deputi", 30),
        RankRuleSpec::fixed(r"^Pusat", 40),
        RankRuleSpec::ordinal(r"^Kantor Regional\s+([IVXLC]+|\d+)\b", 100),
        RankRuleSpec::fixed(r"^(UPT|Unit Pelaksana Teknis|Lainnya)\b", 900),
    ]
}

/// Compiled chart rule.
#[derive(Debug, Clone)]
pub enum RankRule {
    Fixed { regex: Regex, rank: u32 },
    Ordinal { regex: Regex, base_rank: u32 },
}

impl RankRule {
    pub fn compile(spec: &RankRuleSpec) -> DomainResult<Self> {
        let regex = RegexBuilder::new(&spec.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::InvalidRankRule {
                pattern: spec.pattern.clone(),
                reason: e.to_string(),
            })?;

        if spec.ordinal && regex.captures_len() < 2 {
            return Err(DomainError::InvalidRankRule {
                pattern: spec.pattern.clone(),
                reason: "ordinal rule needs a capture group".to_string(),
            });
        }

        Ok(if spec.ordinal {
            RankRule::Ordinal {
                regex,
                base_rank: spec.rank,
            }
        } else {
            RankRule::Fixed {
                regex,
                rank: spec.rank,
            }
        })
    }

    /// Rank for `name`, or `None` when the rule does not apply.
    pub fn rank(&self, name: &str) -> Option<u32> {
        match self {
            RankRule::Fixed { regex, rank } => regex.is_match(name).then_some(*rank),
            RankRule::Ordinal { regex, base_rank } => {
                let caps = regex.captures(name)?;
                let ordinal = parse_ordinal(caps.get(1)?.as_str())?;
                Some(base_rank.saturating_add(ordinal))
            }
        }
    }
}

/// Parse an Arabic or Roman ordinal ("7", "XIV").
pub fn parse_ordinal(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }

    let mut total: i64 = 0;
    let mut prev: i64 = 0;
    for c in s.chars().rev() {
        let value = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            _ => return None,
        };
        if value < prev {
            total -= value;
        } else {
            total += value;
            prev = value;
        }
    }
    u32::try_from(total).ok().filter(|n| *n > 0)
}

/// Root and sibling ordering.
#[derive(Debug, Clone)]
pub struct OrderingPolicy {
    rules: Vec<RankRule>,
    default_rank: u32,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        Self::compile(&default_chart(), DEFAULT_RANK).expect("built-in chart patterns are valid")
    }
}

impl OrderingPolicy {
    #[instrument(level = "debug")]
    pub fn compile(chart: &[RankRuleSpec], default_rank: u32) -> DomainResult<Self> {
        let rules = chart
            .iter()
            .map(RankRule::compile)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self {
            rules,
            default_rank,
        })
    }

    /// Chart rank of a root name; first matching rule wins.
    ///
    /// An ordinal rule whose base sits below the default rank never ranks at
    /// or past it: large ordinals are capped at `default_rank - 1` and fall
    /// back to name order among themselves.
    pub fn root_rank(&self, name: &str) -> u32 {
        self.rules
            .iter()
            .find_map(|rule| match rule {
                RankRule::Ordinal { base_rank, .. } if *base_rank < self.default_rank => rule
                    .rank(name)
                    .map(|rank| rank.min(self.default_rank - 1)),
                _ => rule.rank(name),
            })
            .unwrap_or(self.default_rank)
    }

    /// Sort roots by chart rank, then name.
    pub fn sort_roots(&self, units: &mut [&Unit]) {
        units.sort_by_cached_key(|u| (self.root_rank(&u.name), name_key(u)));
    }

    /// Sort siblings by eselon depth, then name.
    pub fn sort_siblings(&self, units: &mut [&Unit]) {
        units.sort_by_cached_key(|u| (u.depth(), name_key(u)));
    }
}

/// Total name order: case-folded name, raw name, then id for duplicate names.
fn name_key(unit: &Unit) -> (String, String, i64) {
    (unit.name.to_lowercase(), unit.name.clone(), unit.id.0)
}
