//! Priority-weighted scoring of a catalog against a user profile.
//!
//! Every candidate gets one similarity score per attribute, each in terms
//! of the user's exemplars or profile statistics:
//!
//! - numeric: `1 - sqrt(Σ (candidate - exemplar)²)` over all exemplars, so
//!   a large or disagreeing exemplar set pulls the score down and can push
//!   it below zero
//! - boolean: `0.5 + v·r - (1 - v)·r` with `v` the candidate flag and `r`
//!   the profile's centered true-ratio
//! - color: mean over exemplars of `1 - (mean absolute channel distance)`
//! - categorical: walk the vocabulary in order; at each token the candidate
//!   carries, add that token's preference count and divide the accumulator
//!   by the distribution total
//!
//! The final score is the priority-weighted average over attributes. Only
//! candidates with every slot in `[0, 1]` and a single-token match can
//! reach 1.0; mixed evidence lands lower, and numeric disagreement may go
//! negative. Results come back sorted descending, ties keeping catalog
//! order.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::Item;
use crate::error::{Result, ViveroError};
use crate::profile::{AttributeStats, Exemplar, UserProfile};
use crate::schema::{AttributeKind, Schema};

/// One scored candidate: catalog index plus its weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Index of the candidate in the item slice
    pub item: usize,
    /// Priority-weighted similarity score
    pub score: f32,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}: {:.4}", self.item, self.score)
    }
}

/// Per-attribute scorer with its profile data resolved up front, so the
/// candidate loop dispatches on a plain match.
enum AttrScorer<'a> {
    Numeric { slot: usize },
    Boolean { slot: usize, ratio: f32 },
    Color { slot: usize },
    Categorical { slot: usize, tokens: usize, distribution: &'a [f32] },
}

impl AttrScorer<'_> {
    fn score(&self, candidate: &[f32], exemplars: &[&[f32]]) -> f32 {
        match self {
            AttrScorer::Numeric { slot } => {
                let sum_sq: f32 = exemplars
                    .iter()
                    .map(|ex| {
                        let d = candidate[*slot] - ex[*slot];
                        d * d
                    })
                    .sum();
                1.0 - sum_sq.sqrt()
            }
            AttrScorer::Boolean { slot, ratio } => {
                let v = candidate[*slot];
                0.5 + v * ratio - (1.0 - v) * ratio
            }
            AttrScorer::Color { slot } => {
                let mut acc = 0.0;
                for ex in exemplars {
                    let mut diff = 0.0;
                    for channel in 0..3 {
                        diff += (candidate[slot + channel] - ex[slot + channel]).abs();
                    }
                    acc += 1.0 - diff / 3.0;
                }
                acc / exemplars.len() as f32
            }
            AttrScorer::Categorical {
                slot,
                tokens,
                distribution,
            } => {
                // The trailing distribution entry is the total hit count.
                // A zero total means no exemplar carried this attribute,
                // so there is no preference signal at all.
                let total = distribution[*tokens];
                if total <= 0.0 {
                    return 0.0;
                }
                let mut acc = 0.0;
                for i in 0..*tokens {
                    if candidate[slot + i] > 0.5 {
                        acc += distribution[i];
                        acc /= total;
                    }
                }
                acc
            }
        }
    }
}

/// Score every candidate against the profile and rank descending.
///
/// With `exclude_exemplars` set, the user's own exemplars are left out of
/// the ranking; otherwise they are scored like any other candidate.
/// `Recommendation::item` indexes into `items` either way.
///
/// # Errors
///
/// - [`ViveroError::EmptyExemplarSet`] if `exemplars` is empty.
/// - [`ViveroError::ExemplarOutOfRange`] if an exemplar index does not
///   point into `items`.
/// - [`ViveroError::ZeroPriority`] if every attribute priority is zero.
/// - [`ViveroError::SchemaMismatch`] if any vector width or profile shape
///   disagrees with the schema, e.g. a vocabulary grew after the profile
///   was built.
///
/// # Examples
///
/// ```
/// use vivero::data::Item;
/// use vivero::encoding::init_features;
/// use vivero::profile::{build_profile, Exemplar};
/// use vivero::recommend::recommend;
/// use vivero::schema::{AttributeDef, Schema};
///
/// let mut schema = Schema::new(vec![
///     AttributeDef::boolean("blooms"),
///     AttributeDef::numeric("height", "m"),
///     AttributeDef::categorical("family"),
/// ])
/// .unwrap();
/// let mut items = vec![
///     Item::new("A").with("blooms", true).with("height", 1.0).with("family", "rose"),
///     Item::new("B").with("blooms", true).with("height", 2.0).with("family", "rose"),
///     Item::new("C").with("blooms", false).with("height", 3.0).with("family", "bamboo"),
/// ];
/// init_features(&mut schema, &mut items).unwrap();
///
/// let exemplars = vec![Exemplar::new(0)];
/// let profile = build_profile(&items, &exemplars, &schema).unwrap();
/// let ranked = recommend(&items, &exemplars, &schema, &profile, true).unwrap();
///
/// // B shares the user's family and bloom habit; C shares neither.
/// assert_eq!(ranked[0].item, 1);
/// assert_eq!(ranked[1].item, 2);
/// ```
pub fn recommend(
    items: &[Item],
    exemplars: &[Exemplar],
    schema: &Schema,
    profile: &UserProfile,
    exclude_exemplars: bool,
) -> Result<Vec<Recommendation>> {
    if exemplars.is_empty() {
        return Err(ViveroError::EmptyExemplarSet);
    }

    let width = schema.n_features();
    let mut exemplar_features: Vec<&[f32]> = Vec::with_capacity(exemplars.len());
    for exemplar in exemplars {
        let Some(item) = items.get(exemplar.item()) else {
            return Err(ViveroError::ExemplarOutOfRange {
                index: exemplar.item(),
                len: items.len(),
            });
        };
        if item.features().len() != width {
            return Err(ViveroError::width_mismatch(
                &format!("vector for exemplar '{}'", item.name()),
                width,
                item.features().len(),
            ));
        }
        exemplar_features.push(item.features());
    }

    let total_priority = schema.total_priority();
    if total_priority <= 0.0 {
        return Err(ViveroError::ZeroPriority);
    }

    let scorers = attribute_scorers(schema, profile)?;

    let mut results = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if exclude_exemplars && exemplars.iter().any(|e| e.item() == index) {
            continue;
        }
        if item.features().len() != width {
            return Err(ViveroError::width_mismatch(
                &format!("vector for item '{}'", item.name()),
                width,
                item.features().len(),
            ));
        }

        let candidate = item.features();
        let mut score = 0.0;
        for (priority, scorer) in &scorers {
            score += priority * scorer.score(candidate, &exemplar_features);
        }
        results.push(Recommendation {
            item: index,
            score: score / total_priority,
        });
    }

    // Stable sort: equal scores keep catalog order.
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Ok(results)
}

/// Pair every attribute with its scorer, verifying the profile still
/// matches the schema's shape.
fn attribute_scorers<'a>(
    schema: &Schema,
    profile: &'a UserProfile,
) -> Result<Vec<(f32, AttrScorer<'a>)>> {
    if profile.len() != schema.len() {
        return Err(ViveroError::SchemaMismatch {
            expected: format!("profile covering {} attributes", schema.len()),
            actual: format!("{}", profile.len()),
        });
    }

    let mut scorers = Vec::with_capacity(schema.len());
    for (attr, stats) in schema.attributes().iter().zip(profile.stats()) {
        let slot = attr.slot_offset();
        let scorer = match (attr.kind(), stats) {
            (AttributeKind::Numeric { .. }, AttributeStats::Direct) => {
                AttrScorer::Numeric { slot }
            }
            (AttributeKind::Color, AttributeStats::Direct) => AttrScorer::Color { slot },
            (AttributeKind::Boolean, AttributeStats::TrueRatio { ratio }) => {
                AttrScorer::Boolean { slot, ratio: *ratio }
            }
            (AttributeKind::Categorical { vocabulary }, AttributeStats::Categories { distribution }) => {
                if distribution.len() != vocabulary.len() + 1 {
                    return Err(ViveroError::width_mismatch(
                        &format!("category distribution for '{}'", attr.name()),
                        vocabulary.len() + 1,
                        distribution.len(),
                    ));
                }
                AttrScorer::Categorical {
                    slot,
                    tokens: vocabulary.len(),
                    distribution,
                }
            }
            (kind, stats) => {
                let expected = match kind {
                    AttributeKind::Numeric { .. } | AttributeKind::Color => "direct",
                    AttributeKind::Boolean => "true-ratio",
                    AttributeKind::Categorical { .. } => "categories",
                };
                return Err(ViveroError::SchemaMismatch {
                    expected: format!("{expected} profile entry for attribute '{}'", attr.name()),
                    actual: stats.kind_name().to_string(),
                });
            }
        };
        scorers.push((attr.priority(), scorer));
    }
    Ok(scorers)
}
