//! User profiles: per-attribute taste summaries built from exemplar plants.
//!
//! A profile condenses the user's exemplars into one statistic per schema
//! attribute. Boolean attributes get a centered true-ratio, categorical
//! attributes get a preference count per vocabulary token (with a running
//! total in the last slot), and numeric and color attributes need no
//! summary because scoring compares against the exemplar vectors directly.

use serde::{Deserialize, Serialize};

use crate::data::Item;
use crate::error::{Result, ViveroError};
use crate::schema::{AttributeKind, Schema};

/// Default rating attached to an exemplar when none is given.
pub const DEFAULT_RATING: f32 = 5.0;

/// A catalog item the user singled out, referenced by index.
///
/// Holding an index (not a copy of the item) means exemplar vectors are
/// always as fresh as the catalog itself: when an encoding pass re-encodes
/// the catalog, the exemplars follow automatically.
///
/// The rating is recorded alongside but is not consulted by the current
/// scorers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    item: usize,
    rating: f32,
}

impl Exemplar {
    /// Reference an item with the default rating.
    #[must_use]
    pub fn new(item: usize) -> Self {
        Self {
            item,
            rating: DEFAULT_RATING,
        }
    }

    /// Override the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    /// Index of the referenced item.
    #[must_use]
    pub fn item(&self) -> usize {
        self.item
    }

    /// Recorded rating.
    #[must_use]
    pub fn rating(&self) -> f32 {
        self.rating
    }
}

/// Per-attribute summary inside a [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeStats {
    /// No summary needed: scoring reads the exemplar vectors directly.
    Direct,
    /// Fraction of exemplars with the flag set, centered on zero.
    ///
    /// Ranges over `[-0.5, 0.5]`: +0.5 when every exemplar has the flag,
    /// -0.5 when none does.
    TrueRatio {
        /// The centered ratio
        ratio: f32,
    },
    /// Count of exemplar hits per vocabulary token.
    ///
    /// One slot per token in vocabulary order, plus a trailing slot holding
    /// the total number of token hits across all exemplars. An exemplar
    /// with two tokens contributes two hits to the total.
    Categories {
        /// Token counts followed by the running total
        distribution: Vec<f32>,
    },
}

impl AttributeStats {
    /// Short name for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeStats::Direct => "direct",
            AttributeStats::TrueRatio { .. } => "true-ratio",
            AttributeStats::Categories { .. } => "categories",
        }
    }
}

/// A user's taste summary: one [`AttributeStats`] per schema attribute,
/// in declaration order.
///
/// Built by [`build_profile`] and consumed by
/// [`recommend`](crate::recommend::recommend). A profile is a snapshot: if
/// the schema's vocabularies grow afterwards, scoring rejects it and a new
/// profile must be built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    stats: Vec<AttributeStats>,
}

impl UserProfile {
    /// Per-attribute statistics in schema declaration order.
    #[must_use]
    pub fn stats(&self) -> &[AttributeStats] {
        &self.stats
    }

    /// Statistics for one attribute by declaration index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AttributeStats> {
        self.stats.get(index)
    }

    /// Number of attributes summarized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns `true` if the profile covers no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Shannon diversity (bits) of the user's category preferences for one
    /// attribute.
    ///
    /// Measures how spread-out the exemplars are across that attribute's
    /// vocabulary: 0 when all hits land on one token, `log2(k)` when they
    /// are spread evenly over `k` tokens. Returns `None` for attributes
    /// without a category distribution.
    #[must_use]
    pub fn diversity(&self, index: usize) -> Option<f32> {
        match self.stats.get(index)? {
            AttributeStats::Categories { distribution } => {
                let (_total, counts) = distribution.split_last()?;
                Some(shannon_diversity(counts))
            }
            _ => None,
        }
    }
}

/// Summarize the exemplars into one [`AttributeStats`] per attribute.
///
/// # Errors
///
/// - [`ViveroError::EmptyExemplarSet`] if `exemplars` is empty.
/// - [`ViveroError::ExemplarOutOfRange`] if an exemplar index does not
///   point into `items`.
/// - [`ViveroError::SchemaMismatch`] if an exemplar's vector width is not
///   the schema width (it was never encoded, or the schema moved on).
///
/// # Examples
///
/// ```
/// use vivero::data::Item;
/// use vivero::encoding::init_features;
/// use vivero::profile::{build_profile, AttributeStats, Exemplar};
/// use vivero::schema::{AttributeDef, Schema};
///
/// let mut schema = Schema::new(vec![
///     AttributeDef::boolean("blooms"),
///     AttributeDef::categorical("family"),
/// ])
/// .unwrap();
/// let mut items = vec![
///     Item::new("A").with("blooms", true).with("family", "rose"),
///     Item::new("B").with("blooms", false).with("family", "bamboo"),
/// ];
/// init_features(&mut schema, &mut items).unwrap();
///
/// let profile = build_profile(&items, &[Exemplar::new(0)], &schema).unwrap();
/// assert_eq!(profile.get(0), Some(&AttributeStats::TrueRatio { ratio: 0.5 }));
/// assert_eq!(
///     profile.get(1),
///     Some(&AttributeStats::Categories { distribution: vec![1.0, 0.0, 1.0] })
/// );
/// ```
pub fn build_profile(items: &[Item], exemplars: &[Exemplar], schema: &Schema) -> Result<UserProfile> {
    if exemplars.is_empty() {
        return Err(ViveroError::EmptyExemplarSet);
    }

    let width = schema.n_features();
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
    }

    let n = exemplars.len() as f32;
    let mut stats = Vec::with_capacity(schema.len());
    for attr in schema.attributes() {
        let offset = attr.slot_offset();
        let summary = match attr.kind() {
            AttributeKind::Numeric { .. } | AttributeKind::Color => AttributeStats::Direct,
            AttributeKind::Boolean => {
                let set: f32 = exemplars
                    .iter()
                    .map(|e| items[e.item()].features()[offset])
                    .sum();
                AttributeStats::TrueRatio {
                    ratio: set / n - 0.5,
                }
            }
            AttributeKind::Categorical { vocabulary } => {
                let k = vocabulary.len();
                let mut distribution = vec![0.0; k + 1];
                for exemplar in exemplars {
                    let features = items[exemplar.item()].features();
                    for i in 0..k {
                        if features[offset + i] > 0.5 {
                            distribution[i] += 1.0;
                            distribution[k] += 1.0;
                        }
                    }
                }
                AttributeStats::Categories { distribution }
            }
        };
        stats.push(summary);
    }

    Ok(UserProfile { stats })
}

/// Shannon entropy in bits over a slice of non-negative counts.
///
/// Zero counts contribute nothing; an all-zero slice has zero diversity.
#[must_use]
pub fn shannon_diversity(counts: &[f32]) -> f32 {
    let total: f32 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    -counts
        .iter()
        .filter(|&&c| c > 0.0)
        .map(|&c| {
            let p = c / total;
            p * p.log2()
        })
        .sum::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Item;
    use crate::encoding::init_features;
    use crate::schema::AttributeDef;

    fn encoded_garden() -> (Schema, Vec<Item>) {
        let mut schema = Schema::new(vec![
            AttributeDef::boolean("blooms"),
            AttributeDef::numeric("height", "m"),
            AttributeDef::categorical("family"),
        ])
        .expect("valid schema");
        let mut items = vec![
            Item::new("A")
                .with("blooms", true)
                .with("height", 1.0)
                .with("family", "rose"),
            Item::new("B")
                .with("blooms", true)
                .with("height", 2.0)
                .with("family", "rose"),
            Item::new("C")
                .with("blooms", false)
                .with("height", 3.0)
                .with("family", "bamboo"),
        ];
        init_features(&mut schema, &mut items).expect("encode");
        (schema, items)
    }

    #[test]
    fn test_exemplar_default_rating() {
        let exemplar = Exemplar::new(3);
        assert_eq!(exemplar.item(), 3);
        assert_eq!(exemplar.rating(), DEFAULT_RATING);
        assert_eq!(Exemplar::new(3).with_rating(2.0).rating(), 2.0);
    }

    #[test]
    fn test_build_profile_requires_exemplars() {
        let (schema, items) = encoded_garden();
        let err = build_profile(&items, &[], &schema).expect_err("no exemplars");
        assert!(matches!(err, ViveroError::EmptyExemplarSet));
    }

    #[test]
    fn test_exemplar_out_of_range() {
        let (schema, items) = encoded_garden();
        let err =
            build_profile(&items, &[Exemplar::new(99)], &schema).expect_err("index 99");
        assert!(matches!(
            err,
            ViveroError::ExemplarOutOfRange { index: 99, len: 3 }
        ));
    }

    #[test]
    fn test_unencoded_exemplar_errors() {
        let (schema, mut items) = encoded_garden();
        items.push(Item::new("unencoded").with("blooms", true));
        let err = build_profile(&items, &[Exemplar::new(3)], &schema)
            .expect_err("no feature vector");
        assert!(matches!(err, ViveroError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_true_ratio_all_bloom() {
        let (schema, items) = encoded_garden();
        let exemplars = [Exemplar::new(0), Exemplar::new(1)];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        assert_eq!(profile.get(0), Some(&AttributeStats::TrueRatio { ratio: 0.5 }));
    }

    #[test]
    fn test_true_ratio_mixed() {
        let (schema, items) = encoded_garden();
        let exemplars = [Exemplar::new(0), Exemplar::new(2)];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        match profile.get(0) {
            Some(AttributeStats::TrueRatio { ratio }) => assert!(ratio.abs() < 1e-6),
            other => panic!("expected TrueRatio, got {other:?}"),
        }
    }

    #[test]
    fn test_direct_stats_for_numeric() {
        let (schema, items) = encoded_garden();
        let profile =
            build_profile(&items, &[Exemplar::new(0)], &schema).expect("profile");
        assert_eq!(profile.get(1), Some(&AttributeStats::Direct));
        assert_eq!(profile.len(), 3);
    }

    #[test]
    fn test_category_distribution_counts_and_total() {
        let (schema, items) = encoded_garden();
        let exemplars = [Exemplar::new(0), Exemplar::new(1), Exemplar::new(2)];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        // rose twice, bamboo once, three hits total.
        assert_eq!(
            profile.get(2),
            Some(&AttributeStats::Categories {
                distribution: vec![2.0, 1.0, 3.0]
            })
        );
    }

    #[test]
    fn test_multi_token_exemplar_counts_each_hit() {
        let mut schema = Schema::new(vec![AttributeDef::categorical("family")])
            .expect("valid schema");
        let mut items = vec![
            Item::new("hybrid").with("family", "rose,fern"),
            Item::new("plain").with("family", "rose"),
        ];
        init_features(&mut schema, &mut items).expect("encode");

        let profile =
            build_profile(&items, &[Exemplar::new(0)], &schema).expect("profile");
        assert_eq!(
            profile.get(0),
            Some(&AttributeStats::Categories {
                distribution: vec![1.0, 1.0, 2.0]
            })
        );
    }

    #[test]
    fn test_diversity_single_token_is_zero() {
        let (schema, items) = encoded_garden();
        let exemplars = [Exemplar::new(0), Exemplar::new(1)];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        let d = profile.diversity(2).expect("categorical attribute");
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_diversity_even_split_is_one_bit() {
        let (schema, items) = encoded_garden();
        let exemplars = [Exemplar::new(0), Exemplar::new(2)];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        let d = profile.diversity(2).expect("categorical attribute");
        assert!((d - 1.0).abs() < 1e-6, "even rose/bamboo split, got {d}");
    }

    #[test]
    fn test_diversity_none_for_other_kinds() {
        let (schema, items) = encoded_garden();
        let profile =
            build_profile(&items, &[Exemplar::new(0)], &schema).expect("profile");
        assert_eq!(profile.diversity(0), None);
        assert_eq!(profile.diversity(1), None);
        assert_eq!(profile.diversity(9), None);
    }

    #[test]
    fn test_shannon_diversity_values() {
        assert!(shannon_diversity(&[]).abs() < 1e-6);
        assert!(shannon_diversity(&[0.0, 0.0]).abs() < 1e-6);
        assert!(shannon_diversity(&[4.0]).abs() < 1e-6);
        assert!((shannon_diversity(&[1.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((shannon_diversity(&[1.0, 1.0, 1.0, 1.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let (schema, items) = encoded_garden();
        let profile =
            build_profile(&items, &[Exemplar::new(0)], &schema).expect("profile");
        let json = serde_json::to_string(&profile).expect("serialize");
        let restored: UserProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, profile);
    }
}
