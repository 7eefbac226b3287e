//! Attribute schemas: typed attribute definitions and feature slot layout.
//!
//! A [`Schema`] declares the attributes every catalog item carries, in a
//! fixed order. Each attribute owns a contiguous run of slots in the dense
//! feature vector:
//!
//! - numeric: 1 slot (min-max normalized)
//! - boolean: 1 slot (0 or 1)
//! - color: 3 slots (RGB channels scaled to `[0, 1]`)
//! - categorical: one slot per vocabulary token (multi-hot)
//!
//! Categorical vocabularies are append-only, so a token keeps its index for
//! the lifetime of the schema. When a vocabulary grows, the encoder calls
//! [`Schema::assign_slots`] internally and re-encodes affected items so that
//! slot positions stay consistent across the whole catalog.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViveroError};

/// Append-only token registry for one categorical attribute.
///
/// Tokens are assigned indices in first-seen order and never removed or
/// reordered, so the meaning of a multi-hot slot is stable once assigned.
///
/// # Examples
///
/// ```
/// use vivero::schema::Vocabulary;
///
/// let mut vocab = Vocabulary::new();
/// assert_eq!(vocab.register("Rosaceae"), 0);
/// assert_eq!(vocab.register("Poaceae"), 1);
/// assert_eq!(vocab.register("Rosaceae"), 0); // already known
/// assert_eq!(vocab.index_of("Poaceae"), Some(1));
/// assert_eq!(vocab.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token, returning its index.
    ///
    /// Known tokens keep their existing index; unknown tokens are appended.
    pub fn register(&mut self, token: &str) -> usize {
        if let Some(&i) = self.index.get(token) {
            return i;
        }
        let i = self.tokens.len();
        self.tokens.push(token.to_string());
        self.index.insert(token.to_string(), i);
        i
    }

    /// Look up a token's index without registering it.
    #[must_use]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Number of registered tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no token has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Registered tokens in index order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { tokens, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.tokens
    }
}

/// The value type of an attribute, which fixes its encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Continuous measurement, min-max normalized against observed bounds.
    Numeric {
        /// Unit of measure (informational, e.g. "m" or "cm")
        unit: String,
        /// Observed `(min, max)` bounds; `None` until a value is encoded
        bounds: Option<(f32, f32)>,
    },
    /// Yes/no flag encoded as 1 or 0.
    Boolean,
    /// Named color encoded as three RGB channels in `[0, 1]`.
    Color,
    /// Multi-valued category encoded as a multi-hot block.
    Categorical {
        /// Tokens observed so far, in registration order
        vocabulary: Vocabulary,
    },
}

impl AttributeKind {
    /// Number of feature slots this kind occupies.
    #[must_use]
    pub fn slot_width(&self) -> usize {
        match self {
            AttributeKind::Numeric { .. } | AttributeKind::Boolean => 1,
            AttributeKind::Color => 3,
            AttributeKind::Categorical { vocabulary } => vocabulary.len(),
        }
    }

    /// Short name for error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Numeric { .. } => "numeric",
            AttributeKind::Boolean => "boolean",
            AttributeKind::Color => "color",
            AttributeKind::Categorical { .. } => "categorical",
        }
    }
}

/// One attribute declaration: name, kind, priority and flags.
///
/// Built with the kind constructors plus chained modifiers:
///
/// ```
/// use vivero::schema::AttributeDef;
///
/// let height = AttributeDef::numeric("height", "m").with_priority(2.0);
/// let name = AttributeDef::categorical("cultivar").unique();
/// let scent = AttributeDef::boolean("fragrant").optional();
/// assert_eq!(height.priority(), 2.0);
/// assert!(name.is_unique());
/// assert!(scent.is_optional());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDef {
    name: String,
    kind: AttributeKind,
    priority: f32,
    unique: bool,
    optional: bool,
    slot_offset: usize,
}

impl AttributeDef {
    fn with_kind(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            priority: 1.0,
            unique: false,
            optional: false,
            slot_offset: 0,
        }
    }

    /// Declare a numeric attribute with a unit of measure.
    #[must_use]
    pub fn numeric(name: &str, unit: &str) -> Self {
        Self::with_kind(
            name,
            AttributeKind::Numeric {
                unit: unit.to_string(),
                bounds: None,
            },
        )
    }

    /// Declare a boolean attribute.
    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Self::with_kind(name, AttributeKind::Boolean)
    }

    /// Declare a named-color attribute.
    #[must_use]
    pub fn color(name: &str) -> Self {
        Self::with_kind(name, AttributeKind::Color)
    }

    /// Declare a categorical attribute with an empty vocabulary.
    #[must_use]
    pub fn categorical(name: &str) -> Self {
        Self::with_kind(
            name,
            AttributeKind::Categorical {
                vocabulary: Vocabulary::new(),
            },
        )
    }

    /// Set the scoring priority (default 1.0).
    ///
    /// Priorities must be finite and non-negative; [`Schema::new`] rejects
    /// anything else.
    #[must_use]
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark this attribute as the catalog's identity key.
    ///
    /// At most one attribute per schema may be unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Allow items to omit this attribute (slots stay zero).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute kind, including any fitted bounds or vocabulary.
    #[must_use]
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut AttributeKind {
        &mut self.kind
    }

    /// Scoring priority.
    #[must_use]
    pub fn priority(&self) -> f32 {
        self.priority
    }

    /// Whether this attribute is the identity key.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Whether items may omit this attribute.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// First feature slot owned by this attribute.
    #[must_use]
    pub fn slot_offset(&self) -> usize {
        self.slot_offset
    }

    /// Number of feature slots this attribute occupies.
    #[must_use]
    pub fn slot_width(&self) -> usize {
        self.kind.slot_width()
    }

    /// The contiguous slot range owned by this attribute.
    #[must_use]
    pub fn slot_range(&self) -> Range<usize> {
        self.slot_offset..self.slot_offset + self.kind.slot_width()
    }
}

/// Ordered attribute declarations plus the derived slot layout.
///
/// The schema is the single source of truth for how wide feature vectors
/// are and which slots belong to which attribute. Encoding passes take it
/// by `&mut` because vocabulary growth and bound widening mutate it; the
/// borrow checker then guarantees no two encoding passes interleave.
///
/// # Examples
///
/// ```
/// use vivero::schema::{AttributeDef, Schema};
///
/// let schema = Schema::new(vec![
///     AttributeDef::boolean("blooms"),
///     AttributeDef::numeric("height", "m"),
///     AttributeDef::color("flower_color"),
///     AttributeDef::categorical("family"),
/// ])
/// .unwrap();
///
/// // Empty vocabulary: 1 + 1 + 3 + 0 slots.
/// assert_eq!(schema.n_features(), 5);
/// assert_eq!(schema.attribute("flower_color").unwrap().slot_offset(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<AttributeDef>,
    n_features: usize,
}

impl Schema {
    /// Build a schema from attribute declarations and assign slot offsets.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration list is empty, two attributes
    /// share a name, more than one attribute is marked unique, or any
    /// priority is negative or non-finite.
    pub fn new(attributes: Vec<AttributeDef>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(ViveroError::EmptySchema);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(attributes.len());
        for attr in &attributes {
            if !seen.insert(attr.name()) {
                return Err(ViveroError::DuplicateAttribute {
                    name: attr.name().to_string(),
                });
            }
            if !attr.priority().is_finite() || attr.priority() < 0.0 {
                return Err(ViveroError::InvalidPriority {
                    attribute: attr.name().to_string(),
                    value: attr.priority(),
                });
            }
        }

        let mut unique_name: Option<&str> = None;
        for attr in &attributes {
            if attr.is_unique() {
                if let Some(first) = unique_name {
                    return Err(ViveroError::MultipleUniqueAttributes {
                        first: first.to_string(),
                        second: attr.name().to_string(),
                    });
                }
                unique_name = Some(attr.name());
            }
        }

        let mut schema = Self {
            attributes,
            n_features: 0,
        };
        schema.assign_slots();
        Ok(schema)
    }

    /// Recompute slot offsets and total width in declaration order.
    ///
    /// Called after any vocabulary growth; idempotent otherwise.
    pub(crate) fn assign_slots(&mut self) {
        let mut offset = 0;
        for attr in &mut self.attributes {
            attr.slot_offset = offset;
            offset += attr.kind.slot_width();
        }
        self.n_features = offset;
    }

    /// Attribute declarations in slot order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut [AttributeDef] {
        &mut self.attributes
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Position of an attribute in declaration order.
    #[must_use]
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    /// The attribute marked unique, if any.
    #[must_use]
    pub fn unique_attribute(&self) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.is_unique())
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the schema has no attributes.
    ///
    /// Always `false` for schemas built through [`Schema::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Total feature vector width under the current layout.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Sum of all attribute priorities.
    #[must_use]
    pub fn total_priority(&self) -> f32 {
        self.attributes.iter().map(AttributeDef::priority).sum()
    }
}
