//! Feature encoding: dense vectors from raw typed attributes.
//!
//! Encoding is incremental. A catalog grows batch by batch, and each batch
//! may teach the schema something new: unseen category tokens append to
//! vocabularies (widening the vector), and numeric values outside the
//! observed bounds widen them (never shrink). Both changes can invalidate
//! vectors encoded earlier, so [`encode_batch`] takes the already-encoded
//! items along and repairs them in place:
//!
//! - vocabulary growth moves slot offsets, so every existing item is
//!   re-encoded from its raw values under the new layout;
//! - a pure bound widening only rescales the affected numeric slot, so just
//!   that slot is recomputed for existing items.
//!
//! Per-kind encodings:
//!
//! - numeric: `(value - min) / (max - min)` against the schema's observed
//!   bounds, 0 when the range is degenerate
//! - boolean: 1 or 0
//! - color: three RGB channels in `[0, 1]` via [`color::resolve`]
//! - categorical: multi-hot over the vocabulary; raw text is split on
//!   commas without trimming, so `"rose, fern"` yields the tokens `"rose"`
//!   and `" fern"`
//!
//! New items are validated (every required attribute present, every raw
//! value of the right kind) before the schema is touched, so a rejected
//! batch leaves schema and catalog exactly as they were.

pub mod color;

use crate::data::{Item, RawValue};
use crate::error::{Result, ViveroError};
use crate::schema::{AttributeDef, AttributeKind, Schema};

/// Bounds narrower than this normalize to 0 instead of dividing.
const BOUNDS_EPSILON: f32 = 1e-10;

/// Encode a first batch of items against a fresh schema.
///
/// Shorthand for [`encode_batch`] with no existing items.
///
/// # Errors
///
/// Returns an error if any item is missing a required attribute or carries
/// a raw value of the wrong kind.
///
/// # Examples
///
/// ```
/// use vivero::data::Item;
/// use vivero::encoding::init_features;
/// use vivero::schema::{AttributeDef, Schema};
///
/// let mut schema = Schema::new(vec![
///     AttributeDef::boolean("blooms"),
///     AttributeDef::numeric("height", "m"),
/// ])
/// .unwrap();
/// let mut items = vec![
///     Item::new("Rosa canina").with("blooms", true).with("height", 1.0),
///     Item::new("Quercus robur").with("blooms", false).with("height", 3.0),
/// ];
/// init_features(&mut schema, &mut items).unwrap();
/// assert_eq!(items[0].features(), &[1.0, 0.0]);
/// assert_eq!(items[1].features(), &[0.0, 1.0]);
/// ```
pub fn init_features(schema: &mut Schema, items: &mut [Item]) -> Result<()> {
    encode_batch(schema, items, &mut [])
}

/// Encode a batch of new items, updating the schema and repairing the
/// vectors of already-encoded items where the batch changed their meaning.
///
/// `existing_items` must all have been encoded under the current schema;
/// disjoint slices of one catalog vector work naturally:
///
/// ```
/// use vivero::data::Item;
/// use vivero::encoding::encode_batch;
/// use vivero::schema::{AttributeDef, Schema};
///
/// let mut schema = Schema::new(vec![
///     AttributeDef::numeric("height", "m"),
///     AttributeDef::categorical("family"),
/// ])
/// .unwrap();
///
/// let mut catalog = vec![
///     Item::new("Rosa canina")
///         .with("height", 2.0)
///         .with("family", "Rosaceae"),
/// ];
/// encode_batch(&mut schema, &mut catalog, &mut []).unwrap();
/// assert_eq!(schema.n_features(), 2);
///
/// // The next batch introduces a new family: the vocabulary grows and the
/// // first item's vector is re-encoded to the new width in place.
/// let mut batch = vec![
///     Item::new("Phyllostachys aurea")
///         .with("height", 6.0)
///         .with("family", "Poaceae"),
/// ];
/// encode_batch(&mut schema, &mut batch, &mut catalog).unwrap();
/// catalog.extend(batch);
/// assert_eq!(schema.n_features(), 3);
/// assert_eq!(catalog[0].features(), &[0.0, 1.0, 0.0]);
/// ```
///
/// # Errors
///
/// - [`ViveroError::MissingAttribute`] / [`ViveroError::TypeMismatch`] if a
///   new item's raw values don't satisfy the schema (checked before any
///   schema mutation).
/// - [`ViveroError::UnknownCategory`] if an existing item being re-encoded
///   carries a token the vocabulary never registered, which means it was
///   edited outside an encoding pass.
/// - [`ViveroError::SchemaMismatch`] if an existing item's vector width is
///   stale while nothing in this batch would rebuild it.
pub fn encode_batch(
    schema: &mut Schema,
    new_items: &mut [Item],
    existing_items: &mut [Item],
) -> Result<()> {
    validate_items(schema, new_items)?;

    let grew = grow_vocabularies(schema, new_items);
    if grew {
        schema.assign_slots();
    }
    let widened = merge_numeric_bounds(schema, new_items);

    if grew {
        // Slot offsets moved: rebuild every existing vector from raw values.
        for item in existing_items.iter_mut() {
            encode_item(schema, item)?;
        }
    } else {
        let width = schema.n_features();
        for item in existing_items.iter() {
            if item.features().len() != width {
                return Err(ViveroError::width_mismatch(
                    &format!("vector for item '{}'", item.name()),
                    width,
                    item.features().len(),
                ));
            }
        }
        renormalize_existing(schema, &widened, existing_items)?;
    }

    for item in new_items.iter_mut() {
        encode_item(schema, item)?;
    }
    Ok(())
}

/// Check presence and kind of every raw value before mutating anything.
fn validate_items(schema: &Schema, items: &[Item]) -> Result<()> {
    for item in items {
        for attr in schema.attributes() {
            match attr.kind() {
                AttributeKind::Numeric { .. } => {
                    raw_numeric(item, attr)?;
                }
                AttributeKind::Boolean => {
                    raw_flag(item, attr)?;
                }
                AttributeKind::Color | AttributeKind::Categorical { .. } => {
                    raw_text(item, attr)?;
                }
            }
        }
    }
    Ok(())
}

/// Register every category token in the batch; returns whether any
/// vocabulary gained a token.
fn grow_vocabularies(schema: &mut Schema, new_items: &[Item]) -> bool {
    let mut grew = false;
    for attr in schema.attributes_mut() {
        if !matches!(attr.kind(), AttributeKind::Categorical { .. }) {
            continue;
        }
        for item in new_items {
            let Some(text) = item.value(attr.name()).and_then(RawValue::as_text) else {
                continue;
            };
            if let AttributeKind::Categorical { vocabulary } = attr.kind_mut() {
                let before = vocabulary.len();
                for token in text.split(',') {
                    vocabulary.register(token);
                }
                grew |= vocabulary.len() > before;
            }
        }
    }
    grew
}

/// Widen numeric bounds to cover the batch; returns one flag per attribute
/// saying whether its bounds moved.
fn merge_numeric_bounds(schema: &mut Schema, new_items: &[Item]) -> Vec<bool> {
    let mut widened = vec![false; schema.len()];
    for (i, attr) in schema.attributes_mut().iter_mut().enumerate() {
        if !matches!(attr.kind(), AttributeKind::Numeric { .. }) {
            continue;
        }

        let mut batch: Option<(f32, f32)> = None;
        for item in new_items {
            let Some(v) = item.value(attr.name()).and_then(RawValue::as_numeric) else {
                continue;
            };
            batch = Some(match batch {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        let Some((batch_min, batch_max)) = batch else {
            continue;
        };

        if let AttributeKind::Numeric { bounds, .. } = attr.kind_mut() {
            match bounds {
                None => {
                    *bounds = Some((batch_min, batch_max));
                    widened[i] = true;
                }
                Some((min, max)) => {
                    let new_min = min.min(batch_min);
                    let new_max = max.max(batch_max);
                    if new_min < *min || new_max > *max {
                        *bounds = Some((new_min, new_max));
                        widened[i] = true;
                    }
                }
            }
        }
    }
    widened
}

/// Recompute the numeric slots whose bounds moved, for every existing item.
fn renormalize_existing(schema: &Schema, widened: &[bool], existing: &mut [Item]) -> Result<()> {
    for (i, attr) in schema.attributes().iter().enumerate() {
        if !widened[i] {
            continue;
        }
        let (min, max) = match attr.kind() {
            AttributeKind::Numeric {
                bounds: Some((min, max)),
                ..
            } => (*min, *max),
            _ => continue,
        };
        let offset = attr.slot_offset();
        for item in existing.iter_mut() {
            let Some(raw) = raw_numeric(item, attr)? else {
                continue;
            };
            item.features_mut()[offset] = normalize(raw, min, max);
        }
    }
    Ok(())
}

/// Write every slot of one item from its raw values.
fn encode_item(schema: &Schema, item: &mut Item) -> Result<()> {
    item.reset_features(schema.n_features());
    for attr in schema.attributes() {
        let offset = attr.slot_offset();
        match attr.kind() {
            AttributeKind::Numeric { bounds, .. } => {
                let Some(raw) = raw_numeric(item, attr)? else {
                    continue;
                };
                let Some((min, max)) = *bounds else {
                    continue;
                };
                item.features_mut()[offset] = normalize(raw, min, max);
            }
            AttributeKind::Boolean => {
                let Some(flag) = raw_flag(item, attr)? else {
                    continue;
                };
                item.features_mut()[offset] = if flag { 1.0 } else { 0.0 };
            }
            AttributeKind::Color => {
                let Some(text) = raw_text(item, attr)? else {
                    continue;
                };
                let rgb = color::resolve(text);
                item.features_mut()[offset..offset + 3].copy_from_slice(&rgb);
            }
            AttributeKind::Categorical { vocabulary } => {
                let Some(text) = raw_text(item, attr)? else {
                    continue;
                };
                let mut hits = Vec::new();
                for token in text.split(',') {
                    let slot = vocabulary.index_of(token).ok_or_else(|| {
                        ViveroError::UnknownCategory {
                            attribute: attr.name().to_string(),
                            token: token.to_string(),
                        }
                    })?;
                    hits.push(slot);
                }
                for slot in hits {
                    item.features_mut()[offset + slot] = 1.0;
                }
            }
        }
    }
    Ok(())
}

fn normalize(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range.abs() > BOUNDS_EPSILON {
        (value - min) / range
    } else {
        0.0
    }
}

fn raw_numeric(item: &Item, attr: &AttributeDef) -> Result<Option<f32>> {
    match item.value(attr.name()) {
        Some(RawValue::Numeric(v)) if v.is_finite() => Ok(Some(*v)),
        Some(RawValue::Numeric(v)) => Err(format!(
            "non-finite value {v} for attribute '{}' on item '{}'",
            attr.name(),
            item.name()
        )
        .into()),
        Some(other) => Err(ViveroError::type_mismatch(
            attr.name(),
            "numeric",
            other.kind_name(),
        )),
        None if attr.is_optional() => Ok(None),
        None => Err(ViveroError::missing_attribute(item.name(), attr.name())),
    }
}

fn raw_flag(item: &Item, attr: &AttributeDef) -> Result<Option<bool>> {
    match item.value(attr.name()) {
        Some(RawValue::Flag(v)) => Ok(Some(*v)),
        Some(other) => Err(ViveroError::type_mismatch(
            attr.name(),
            "flag",
            other.kind_name(),
        )),
        None if attr.is_optional() => Ok(None),
        None => Err(ViveroError::missing_attribute(item.name(), attr.name())),
    }
}

fn raw_text<'a>(item: &'a Item, attr: &AttributeDef) -> Result<Option<&'a str>> {
    match item.value(attr.name()) {
        Some(RawValue::Text(s)) => Ok(Some(s)),
        Some(other) => Err(ViveroError::type_mismatch(
            attr.name(),
            "text",
            other.kind_name(),
        )),
        None if attr.is_optional() => Ok(None),
        None => Err(ViveroError::missing_attribute(item.name(), attr.name())),
    }
}
