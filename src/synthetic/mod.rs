//! Synthetic plant catalogs for benchmarks, property tests and demos.
//!
//! Generators are seeded, so a fixed seed reproduces the same catalog on
//! every run. Pass `None` to draw from entropy instead.
//!
//! # Quick Start
//!
//! ```
//! use vivero::encoding::init_features;
//! use vivero::synthetic::{catalog_schema, random_catalog};
//!
//! let mut schema = catalog_schema().unwrap();
//! let mut items = random_catalog(50, Some(42));
//! init_features(&mut schema, &mut items).unwrap();
//! assert_eq!(items.len(), 50);
//! assert!(items.iter().all(|p| p.features().len() == schema.n_features()));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::Item;
use crate::encoding::color;
use crate::error::Result;
use crate::schema::{AttributeDef, Schema};

/// Plant families drawn from when generating items.
const FAMILIES: [&str; 10] = [
    "Rosaceae",
    "Poaceae",
    "Asteraceae",
    "Fabaceae",
    "Lamiaceae",
    "Orchidaceae",
    "Cactaceae",
    "Pinaceae",
    "Liliaceae",
    "Ericaceae",
];

/// Fraction of generated items carrying two family tokens.
const HYBRID_RATE: f64 = 0.15;

/// The four-attribute demo schema: blooms, height, flower color, family.
///
/// # Errors
///
/// Never fails in practice; the declarations are fixed and valid.
pub fn catalog_schema() -> Result<Schema> {
    Schema::new(vec![
        AttributeDef::boolean("blooms"),
        AttributeDef::numeric("height", "m"),
        AttributeDef::color("flower_color"),
        AttributeDef::categorical("family"),
    ])
}

/// Generate `n` random plants carrying the [`catalog_schema`] attributes.
///
/// Heights span 0.05 m to 30 m, colors come from the full palette, and a
/// small fraction of items are hybrids with two comma-joined families so
/// multi-hot encoding gets exercised.
#[must_use]
pub fn random_catalog(n: usize, seed: Option<u64>) -> Vec<Item> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    (0..n)
        .map(|i| {
            let family = if rng.gen_bool(HYBRID_RATE) {
                let a = FAMILIES[rng.gen_range(0..FAMILIES.len())];
                let b = FAMILIES[rng.gen_range(0..FAMILIES.len())];
                format!("{a},{b}")
            } else {
                FAMILIES[rng.gen_range(0..FAMILIES.len())].to_string()
            };
            let palette_pick = rng.gen_range(0..color::PALETTE.len());

            Item::new(format!("plant-{i:04}"))
                .with("blooms", rng.gen_bool(0.6))
                .with("height", rng.gen_range(0.05_f32..30.0))
                .with("flower_color", color::PALETTE[palette_pick])
                .with("family", family)
        })
        .collect()
}
