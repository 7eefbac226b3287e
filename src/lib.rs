//! Vivero: content-based plant recommendation in pure Rust.
//!
//! Vivero encodes typed plant attributes into dense feature vectors, keeps
//! those vectors consistent as a catalog grows batch by batch, summarizes a
//! user's exemplar plants into a taste profile, and ranks the catalog by
//! priority-weighted similarity to that profile.
//!
//! # Quick Start
//!
//! ```
//! use vivero::prelude::*;
//!
//! // Declare the attributes every plant carries.
//! let mut schema = Schema::new(vec![
//!     AttributeDef::boolean("blooms"),
//!     AttributeDef::numeric("height", "m"),
//!     AttributeDef::categorical("family"),
//! ])
//! .unwrap();
//!
//! // Encode the catalog: vocabularies and numeric bounds are learned here.
//! let mut items = vec![
//!     Item::new("Rosa rubiginosa")
//!         .with("blooms", true)
//!         .with("height", 1.5)
//!         .with("family", "Rosaceae"),
//!     Item::new("Phyllostachys aurea")
//!         .with("blooms", false)
//!         .with("height", 6.0)
//!         .with("family", "Poaceae"),
//!     Item::new("Rosa canina")
//!         .with("blooms", true)
//!         .with("height", 2.5)
//!         .with("family", "Rosaceae"),
//! ];
//! init_features(&mut schema, &mut items).unwrap();
//!
//! // The user likes the first rose; rank everything else against it.
//! let exemplars = vec![Exemplar::new(0)];
//! let profile = build_profile(&items, &exemplars, &schema).unwrap();
//! let ranked = recommend(&items, &exemplars, &schema, &profile, true).unwrap();
//!
//! // The other rose beats the bamboo.
//! assert_eq!(items[ranked[0].item].name(), "Rosa canina");
//! ```
//!
//! # Modules
//!
//! - [`schema`]: Attribute declarations, slot layout, vocabularies
//! - [`data`]: Catalog items and raw attribute values
//! - [`encoding`]: Incremental feature encoding and re-encoding
//! - [`profile`]: Exemplars and per-attribute taste summaries
//! - [`recommend`]: Priority-weighted similarity scoring and ranking
//! - [`synthetic`]: Seeded random catalogs for benches and tests
//! - [`error`]: Error type and `Result` alias

pub mod data;
pub mod encoding;
pub mod error;
pub mod prelude;
pub mod profile;
pub mod recommend;
pub mod schema;
pub mod synthetic;

pub use error::{Result, ViveroError};
pub use schema::{AttributeDef, AttributeKind, Schema};
