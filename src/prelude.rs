//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use vivero::prelude::*;
//! ```

pub use crate::data::{find_item, Item, RawValue};
pub use crate::encoding::{encode_batch, init_features};
pub use crate::error::{Result, ViveroError};
pub use crate::profile::{build_profile, AttributeStats, Exemplar, UserProfile};
pub use crate::recommend::{recommend, Recommendation};
pub use crate::schema::{AttributeDef, AttributeKind, Schema, Vocabulary};
