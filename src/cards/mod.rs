//! Card system: the external definition schema, modeled as a tagged union.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDef` / `CardKind`: Static card data, one variant per type tag
//! - `AbilityBlock`: trigger + free-text effect + keyword list
//! - `Domain` / `DomainSet`: power domains and multi-domain membership
//! - `CardRegistry`: definition lookup, with generated token definitions
//!
//! The engine consumes this shape as input; loading and validating card
//! databases belongs to external collaborators.

pub mod definition;
pub mod domain;
pub mod registry;

pub use definition::{AbilityBlock, AbilityTrigger, CardDef, CardId, CardKind, Keyword};
pub use domain::{Domain, DomainSet};
pub use registry::CardRegistry;
