//! Core pipeline for diasql.
//!
//! Turns a Dia entity-relationship diagram into a [`SchemaModel`] and renders
//! it as SQL DDL. The pipeline is flatten -> extract tables -> resolve
//! references -> order -> emit.

pub mod attribute;
pub mod constraints;
pub mod diagnostics;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod model;
pub mod names;
pub mod options;
pub mod relationship;
pub mod sql;
pub mod table;

pub use attribute::{AttributeRecord, PropertyKind};
pub use constraints::{ConstraintNaming, ForeignKeyConstraint};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{Error, Result};
pub use flatten::{FlatNode, FlatValue, flatten};
pub use graph::{OrderingStrategy, order_tables};
pub use model::SchemaModel;
pub use names::{NameMode, fix_name, normalize_comment, normalize_identifier};
pub use options::{BuildOptions, DIA_NAMESPACE, EmitOptions, REFERENCE_KIND, TABLE_KIND};
pub use relationship::{ReferenceConnector, Resolution, extract_connectors, resolve};
pub use sql::{BANNER, SqlEmitter, to_sql};
pub use table::{TableEntity, extract_tables};
