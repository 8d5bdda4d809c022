use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintNaming;
use crate::graph::OrderingStrategy;

/// XML namespace used by Dia diagrams.
pub const DIA_NAMESPACE: &str = "http://www.lysator.liu.se/~alla/dia/";
/// Object type of Dia database tables.
pub const TABLE_KIND: &str = "Database - Table";
/// Object type of Dia database references.
pub const REFERENCE_KIND: &str = "Database - Reference";

/// Options that control how a diagram becomes a schema model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub namespace: String,
    pub table_kind: String,
    pub reference_kind: String,
    pub ordering: OrderingStrategy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            namespace: DIA_NAMESPACE.to_string(),
            table_kind: TABLE_KIND.to_string(),
            reference_kind: REFERENCE_KIND.to_string(),
            ordering: OrderingStrategy::InDegree,
        }
    }
}

/// Options that control DDL rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Render a single-column primary key inline instead of as a table clause.
    pub inline_primary_key: bool,
    pub constraint_naming: ConstraintNaming,
}
