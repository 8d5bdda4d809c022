use schemars::JsonSchema;
use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::flatten::{FlatNode, flatten};
use crate::graph::order_tables;
use crate::options::BuildOptions;
use crate::relationship::{extract_connectors, resolve};
use crate::table::{TableEntity, extract_tables};

/// Finished relational schema built from a diagram. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SchemaModel {
    tables: Vec<TableEntity>,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaModel {
    /// Parse raw diagram XML and build the model in one step.
    pub fn from_xml(xml: &[u8], options: &BuildOptions) -> Result<Self> {
        let diagram = flatten(xml, &options.namespace)?;
        Self::build(&diagram, options)
    }

    /// Build the model from a flattened diagram root.
    pub fn build(diagram: &FlatNode, options: &BuildOptions) -> Result<Self> {
        let objects = diagram_objects(diagram);

        let mut tables = extract_tables(objects.iter().copied(), &options.table_kind)?;
        ensure_unique_ids(&tables)?;

        let connectors = extract_connectors(objects.iter().copied(), &options.reference_kind)?;
        let resolution = resolve(&connectors, &tables)?;
        let mut diagnostics = resolution.apply(&mut tables);

        diagnostics.extend(order_tables(&mut tables, options.ordering));

        let constraints: usize = tables.iter().map(|table| table.relationships.len()).sum();
        tracing::info!(
            tables = tables.len(),
            constraints,
            diagnostics = diagnostics.len(),
            "schema model built"
        );

        Ok(Self {
            tables,
            diagnostics,
        })
    }

    /// Tables in emission order.
    pub fn tables(&self) -> &[TableEntity] {
        &self.tables
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn table(&self, name: &str) -> Option<&TableEntity> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Every `object` of every `layer`, in document order.
fn diagram_objects(diagram: &FlatNode) -> Vec<&FlatNode> {
    diagram
        .nodes("layer")
        .flat_map(|layer| layer.nodes("object"))
        .collect()
}

fn ensure_unique_ids(tables: &[TableEntity]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for table in tables {
        if !seen.insert(table.id.as_str()) {
            return Err(Error::DuplicateTableId(table.id.clone()));
        }
    }
    Ok(())
}
