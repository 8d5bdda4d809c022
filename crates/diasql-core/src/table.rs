use schemars::JsonSchema;
use serde::Serialize;

use crate::attribute::{AttributeRecord, string_value};
use crate::constraints::ForeignKeyConstraint;
use crate::error::{Error, Result};
use crate::flatten::FlatNode;
use crate::names::normalize_identifier;

/// A table reconstructed from a `Database - Table` diagram object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TableEntity {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub attributes: Vec<AttributeRecord>,
    pub primary_key: Vec<AttributeRecord>,
    pub relationships: Vec<ForeignKeyConstraint>,
    pub order_weight: u32,
}

impl TableEntity {
    /// Build a table from one flattened diagram object.
    pub fn from_object(object: &FlatNode) -> Result<Self> {
        let id = object
            .text("id")
            .ok_or_else(|| Error::MalformedDiagram("table object without id".to_string()))?
            .to_string();

        let mut name = String::new();
        let mut comment = String::new();
        let mut attributes = Vec::new();

        for property in object.nodes("attribute") {
            match property.text("name") {
                Some("name") => name = normalize_identifier(&string_value(property)),
                Some("comment") => comment = string_value(property),
                Some("attributes") => {
                    for composite in property.nodes("composite") {
                        attributes.push(AttributeRecord::parse(composite.nodes("attribute"))?);
                    }
                }
                _ => {}
            }
        }

        let primary_key = attributes
            .iter()
            .filter(|attr| attr.is_primary_key)
            .cloned()
            .collect();

        Ok(Self {
            id,
            name,
            comment,
            attributes,
            primary_key,
            relationships: Vec::new(),
            order_weight: 0,
        })
    }

    /// Apply [`AttributeRecord::fix`] to every attribute and primary key column.
    pub fn fix_attribute_types(&mut self) {
        for attr in self.attributes.iter_mut().chain(self.primary_key.iter_mut()) {
            attr.fix();
        }
    }

    /// Attribute with exactly this name, if any.
    pub fn attribute(&self, name: &str) -> Option<&AttributeRecord> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Validation warnings rendered into the table's comment block.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.primary_key.is_empty() {
            warnings.push("There is no primary key!".to_string());
        }
        warnings.extend(self.attributes.iter().filter_map(AttributeRecord::check));
        warnings
    }
}

/// Extract every object whose `type` equals `table_kind`, in document order.
pub fn extract_tables<'a>(
    objects: impl IntoIterator<Item = &'a FlatNode>,
    table_kind: &str,
) -> Result<Vec<TableEntity>> {
    let mut tables = Vec::new();
    for object in objects {
        if object.text("type") != Some(table_kind) {
            continue;
        }
        let mut table = TableEntity::from_object(object)?;
        table.fix_attribute_types();
        tracing::debug!(
            table = %table.name,
            id = %table.id,
            attributes = table.attributes.len(),
            "table extracted"
        );
        tables.push(table);
    }
    Ok(tables)
}
