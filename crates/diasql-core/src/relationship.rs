//! Resolution of `Database - Reference` connectors into foreign keys.
//!
//! A connector only names the two tables it joins. The owner's primary key
//! columns are matched by exact name against the referenced table's
//! attributes to recover the column correspondence.

use std::collections::HashMap;

use crate::attribute::string_value;
use crate::constraints::ForeignKeyConstraint;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::flatten::FlatNode;
use crate::table::TableEntity;

/// Raw diagram edge between two table objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConnector {
    pub from_table_id: String,
    pub from_slot: String,
    pub to_table_id: String,
    pub to_slot: String,
    pub from_label: String,
    pub to_label: String,
}

impl ReferenceConnector {
    /// Read the first two `connection` entries and the endpoint labels.
    pub fn from_object(object: &FlatNode) -> Result<Self> {
        let connections: Vec<&FlatNode> = object
            .node("connections")
            .map(|node| node.nodes("connection").collect())
            .unwrap_or_default();

        let [from, to, ..] = connections.as_slice() else {
            return Err(Error::MalformedDiagram(format!(
                "reference {} has {} connection(s), expected 2",
                object.text("id").unwrap_or("<unknown>"),
                connections.len()
            )));
        };

        let mut from_label = String::new();
        let mut to_label = String::new();
        for property in object.nodes("attribute") {
            match property.text("name") {
                Some("start_point_desc") => from_label = string_value(property),
                Some("end_point_desc") => to_label = string_value(property),
                _ => {}
            }
        }

        Ok(Self {
            from_table_id: endpoint_field(from, "to")?,
            from_slot: endpoint_field(from, "connection")?,
            to_table_id: endpoint_field(to, "to")?,
            to_slot: endpoint_field(to, "connection")?,
            from_label,
            to_label,
        })
    }
}

fn endpoint_field(connection: &FlatNode, key: &str) -> Result<String> {
    connection
        .text(key)
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedDiagram(format!("connection without '{key}'")))
}

/// Extract every object whose `type` equals `reference_kind`.
pub fn extract_connectors<'a>(
    objects: impl IntoIterator<Item = &'a FlatNode>,
    reference_kind: &str,
) -> Result<Vec<ReferenceConnector>> {
    objects
        .into_iter()
        .filter(|object| object.text("type") == Some(reference_kind))
        .map(ReferenceConnector::from_object)
        .collect()
}

/// One resolved foreign key with the positions of both tables.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedLink {
    owner: usize,
    referenced: usize,
    constraint: ForeignKeyConstraint,
}

/// Output of [`resolve`]: constraints in connector order plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    links: Vec<ResolvedLink>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Resolved constraints in connector order.
    pub fn constraints(&self) -> impl Iterator<Item = &ForeignKeyConstraint> {
        self.links.iter().map(|link| &link.constraint)
    }

    /// Attach each constraint to its owner and bump the referenced table's
    /// order weight once per constraint. `tables` must be the slice given
    /// to [`resolve`]; links pointing past its end are skipped.
    pub(crate) fn apply(self, tables: &mut [TableEntity]) -> Vec<Diagnostic> {
        for link in self.links {
            if let Some(referenced) = tables.get_mut(link.referenced) {
                referenced.order_weight += 1;
            }
            if let Some(owner) = tables.get_mut(link.owner) {
                owner.relationships.push(link.constraint);
            }
        }
        self.diagnostics
    }
}

/// Resolve connectors against the extracted tables.
///
/// Any connector endpoint that names an unknown table id fails the whole
/// resolution.
pub fn resolve(connectors: &[ReferenceConnector], tables: &[TableEntity]) -> Result<Resolution> {
    let index: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(position, table)| (table.id.as_str(), position))
        .collect();

    let lookup = |end: &'static str, id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnresolvedReference {
                end,
                id: id.to_string(),
            })
    };

    let mut resolution = Resolution::default();

    for connector in connectors {
        let owner_pos = lookup("from", &connector.from_table_id)?;
        let referenced_pos = lookup("to", &connector.to_table_id)?;
        let owner = &tables[owner_pos];
        let referenced = &tables[referenced_pos];

        let local_columns = owner.primary_key.clone();
        let referenced_columns = local_columns
            .iter()
            .filter_map(|column| referenced.attribute(&column.name).cloned())
            .collect();

        let constraint = ForeignKeyConstraint {
            owner_id: owner.id.clone(),
            owner: owner.name.clone(),
            referenced_id: referenced.id.clone(),
            referenced: referenced.name.clone(),
            local_columns,
            referenced_columns,
            from_slot: connector.from_slot.clone(),
            to_slot: connector.to_slot.clone(),
            from_label: connector.from_label.clone(),
            to_label: connector.to_label.clone(),
        };

        if !constraint.is_complete() {
            let diagnostic = Diagnostic::new(
                DiagnosticKind::InvalidRelationship,
                format!(
                    "{} matched {} of {} primary key column(s) ({})",
                    constraint.describe(),
                    constraint.referenced_columns.len(),
                    constraint.local_columns.len(),
                    constraint.local_names().join(",")
                ),
            );
            tracing::warn!(diagnostic = %diagnostic, "incomplete foreign key");
            resolution.diagnostics.push(diagnostic);
        }

        tracing::debug!(
            owner = %constraint.owner,
            referenced = %constraint.referenced,
            columns = constraint.referenced_columns.len(),
            "reference resolved"
        );

        resolution.links.push(ResolvedLink {
            owner: owner_pos,
            referenced: referenced_pos,
            constraint,
        });
    }

    Ok(resolution)
}
