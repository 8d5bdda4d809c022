use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeRecord;

/// How `CONSTRAINT` names are built for foreign keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintNaming {
    /// `R<k>_<referenced>`; only unique inside one table's statement.
    #[default]
    Positional,
    /// `R<k>_<owner>_<referenced>`; unique across the whole script.
    OwnerQualified,
}

/// Foreign key owned by the connector's "from" table.
///
/// Column order follows the owner's primary key. `referenced_columns` only
/// holds the names that matched an attribute of the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ForeignKeyConstraint {
    pub owner_id: String,
    pub owner: String,
    pub referenced_id: String,
    pub referenced: String,
    pub local_columns: Vec<AttributeRecord>,
    pub referenced_columns: Vec<AttributeRecord>,
    pub from_slot: String,
    pub to_slot: String,
    pub from_label: String,
    pub to_label: String,
}

impl ForeignKeyConstraint {
    /// True when every local column found its counterpart.
    pub fn is_complete(&self) -> bool {
        self.local_columns.len() == self.referenced_columns.len()
    }

    pub fn local_names(&self) -> Vec<&str> {
        self.local_columns.iter().map(|attr| attr.name.as_str()).collect()
    }

    pub fn referenced_names(&self) -> Vec<&str> {
        self.referenced_columns
            .iter()
            .map(|attr| attr.name.as_str())
            .collect()
    }

    /// Constraint name for the `index`-th foreign key of the owner table.
    pub fn constraint_name(&self, index: usize, naming: ConstraintNaming) -> String {
        match naming {
            ConstraintNaming::Positional => format!("R{index}_{}", self.referenced),
            ConstraintNaming::OwnerQualified => {
                format!("R{index}_{}_{}", self.owner, self.referenced)
            }
        }
    }

    /// `owner:slot(label) -> referenced:slot(label)`, used in diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "{}:{}({}) -> {}:{}({})",
            self.owner,
            self.from_slot,
            self.from_label,
            self.referenced,
            self.to_slot,
            self.to_label
        )
    }
}
