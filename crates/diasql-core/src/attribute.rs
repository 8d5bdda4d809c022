use schemars::JsonSchema;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::flatten::FlatNode;
use crate::names::{normalize_identifier, strip_marker};

/// Column reconstructed from one `table_attribute` composite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AttributeRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub comment: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
    pub is_unique: bool,
}

/// Property names understood inside an attribute composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Name,
    Type,
    Comment,
    PrimaryKey,
    Nullable,
    Unique,
}

impl PropertyKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "type" => Some(Self::Type),
            "comment" => Some(Self::Comment),
            "primary_key" => Some(Self::PrimaryKey),
            "nullable" => Some(Self::Nullable),
            "unique" => Some(Self::Unique),
            _ => None,
        }
    }
}

impl AttributeRecord {
    /// Build a record from the flattened `<attribute name=..>` properties of
    /// one composite. Unknown property names are ignored.
    pub fn parse<'a>(properties: impl IntoIterator<Item = &'a FlatNode>) -> Result<Self> {
        let mut record = AttributeRecord::default();

        for property in properties {
            let Some(name) = property.text("name") else {
                continue;
            };
            let Some(kind) = PropertyKind::from_name(name) else {
                continue;
            };

            match kind {
                PropertyKind::Name => {
                    record.name =
                        normalize_identifier(&string_value(property).trim().replace(' ', "_"));
                }
                PropertyKind::Type => record.data_type = string_value(property),
                PropertyKind::Comment => record.comment = string_value(property),
                PropertyKind::PrimaryKey => record.is_primary_key = boolean_value(name, property)?,
                PropertyKind::Nullable => record.is_nullable = boolean_value(name, property)?,
                PropertyKind::Unique => record.is_unique = boolean_value(name, property)?,
            }
        }

        Ok(record)
    }

    /// Rewrite common type synonyms to their canonical spelling.
    pub fn fix(&mut self) {
        let normalized = self.data_type.trim().to_lowercase();
        match normalized.as_str() {
            "int" => self.data_type = "INTEGER".to_string(),
            "float" | "double" => self.data_type = "REAL".to_string(),
            _ => {}
        }
    }

    /// First applicable type warning, if any.
    pub fn check(&self) -> Option<String> {
        let normalized = self.data_type.trim().to_lowercase();
        if normalized.contains("varchar") && !normalized.contains('(') {
            Some(format!(
                "The type of {} requires length i.e VARCHAR(10)",
                self.name
            ))
        } else if normalized.contains("numeric") && !normalized.contains('(') {
            Some(format!(
                "The type of {} requires length i.e NUMERIC(10, 2)",
                self.name
            ))
        } else if normalized.is_empty() {
            Some(format!("The attribute {} has no type!", self.name))
        } else {
            None
        }
    }
}

/// Text of the `<dia:string>` payload with markers removed.
pub(crate) fn string_value(property: &FlatNode) -> String {
    property
        .text("string")
        .map(strip_marker)
        .unwrap_or_default()
}

fn boolean_value(name: &str, property: &FlatNode) -> Result<bool> {
    let value = property.node("boolean").and_then(|node| node.text("val"));
    match value {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        other => Err(Error::InvalidBoolean {
            property: name.to_string(),
            value: other.unwrap_or("<missing>").to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::FlatValue;

    fn string_property(name: &str, value: &str) -> FlatNode {
        let mut node = FlatNode::new();
        node.insert("name", FlatValue::Text(name.to_string()));
        node.insert("string", FlatValue::Text(value.to_string()));
        node
    }

    fn bool_property(name: &str, value: &str) -> FlatNode {
        let mut boolean = FlatNode::new();
        boolean.insert("val", FlatValue::Text(value.to_string()));
        let mut node = FlatNode::new();
        node.insert("name", FlatValue::Text(name.to_string()));
        node.insert("boolean", FlatValue::Node(boolean));
        node
    }

    fn record(data_type: &str) -> AttributeRecord {
        AttributeRecord {
            name: "col".to_string(),
            data_type: data_type.to_string(),
            ..AttributeRecord::default()
        }
    }

    #[test]
    fn parses_all_known_properties() {
        let properties = vec![
            string_property("name", "#Fecha Alta#"),
            string_property("type", "#varchar(20)#"),
            string_property("comment", "#Día de alta#"),
            bool_property("primary_key", "true"),
            bool_property("nullable", "false"),
            bool_property("unique", "true"),
            string_property("default_value", "##"),
        ];

        let parsed = AttributeRecord::parse(&properties).expect("parse attribute");
        assert_eq!(parsed.name, "fecha_alta");
        assert_eq!(parsed.data_type, "varchar(20)");
        assert_eq!(parsed.comment, "Día de alta");
        assert!(parsed.is_primary_key);
        assert!(!parsed.is_nullable);
        assert!(parsed.is_unique);
    }

    #[test]
    fn missing_flags_default_to_false() {
        let properties = vec![string_property("name", "#id#")];
        let parsed = AttributeRecord::parse(&properties).expect("parse attribute");
        assert!(!parsed.is_primary_key);
        assert!(!parsed.is_nullable);
        assert!(!parsed.is_unique);
        assert_eq!(parsed.data_type, "");
    }

    #[test]
    fn rejects_unknown_boolean_literal() {
        let properties = vec![bool_property("nullable", "yes")];
        let err = AttributeRecord::parse(&properties).unwrap_err();
        match err {
            Error::InvalidBoolean { property, value } => {
                assert_eq!(property, "nullable");
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fix_rewrites_numeric_synonyms_only() {
        let mut int = record(" Int ");
        int.fix();
        assert_eq!(int.data_type, "INTEGER");

        let mut double = record("DOUBLE");
        double.fix();
        assert_eq!(double.data_type, "REAL");

        let mut varchar = record("varchar");
        varchar.fix();
        assert_eq!(varchar.data_type, "varchar");
    }

    #[test]
    fn check_reports_first_matching_rule() {
        assert!(record("varchar").check().unwrap().contains("requires length"));
        assert!(record("NUMERIC").check().unwrap().contains("NUMERIC(10, 2)"));
        assert!(record("  ").check().unwrap().contains("has no type"));
        assert_eq!(record("varchar(10)").check(), None);
        assert_eq!(record("INTEGER").check(), None);
    }
}
