//! DDL rendering for a finished [`SchemaModel`].
//!
//! Each table is preceded by a comment block holding the table comment and
//! its validation warnings, so the script doubles as a validation report.

use crate::attribute::AttributeRecord;
use crate::model::SchemaModel;
use crate::names::normalize_comment;
use crate::options::EmitOptions;
use crate::table::TableEntity;

/// Banner written before the first table.
pub const BANNER: &str = "/* DIA 2 SQL code generation */";

const INDENT: &str = "    ";

/// Renders a [`SchemaModel`] into DDL text.
#[derive(Debug, Clone, Default)]
pub struct SqlEmitter {
    options: EmitOptions,
}

impl SqlEmitter {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    /// Model diagnostics, the banner, then every table in model order.
    pub fn emit(&self, model: &SchemaModel) -> String {
        let mut out = String::new();

        for diagnostic in model.diagnostics() {
            out.push_str(&format!(
                "/*{}:\n\t{}*/\n",
                diagnostic.kind.title(),
                diagnostic.message
            ));
        }

        out.push_str("\n\n\n");
        out.push_str(BANNER);
        out.push_str("\n\n\n");

        for table in model.tables() {
            out.push_str(&self.emit_table(table));
        }

        out
    }

    /// `CREATE TABLE` statement for one table, with its comment block.
    pub fn emit_table(&self, table: &TableEntity) -> String {
        let mut out = String::new();

        let comment = normalize_comment(&table.comment).replace('\n', &format!("\n{INDENT}"));
        out.push_str(&format!("/*\nComments:\n{INDENT}{comment}\n"));

        let warnings = table.warnings();
        if !warnings.is_empty() {
            out.push_str("Errors:\n");
            for warning in &warnings {
                out.push_str(&format!("\t{warning}\n"));
            }
        }
        out.push_str("*/\n");

        out.push_str(&format!("CREATE TABLE {} (\n", table.name));

        let inline_pk = self.options.inline_primary_key && table.primary_key.len() == 1;

        let mut lines: Vec<String> = table
            .attributes
            .iter()
            .map(|attr| attribute_sql(attr, inline_pk))
            .collect();

        if !inline_pk {
            let pk: Vec<&str> = table.primary_key.iter().map(|attr| attr.name.as_str()).collect();
            lines.push(format!("PRIMARY KEY ({})", pk.join(", ")));
        }

        for (index, fk) in table.relationships.iter().enumerate() {
            lines.push(format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
                fk.constraint_name(index, self.options.constraint_naming),
                fk.local_names().join(","),
                fk.referenced,
                fk.referenced_names().join(",")
            ));
        }

        let body: Vec<String> = lines.iter().map(|line| format!("{INDENT}{line}")).collect();
        out.push_str(&body.join(",\n"));
        out.push_str("\n);\n\n");

        out
    }
}

/// Render a model with default options.
pub fn to_sql(model: &SchemaModel) -> String {
    SqlEmitter::default().emit(model)
}

fn attribute_sql(attr: &AttributeRecord, include_pk: bool) -> String {
    let mut line = format!("{} {}", attr.name, attr.data_type);

    if attr.is_primary_key && include_pk {
        line.push_str(" PRIMARY KEY");
    }
    if attr.is_nullable {
        line.push_str(" NOT NULL");
    }
    if attr.is_unique {
        line.push_str(" UNIQUE");
    }
    if !attr.comment.is_empty() {
        let comment = normalize_comment(&attr.comment).replace('\n', " ");
        line.push_str(&format!("{INDENT}/* {comment} */"));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{ConstraintNaming, ForeignKeyConstraint};

    fn attr(name: &str, data_type: &str, pk: bool) -> AttributeRecord {
        AttributeRecord {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_primary_key: pk,
            ..AttributeRecord::default()
        }
    }

    fn table(name: &str, attributes: Vec<AttributeRecord>) -> TableEntity {
        let primary_key = attributes.iter().filter(|a| a.is_primary_key).cloned().collect();
        TableEntity {
            id: format!("id_{name}"),
            name: name.to_string(),
            comment: String::new(),
            attributes,
            primary_key,
            relationships: Vec::new(),
            order_weight: 0,
        }
    }

    #[test]
    fn renders_attribute_flags_and_comment() {
        let mut column = attr("email", "varchar(80)", false);
        column.is_nullable = true;
        column.is_unique = true;
        column.comment = "Correo\nelectrónico".to_string();

        assert_eq!(
            attribute_sql(&column, false),
            "email varchar(80) NOT NULL UNIQUE    /* Correo electronico */"
        );
    }

    #[test]
    fn renders_full_statement() {
        let mut customer = table("customer", vec![attr("id", "INTEGER", true), attr("name", "text", false)]);
        customer.comment = "crm: Clientes\nactivos".to_string();

        let sql = SqlEmitter::default().emit_table(&customer);
        assert_eq!(
            sql,
            "/*\nComments:\n    crm: Clientes\n    activos\n*/\n\
             CREATE TABLE customer (\n    id INTEGER,\n    name text,\n    PRIMARY KEY (id)\n);\n\n"
        );
    }

    #[test]
    fn missing_primary_key_yields_empty_clause_and_warning() {
        let orphan = table("audit", vec![attr("at", "timestamp", false)]);
        let sql = SqlEmitter::default().emit_table(&orphan);
        assert!(sql.contains("Errors:\n\tThere is no primary key!\n*/\n"));
        assert!(sql.contains("    PRIMARY KEY ()\n);"));
    }

    #[test]
    fn inline_primary_key_replaces_clause_for_single_column() {
        let emitter = SqlEmitter::new(EmitOptions {
            inline_primary_key: true,
            ..EmitOptions::default()
        });

        let single = table("tag", vec![attr("id", "INTEGER", true)]);
        let sql = emitter.emit_table(&single);
        assert!(sql.contains("    id INTEGER PRIMARY KEY\n);"));
        assert!(!sql.contains("PRIMARY KEY ("));

        let composite = table("pair", vec![attr("a", "INTEGER", true), attr("b", "INTEGER", true)]);
        let sql = emitter.emit_table(&composite);
        assert!(sql.contains("    PRIMARY KEY (a, b)\n);"));
    }

    #[test]
    fn constraints_are_numbered_per_table() {
        let mut line = table("line", vec![attr("id", "INTEGER", true)]);
        for referenced in ["order", "product"] {
            line.relationships.push(ForeignKeyConstraint {
                owner_id: line.id.clone(),
                owner: "line".to_string(),
                referenced_id: format!("id_{referenced}"),
                referenced: referenced.to_string(),
                local_columns: line.primary_key.clone(),
                referenced_columns: line.primary_key.clone(),
                from_slot: String::new(),
                to_slot: String::new(),
                from_label: String::new(),
                to_label: String::new(),
            });
        }

        let sql = SqlEmitter::default().emit_table(&line);
        assert!(sql.contains(
            "    PRIMARY KEY (id),\n    CONSTRAINT R0_order FOREIGN KEY (id) REFERENCES order(id),\n    CONSTRAINT R1_product FOREIGN KEY (id) REFERENCES product(id)\n);"
        ));

        let qualified = SqlEmitter::new(EmitOptions {
            constraint_naming: ConstraintNaming::OwnerQualified,
            ..EmitOptions::default()
        })
        .emit_table(&line);
        assert!(qualified.contains("CONSTRAINT R1_line_product FOREIGN KEY"));
    }
}
