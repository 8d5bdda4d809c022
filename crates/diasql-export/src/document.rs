use std::collections::BTreeMap;

use diasql_core::{SchemaModel, TableEntity};

/// Category for tables whose comment carries no `category:` prefix.
pub const DEFAULT_CATEGORY: &str = "other";

/// Group tables by the text before the first `:` of their comment.
///
/// Categories are sorted by name; tables keep model order inside each one.
pub fn categorize(model: &SchemaModel) -> BTreeMap<String, Vec<&TableEntity>> {
    let mut categories: BTreeMap<String, Vec<&TableEntity>> = BTreeMap::new();
    for table in model.tables() {
        let category = match table.comment.split_once(':') {
            Some((prefix, _)) => prefix.trim().to_string(),
            None => DEFAULT_CATEGORY.to_string(),
        };
        categories.entry(category).or_default().push(table);
    }
    categories
}

/// Render a deterministic markdown data dictionary of the model.
pub fn render_document(model: &SchemaModel) -> String {
    let mut lines = Vec::new();

    lines.push("# Data dictionary".to_string());
    lines.push(String::new());

    for (category, tables) in categorize(model) {
        lines.push(format!("## {category}"));
        lines.push(String::new());

        for table in tables {
            push_table(&mut lines, table);
        }
    }

    lines.join("\n")
}

fn push_table(lines: &mut Vec<String>, table: &TableEntity) {
    lines.push(format!("### {}", cell(&table.name)));
    lines.push(String::new());
    if !table.comment.is_empty() {
        lines.push(table.comment.clone());
        lines.push(String::new());
    }

    lines.push("#### Attributes".to_string());
    lines.push("| Attribute | Type | Primary key | Unique | Comment |".to_string());
    lines.push("| --- | --- | --- | --- | --- |".to_string());
    for attr in &table.attributes {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            cell(&attr.name),
            cell(&attr.data_type),
            attr.is_primary_key,
            attr.is_unique,
            cell(&attr.comment)
        ));
    }
    lines.push(String::new());

    if !table.relationships.is_empty() {
        lines.push("#### Relationships".to_string());
        lines.push("| Attribute(s) | Related table | Related attribute(s) |".to_string());
        lines.push("| --- | --- | --- |".to_string());
        for fk in &table.relationships {
            lines.push(format!(
                "| {} | {} | {} |",
                cell(&fk.local_names().join(",")),
                cell(&fk.referenced),
                cell(&fk.referenced_names().join(","))
            ));
        }
        lines.push(String::new());
    }
}

/// Keep table cells on one line and escape the column separator.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use diasql_core::{BuildOptions, DIA_NAMESPACE};

    fn model() -> SchemaModel {
        model_named("order", "customer")
    }

    /// `order_name` references `customer_name`; a third table is uncategorized.
    fn model_named(order_name: &str, customer_name: &str) -> SchemaModel {
        let table = |id: &str, name: &str, comment: &str| {
            format!(
                r#"<dia:object type="Database - Table" id="{id}">
                     <dia:attribute name="name"><dia:string>#{name}#</dia:string></dia:attribute>
                     <dia:attribute name="comment"><dia:string>#{comment}#</dia:string></dia:attribute>
                     <dia:attribute name="attributes">
                       <dia:composite type="table_attribute">
                         <dia:attribute name="name"><dia:string>#id#</dia:string></dia:attribute>
                         <dia:attribute name="type"><dia:string>#int#</dia:string></dia:attribute>
                         <dia:attribute name="comment"><dia:string>#a|b#</dia:string></dia:attribute>
                         <dia:attribute name="primary_key"><dia:boolean val="true"/></dia:attribute>
                       </dia:composite>
                     </dia:attribute>
                   </dia:object>"#
            )
        };
        let xml = format!(
            r#"<dia:diagram xmlns:dia="{DIA_NAMESPACE}"><dia:layer>{}{}{}
                 <dia:object type="Database - Reference" id="R0">
                   <dia:connections>
                     <dia:connection handle="0" to="O0" connection="0"/>
                     <dia:connection handle="1" to="O1" connection="1"/>
                   </dia:connections>
                 </dia:object>
               </dia:layer></dia:diagram>"#,
            table("O0", order_name, "ventas: Pedidos"),
            table("O1", customer_name, "crm: Clientes"),
            table("O2", "audit", "Registro")
        );
        SchemaModel::from_xml(xml.as_bytes(), &BuildOptions::default()).expect("build model")
    }

    #[test]
    fn groups_by_comment_prefix() {
        let model = model();
        let categories = categorize(&model);
        let keys: Vec<&str> = categories.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["crm", "other", "ventas"]);
        assert_eq!(categories["other"][0].name, "audit");
    }

    #[test]
    fn renders_attribute_and_relationship_tables() {
        let doc = render_document(&model());
        assert!(doc.starts_with("# Data dictionary\n\n## crm\n\n### customer\n\ncrm: Clientes\n"));
        assert!(doc.contains("| id | INTEGER | true | false | a\\|b |"));
        assert!(doc.contains("#### Relationships\n| Attribute(s) | Related table | Related attribute(s) |\n| --- | --- | --- |\n| id | customer | id |"));
        assert_eq!(doc.matches("#### Relationships").count(), 1);
    }

    #[test]
    fn escapes_pipes_in_headings_and_relationship_cells() {
        let doc = render_document(&model_named("or|der", "cust|omer"));
        assert!(doc.contains("### cust\\|omer\n"));
        assert!(doc.contains("### or\\|der\n"));
        assert!(doc.contains("| id | cust\\|omer | id |"));
    }
}
