use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::table::TableEntity;

/// Strategy used to order tables before DDL emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderingStrategy {
    /// Stable sort by `order_weight` descending.
    #[default]
    InDegree,
    /// Kahn's algorithm over referenced -> owner edges.
    Topological,
}

/// Reorder `tables` in place. Returns diagnostics for cycles, if any.
pub fn order_tables(tables: &mut Vec<TableEntity>, strategy: OrderingStrategy) -> Vec<Diagnostic> {
    match strategy {
        OrderingStrategy::InDegree => {
            tables.sort_by_key(|table| Reverse(table.order_weight));
            Vec::new()
        }
        OrderingStrategy::Topological => {
            let (order, cycle) = toposort(&build_adjacency(tables.as_slice()), tables.len());
            let mut diagnostics = Vec::new();
            if !cycle.is_empty() {
                let names: Vec<&str> = cycle.iter().map(|&pos| tables[pos].name.as_str()).collect();
                let diagnostic = Diagnostic::new(
                    DiagnosticKind::DependencyCycle,
                    format!(
                        "tables emitted in declaration order: {}",
                        names.join(", ")
                    ),
                );
                tracing::warn!(diagnostic = %diagnostic, "foreign key cycle");
                diagnostics.push(diagnostic);
            }
            reorder(tables, order.into_iter().chain(cycle));
            diagnostics
        }
    }
}

/// Referenced table position -> positions of the tables that depend on it.
fn build_adjacency(tables: &[TableEntity]) -> BTreeMap<usize, BTreeSet<usize>> {
    let positions: BTreeMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(pos, table)| (table.id.as_str(), pos))
        .collect();

    let mut graph: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (owner, table) in tables.iter().enumerate() {
        graph.entry(owner).or_default();
        for fk in &table.relationships {
            if let Some(&referenced) = positions.get(fk.referenced_id.as_str()) {
                if referenced != owner {
                    graph.entry(referenced).or_default().insert(owner);
                }
            }
        }
    }

    graph
}

/// Kahn's algorithm picking the lowest declaration position among ready
/// tables. Returns the ordered positions and, separately, those left in a
/// cycle in declaration order.
fn toposort(graph: &BTreeMap<usize, BTreeSet<usize>>, len: usize) -> (Vec<usize>, Vec<usize>) {
    let mut indegree = vec![0usize; len];
    for targets in graph.values() {
        for &target in targets {
            indegree[target] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..len).filter(|&pos| indegree[pos] == 0).collect();
    let mut order = Vec::with_capacity(len);

    while let Some(node) = ready.pop_first() {
        order.push(node);
        if let Some(targets) = graph.get(&node) {
            for &target in targets {
                indegree[target] = indegree[target].saturating_sub(1);
                if indegree[target] == 0 {
                    ready.insert(target);
                }
            }
        }
    }

    let cycle = (0..len).filter(|&pos| indegree[pos] > 0).collect();
    (order, cycle)
}

fn reorder(tables: &mut Vec<TableEntity>, order: impl Iterator<Item = usize>) {
    let mut slots: Vec<Option<TableEntity>> = tables.drain(..).map(Some).collect();
    tables.extend(order.filter_map(|pos| slots[pos].take()));
}
