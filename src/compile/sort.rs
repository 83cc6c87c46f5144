//! Dependency ordering of tables by their foreign keys.
//!
//! Tables form a directed graph with an edge from every referenced table to
//! each table that references it. Emission order is a Kahn traversal of
//! that graph where ties among ready tables are broken by table name, so
//! the result depends only on the set of tables and never on input order.
//!
//! Self-references impose no ordering. References to tables outside the
//! batch are assumed to exist already and are ignored.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::sql::Table;

/// Errors raised while ordering tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("Circular foreign key dependency between tables: {}", tables.join(", "))]
    Cycle { tables: Vec<String> },

    #[error("Table {0} is produced more than once")]
    DuplicateTable(String),
}

/// Order tables so that every table follows the tables it references.
pub fn sort_tables(tables: Vec<Table>) -> Result<Vec<Table>, SortError> {
    let mut graph: DiGraph<Table, ()> = DiGraph::with_capacity(tables.len(), 0);
    let mut by_name: HashMap<(String, String), NodeIndex> = HashMap::new();

    for table in tables {
        let key = (table.schema.clone(), table.name.clone());
        if by_name.contains_key(&key) {
            return Err(SortError::DuplicateTable(table.qualified_name()));
        }
        let idx = graph.add_node(table);
        by_name.insert(key, idx);
    }

    let mut edges = Vec::new();
    for dependent in graph.node_indices() {
        for fk in &graph[dependent].foreign_keys {
            if fk.is_self_reference() {
                continue;
            }
            let key = (fk.ref_schema.clone(), fk.ref_table.clone());
            if let Some(&dependency) = by_name.get(&key) {
                edges.push((dependency, dependent));
            }
        }
    }
    for (dependency, dependent) in edges {
        if graph.find_edge(dependency, dependent).is_none() {
            graph.add_edge(dependency, dependent, ());
        }
    }

    let order = kahn_order(&graph);
    if order.len() < graph.node_count() {
        return Err(SortError::Cycle {
            tables: cycle_members(&graph),
        });
    }

    let (nodes, _) = graph.into_nodes_edges();
    let mut slots: Vec<Option<Table>> = nodes.into_iter().map(|n| Some(n.weight)).collect();
    Ok(order
        .into_iter()
        .filter_map(|idx| slots[idx.index()].take())
        .collect())
}

fn kahn_order(graph: &DiGraph<Table, ()>) -> Vec<NodeIndex> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|idx| {
            let degree = graph.neighbors_directed(idx, Direction::Incoming).count();
            (idx, degree)
        })
        .collect();

    // Ready set keyed by (name, schema) so the smallest name pops first.
    let ready_key = |idx: NodeIndex| {
        let table = &graph[idx];
        (table.name.clone(), table.schema.clone(), idx)
    };
    let mut ready: BTreeSet<(String, String, NodeIndex)> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(idx, _)| ready_key(*idx))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some((_, _, idx)) = ready.pop_first() {
        order.push(idx);
        for dependent in graph.neighbors_directed(idx, Direction::Outgoing) {
            if let Some(degree) = in_degree.get_mut(&dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(ready_key(dependent));
                }
            }
        }
    }

    order
}

/// Qualified names of every table on a cycle, sorted.
fn cycle_members(graph: &DiGraph<Table, ()>) -> Vec<String> {
    let mut members: Vec<String> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .flatten()
        .map(|idx| graph[idx].qualified_name())
        .collect();
    members.sort();
    members
}
