//! Graph builder: flat trick records in, deduplicated node/edge set out.
//!
//! Unresolvable prerequisite refs are non-fatal — the edge is skipped and a
//! `StructuralWarning` is collected. A cycle in the resolved graph is fatal:
//! the layered layout assumes a DAG, so the build refuses cyclic input
//! instead of silently mis-ranking it.

use std::collections::{HashMap, HashSet};

use crate::engine::error::{EngineError, EngineResult, StructuralWarning};
use crate::engine::model::{CompletionSet, GraphNode, ResolvedEdge, TrickGraph, TrickId, TrickRecord};
use crate::engine::resolver::ResolverIndex;

/// Build the dependency graph for one category's tricks.
///
/// Nodes keep the input order of `tricks`. An empty trick list yields an
/// empty graph, which is valid and not an error.
pub fn build(tricks: &[TrickRecord], completion: &CompletionSet) -> EngineResult<TrickGraph> {
    let index = ResolverIndex::new(tricks);

    let nodes: Vec<GraphNode> = tricks
        .iter()
        .map(|t| GraphNode::placeholder(t.id.clone(), t.name.clone(), completion.contains(&t.id)))
        .collect();

    let mut edges = Vec::new();
    let mut seen: HashSet<(TrickId, TrickId)> = HashSet::new();
    let mut warnings = Vec::new();

    for trick in tricks {
        for raw_ref in &trick.prerequisite_refs {
            let Some(source) = index.resolve(raw_ref) else {
                warnings.push(StructuralWarning {
                    trick_id: trick.id.clone(),
                    raw_ref: raw_ref.clone(),
                });
                continue;
            };
            // Second ref resolving to the same pair is dropped silently.
            if !seen.insert((source.clone(), trick.id.clone())) {
                continue;
            }
            let satisfied = completion.contains(&source) && completion.contains(&trick.id);
            edges.push(ResolvedEdge {
                source,
                target: trick.id.clone(),
                satisfied,
            });
        }
    }

    detect_cycles(&nodes, &edges)?;

    Ok(TrickGraph {
        nodes,
        edges,
        warnings,
    })
}

/// Recompute the derived completion state after the `CompletionSet` changed:
/// node `completed` flags and edge `satisfied` flags.
pub fn refresh_completion(graph: &mut TrickGraph, completion: &CompletionSet) {
    for node in &mut graph.nodes {
        node.completed = completion.contains(&node.id);
    }
    for edge in &mut graph.edges {
        edge.satisfied = completion.contains(&edge.source) && completion.contains(&edge.target);
    }
}

/// DFS cycle check. Self-loops count as cycles of length one.
fn detect_cycles(nodes: &[GraphNode], edges: &[ResolvedEdge]) -> EngineResult<()> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        adj.entry(&edge.source).or_default().push(&edge.target);
    }

    let mut visiting = HashSet::new();
    let mut visited = HashSet::new();
    let mut path = Vec::new();

    for node in nodes {
        if !visited.contains(node.id.as_str()) {
            dfs(
                &node.id,
                &adj,
                &mut visiting,
                &mut visited,
                &mut path,
            )?;
        }
    }
    Ok(())
}

fn dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visiting: &mut HashSet<&'a str>,
    visited: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> EngineResult<()> {
    if visiting.contains(node) {
        let start = path.iter().position(|&n| n == node).unwrap_or(0);
        return Err(EngineError::CyclicDependency {
            cycle: path[start..].iter().map(|s| s.to_string()).collect(),
        });
    }
    if visited.contains(node) {
        return Ok(());
    }

    visiting.insert(node);
    path.push(node);

    if let Some(next) = adj.get(node) {
        for &n in next {
            dfs(n, adj, visiting, visited, path)?;
        }
    }

    path.pop();
    visiting.remove(node);
    visited.insert(node);
    Ok(())
}
