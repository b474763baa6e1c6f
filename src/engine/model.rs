//! Core data model for the trick dependency graph engine.
//!
//! Records come in from the store collaborator (`crate::store`), the engine
//! derives everything else: resolved edges, node positions, completion state.

use std::collections::HashSet;

use crate::engine::error::StructuralWarning;

/// Opaque unique identifier of a trick. Stable across sessions.
pub type TrickId = String;

/// A category groups tricks; one graph is built per category at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A trick as authored in the catalog. Read-only to the engine.
///
/// `prerequisite_refs` is free text from manual data entry: each entry may be
/// an exact name, an id, or a near-miss spelling. Resolution happens in
/// `engine::resolver`, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickRecord {
    pub id: TrickId,
    pub name: String,
    pub prerequisite_refs: Vec<String>,
    pub difficulty: Option<u32>,
    pub category_id: String,
}

/// A laid-out graph node. `x`/`y` anchor at node-center; callers translate
/// to top-left with `width`/`height` halves.
///
/// Invariant after layout: for every edge `(s -> t)`, `rank(s) < rank(t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: TrickId,
    pub name: String,
    pub completed: bool,
    pub rank: usize,
    pub order: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GraphNode {
    /// A node fresh out of the graph builder, before layout has run.
    pub fn placeholder(id: TrickId, name: String, completed: bool) -> Self {
        Self {
            id,
            name,
            completed,
            rank: 0,
            order: 0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A resolved prerequisite link: `source` must be learned before `target`.
///
/// At most one edge exists per ordered `(source, target)` pair, no matter
/// how many raw refs point at it. `satisfied` is derived display state
/// (both endpoints complete), not a structural property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdge {
    pub source: TrickId,
    pub target: TrickId,
    pub satisfied: bool,
}

/// The built (and, after `engine::layout::layout`, positioned) graph for one
/// category, plus the non-fatal warnings collected while building it.
///
/// The order of `nodes` is the published render order: navigation
/// (`engine::session`) consumes it as-is.
#[derive(Debug, Clone, Default)]
pub struct TrickGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<ResolvedEdge>,
    pub warnings: Vec<StructuralWarning>,
}

impl TrickGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// The set of trick ids the current user can perform.
///
/// Loaded from the store on session init, flipped optimistically on toggle,
/// rolled back if persistence fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    ids: HashSet<TrickId>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = TrickId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership for `id`; returns the new membership state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
