//! Completion state and navigation over one category's laid-out graph.
//!
//! A `Session` is the explicit context object for a (category, user) pair:
//! created empty, loaded from a `Store`, then driven by toggles and focus
//! navigation. All derived state (incomplete order, focus index, satisfied
//! flags) is recomputed synchronously on every mutation; the only
//! asynchronous boundary is the store write behind `toggle`, and that is the
//! caller's concern — the session applies its optimistic flip first and
//! rolls it back if the write comes back failed.

use crate::engine::build;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::layout::{self, LayoutParams, Orientation};
use crate::engine::model::{Category, CompletionSet, TrickGraph, TrickId};
use crate::store::Store;

/// Duration for the "center viewport on focused node" animation.
pub const FOCUS_ANIMATION_MS: u64 = 300;

/// Padding around the target when fitting the viewport.
pub const FIT_PADDING: f64 = 40.0;

/// Viewport instruction for the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportIntent {
    pub kind: IntentKind,
    /// `None` means the whole graph.
    pub node_id: Option<TrickId>,
    pub padding: f64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Fit,
    Center,
}

impl ViewportIntent {
    fn center(node_id: TrickId) -> Self {
        Self {
            kind: IntentKind::Center,
            node_id: Some(node_id),
            padding: FIT_PADDING,
            duration_ms: FOCUS_ANIMATION_MS,
        }
    }

    fn fit(node_id: Option<TrickId>) -> Self {
        Self {
            kind: IntentKind::Fit,
            node_id,
            padding: FIT_PADDING,
            duration_ms: FOCUS_ANIMATION_MS,
        }
    }
}

/// Lifecycle of one category view. `Error` is terminal until the next
/// successful `load`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Loading,
    Ready,
    Error(String),
}

/// Per-(category, user) view session.
#[derive(Debug)]
pub struct Session {
    category_id: String,
    user_id: String,
    state: SessionState,
    category: Option<Category>,
    graph: TrickGraph,
    completion: CompletionSet,
    incomplete: Vec<TrickId>,
    focus_index: usize,
    auto_focused: bool,
    orientation: Orientation,
    params: LayoutParams,
}

impl Session {
    pub fn new(category_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            user_id: user_id.into(),
            state: SessionState::Empty,
            category: None,
            graph: TrickGraph::default(),
            completion: CompletionSet::new(),
            incomplete: Vec::new(),
            focus_index: 0,
            auto_focused: false,
            orientation: Orientation::default(),
            params: LayoutParams::default(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// The positioned graph. Node order here is the published render order
    /// that `incomplete_order` follows.
    pub fn graph(&self) -> &TrickGraph {
        &self.graph
    }

    pub fn completion(&self) -> &CompletionSet {
        &self.completion
    }

    /// Fetch, build and lay out the category graph. Any failure parks the
    /// session in `SessionState::Error`; call `load` again to retry.
    pub fn load(&mut self, store: &dyn Store) -> EngineResult<()> {
        self.state = SessionState::Loading;
        match self.load_inner(store) {
            Ok(()) => {
                self.state = SessionState::Ready;
                self.auto_focused = false;
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Error(err.to_string());
                Err(err)
            }
        }
    }

    fn load_inner(&mut self, store: &dyn Store) -> EngineResult<()> {
        let fetch = |reason: anyhow::Error| EngineError::Fetch {
            reason: reason.to_string(),
        };

        let category = store.category_by_id(&self.category_id).map_err(fetch)?;
        let Some(category) = category else {
            return Err(EngineError::CategoryNotFound {
                category_id: self.category_id.clone(),
            });
        };
        let tricks = store.list_tricks(&self.category_id).map_err(fetch)?;
        let completed = store.list_completed(&self.user_id).map_err(fetch)?;

        self.completion = CompletionSet::from_ids(completed);
        let mut graph = build::build(&tricks, &self.completion)?;
        layout::layout(
            &mut graph.nodes,
            &graph.edges,
            self.orientation,
            &self.params,
        );

        self.category = Some(category);
        self.graph = graph;
        self.focus_index = 0;
        self.derive_navigation();
        Ok(())
    }

    /// Flip completion for `trick_id`, optimistically first, then persist.
    /// On persistence failure the flip is reverted before returning, so the
    /// session never stays ahead of the store. Returns the new completion
    /// state on success.
    pub fn toggle(&mut self, store: &mut dyn Store, trick_id: &str) -> EngineResult<bool> {
        let now_completed = self.completion.toggle(trick_id);
        if let Err(err) = store.set_completed(&self.user_id, trick_id, now_completed) {
            self.completion.toggle(trick_id);
            return Err(EngineError::Persistence {
                trick_id: trick_id.to_string(),
                reason: err.to_string(),
            });
        }
        build::refresh_completion(&mut self.graph, &self.completion);
        self.derive_navigation();
        Ok(now_completed)
    }

    /// Render-ordered ids of nodes not yet completed.
    pub fn incomplete_order(&self) -> &[TrickId] {
        &self.incomplete
    }

    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    /// The currently focused incomplete trick, if any.
    pub fn focused(&self) -> Option<&TrickId> {
        self.incomplete.get(self.focus_index)
    }

    /// Advance focus to the next incomplete node, wrapping past the end.
    /// No-op (returns `None`) when everything is complete.
    pub fn focus_next(&mut self) -> Option<ViewportIntent> {
        self.move_focus(1)
    }

    /// Advance focus to the previous incomplete node, wrapping past the
    /// start.
    pub fn focus_previous(&mut self) -> Option<ViewportIntent> {
        self.move_focus(-1)
    }

    fn move_focus(&mut self, delta: isize) -> Option<ViewportIntent> {
        if self.incomplete.is_empty() {
            return None;
        }
        let len = self.incomplete.len() as isize;
        self.focus_index = (self.focus_index as isize + delta).rem_euclid(len) as usize;
        Some(ViewportIntent::center(
            self.incomplete[self.focus_index].clone(),
        ))
    }

    /// Initial focus after a successful load: the first incomplete node,
    /// else the whole graph when nodes exist but all are complete, else
    /// nothing. Runs at most once per load.
    pub fn auto_focus_initial(&mut self) -> Option<ViewportIntent> {
        if self.auto_focused || self.state != SessionState::Ready {
            return None;
        }
        self.auto_focused = true;

        if let Some(first) = self.incomplete.first() {
            self.focus_index = 0;
            return Some(ViewportIntent::fit(Some(first.clone())));
        }
        if !self.graph.is_empty() {
            return Some(ViewportIntent::fit(None));
        }
        None
    }

    /// Recompute the incomplete order from the published node order and keep
    /// the focus pointed at the same trick where possible, clamping when the
    /// sequence shrinks under it.
    fn derive_navigation(&mut self) {
        let previously_focused = self.incomplete.get(self.focus_index).cloned();
        self.incomplete = self
            .graph
            .nodes
            .iter()
            .filter(|n| !n.completed)
            .map(|n| n.id.clone())
            .collect();

        self.focus_index = previously_focused
            .and_then(|id| self.incomplete.iter().position(|i| *i == id))
            .unwrap_or_else(|| {
                self.focus_index
                    .min(self.incomplete.len().saturating_sub(1))
            });
    }
}
