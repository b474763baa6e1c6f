//! Error and warning taxonomy for the engine.
//!
//! Warnings are aggregated alongside a successful build; errors are returned
//! as values and never panic across the engine boundary. The CLI layer wraps
//! them into `anyhow` context at the very edge.

use crate::engine::model::TrickId;

/// A prerequisite reference that could not be resolved to any trick.
///
/// Expected given free-text data entry: the edge is skipped, the graph is
/// built without it, and the warning is surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralWarning {
    /// The trick whose prerequisite list contains the bad reference.
    pub trick_id: TrickId,
    /// The raw reference text, verbatim.
    pub raw_ref: String,
}

impl std::fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unresolved prerequisite \"{}\" on trick {} (edge skipped)",
            self.raw_ref, self.trick_id
        )
    }
}

/// Fatal engine failures, returned as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested category does not exist in the store.
    CategoryNotFound { category_id: String },
    /// The resolved prerequisite graph contains a cycle; layout would
    /// mis-rank it, so the build refuses it instead. The cycle is reported
    /// in edge order, first node repeated implicitly.
    CyclicDependency { cycle: Vec<TrickId> },
    /// Persisting a completion toggle failed; the optimistic flip for this
    /// trick has already been rolled back when the caller sees this.
    Persistence { trick_id: TrickId, reason: String },
    /// The upstream category/trick/completion fetch failed. The session
    /// stays in its error state until the caller retries with a fresh load.
    Fetch { reason: String },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound { category_id } => {
                write!(f, "category not found: {}", category_id)
            }
            Self::CyclicDependency { cycle } => {
                write!(f, "cyclic prerequisite chain: ")?;
                for (i, id) in cycle.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{}", id)?;
                }
                if let Some(first) = cycle.first() {
                    write!(f, " -> {}", first)?;
                }
                Ok(())
            }
            Self::Persistence { trick_id, reason } => {
                write!(
                    f,
                    "could not save completion for {} ({}); change reverted",
                    trick_id, reason
                )
            }
            Self::Fetch { reason } => write!(f, "could not load data: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;
