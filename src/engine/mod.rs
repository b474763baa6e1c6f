//! The trick dependency graph engine: resolve loose prerequisite references
//! into edges, lay the graph out in layers, and navigate what's left to
//! learn. Pure with respect to its inputs; the only side effects live behind
//! the `Store` collaborator.

pub mod build;
pub mod error;
pub mod layout;
pub mod model;
pub mod resolver;
pub mod session;
