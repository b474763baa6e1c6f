//! `trix layout` — build, lay out and print one category's graph.

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::engine::layout::Orientation;
use crate::engine::model::TrickGraph;
use crate::engine::session::Session;
use crate::store::FileStore;

pub fn run(category: &str, user: &str, horizontal: bool) -> Result<()> {
    let store = FileStore::open()?;
    let orientation = if horizontal {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };

    let mut session = Session::new(category, user).with_orientation(orientation);
    session
        .load(&store)
        .with_context(|| format!("cannot build graph for category {}", category))?;

    for warning in &session.graph().warnings {
        println!("  {} {}", "warning:".yellow().bold(), warning);
    }
    let lines = layout_lines(session.graph());
    if lines.is_empty() {
        println!("  Category is empty.");
    } else {
        for line in lines {
            println!("  {}", line);
        }
    }
    Ok(())
}

/// One line per node (`rank.order` then center coordinates), then one line
/// per edge with `==>` marking satisfied edges and `-->` the rest.
fn layout_lines(graph: &TrickGraph) -> Vec<String> {
    let mut lines = Vec::new();
    for node in &graph.nodes {
        let done = if node.completed { " [done]" } else { "" };
        lines.push(format!(
            "{}.{}  ({:>7.1}, {:>7.1})  {}{}",
            node.rank, node.order, node.x, node.y, node.id, done
        ));
    }
    for edge in &graph.edges {
        let arrow = if edge.satisfied { "==>" } else { "-->" };
        lines.push(format!("{} {} {}", edge.source, arrow, edge.target));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::build;
    use crate::engine::layout::{self, LayoutParams};
    use crate::engine::model::{CompletionSet, TrickRecord};

    fn trick(id: &str, refs: &[&str]) -> TrickRecord {
        TrickRecord {
            id: id.to_string(),
            name: id.to_string(),
            prerequisite_refs: refs.iter().map(|s| s.to_string()).collect(),
            difficulty: None,
            category_id: "c".to_string(),
        }
    }

    #[test]
    fn prints_nodes_then_edges() {
        let tricks = vec![trick("a", &[]), trick("b", &["a"])];
        let completion = CompletionSet::from_ids(vec!["a".to_string(), "b".to_string()]);
        let mut graph = build::build(&tricks, &completion).unwrap();
        layout::layout(
            &mut graph.nodes,
            &graph.edges.clone(),
            Orientation::Vertical,
            &LayoutParams::default(),
        );

        let lines = layout_lines(&graph);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("a [done]"));
        assert!(lines[0].starts_with("0.0"));
        assert!(lines[1].starts_with("1.0"));
        assert!(lines[2].contains("a ==> b"));
    }

    #[test]
    fn empty_graph_prints_nothing() {
        assert!(layout_lines(&TrickGraph::default()).is_empty());
    }
}
