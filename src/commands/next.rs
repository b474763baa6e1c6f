//! `trix next` — what's left to learn, in render order.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::engine::model::TrickGraph;
use crate::engine::session::Session;
use crate::store::FileStore;

pub fn run(category: &str, user: &str, walk: bool) -> Result<()> {
    let store = FileStore::open()?;
    let mut session = Session::new(category, user);
    session
        .load(&store)
        .with_context(|| format!("cannot build graph for category {}", category))?;
    session.auto_focus_initial();

    if let Some(cat) = session.category() {
        println!("  [{}] {}", cat.id, cat.name.as_str().bold());
    }
    if session.graph().is_empty() {
        println!("  Category is empty.");
        return Ok(());
    }
    if session.incomplete_order().is_empty() {
        println!(
            "  {}",
            "All tricks learned — nothing left in this category.".green()
        );
        return Ok(());
    }

    for line in next_lines(session.graph(), session.incomplete_order(), session.focus_index()) {
        println!("  {}", line);
    }
    if walk {
        walk_loop(&mut session)?;
    }
    Ok(())
}

/// Step the focus marker through the remaining tricks from stdin.
fn walk_loop(session: &mut Session) -> Result<()> {
    println!("  {}", "n = next, p = previous, q = quit".dark_grey());
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let moved = match line.trim() {
            "n" => session.focus_next(),
            "p" => session.focus_previous(),
            "q" => return Ok(()),
            other => {
                println!("  {}", format!("unrecognised: {} (n/p/q)", other).dark_grey());
                continue;
            }
        };
        if moved.is_none() {
            println!("  {}", "Nothing left to focus.".green());
            return Ok(());
        }
        for line in next_lines(session.graph(), session.incomplete_order(), session.focus_index()) {
            println!("  {}", line);
        }
    }
}

/// Incomplete tricks in render order, the focused one marked with `>`.
fn next_lines(graph: &TrickGraph, incomplete: &[String], focus_index: usize) -> Vec<String> {
    incomplete
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let marker = if i == focus_index { ">" } else { " " };
            let name = graph.node(id).map(|n| n.name.as_str()).unwrap_or(id);
            format!("{} {}", marker, name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::GraphNode;

    #[test]
    fn marks_focused_trick() {
        let graph = TrickGraph {
            nodes: vec![
                GraphNode::placeholder("a".into(), "Aerial".into(), false),
                GraphNode::placeholder("b".into(), "Backflip".into(), false),
            ],
            edges: Vec::new(),
            warnings: Vec::new(),
        };
        let incomplete = vec!["a".to_string(), "b".to_string()];
        let lines = next_lines(&graph, &incomplete, 1);
        assert_eq!(lines, vec!["  Aerial".to_string(), "> Backflip".to_string()]);
    }
}
