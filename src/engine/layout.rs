//! Layered (Sugiyama-style) layout for the trick dependency graph.
//!
//! Three passes over a DAG the builder has already validated:
//! 1. rank assignment — longest path from any source node
//! 2. ordering within each rank — iterative median heuristic to reduce
//!    edge crossings, alternating sweep direction
//! 3. coordinate assignment — rank on one screen axis, order on the other
//!
//! The whole pass is deterministic: same nodes, edges and parameters always
//! produce identical positions.

use std::collections::HashMap;

use crate::engine::model::{GraphNode, ResolvedEdge};

/// Which screen axis the rank axis maps to. This is the only thing
/// orientation changes; rank and order computation are orientation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Ranks flow top-to-bottom (narrow viewports).
    #[default]
    Vertical,
    /// Ranks flow left-to-right.
    Horizontal,
}

/// Node size and spacing knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbouring nodes along the order axis.
    pub node_sep: f64,
    /// Gap between consecutive ranks along the rank axis.
    pub rank_sep: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 48.0,
            node_sep: 24.0,
            rank_sep: 64.0,
        }
    }
}

/// Ordering sweeps stop early once an entire sweep changes nothing.
const MAX_ORDERING_SWEEPS: usize = 8;

/// Assign `rank`, `order`, `width`, `height` and center-anchored `x`/`y` to
/// every node, in place. Precondition: the edge set is acyclic (guaranteed
/// by `engine::build`).
pub fn layout(
    nodes: &mut [GraphNode],
    edges: &[ResolvedEdge],
    orientation: Orientation,
    params: &LayoutParams,
) {
    if nodes.is_empty() {
        return;
    }

    let index_of: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    // Adjacency by node index, ignoring edges whose endpoints are unknown.
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        if let (Some(&s), Some(&t)) = (
            index_of.get(edge.source.as_str()),
            index_of.get(edge.target.as_str()),
        ) {
            outgoing[s].push(t);
            incoming[t].push(s);
        }
    }

    let ranks = assign_ranks(nodes.len(), &outgoing, &incoming);
    let rank_groups = order_ranks(nodes.len(), &ranks, &outgoing, &incoming);

    for (rank, group) in rank_groups.iter().enumerate() {
        for (order, &idx) in group.iter().enumerate() {
            nodes[idx].rank = rank;
            nodes[idx].order = order;
        }
    }

    assign_coordinates(nodes, &rank_groups, orientation, params);
}

/// Longest path from any source, relaxed in topological order.
fn assign_ranks(count: usize, outgoing: &[Vec<usize>], incoming: &[Vec<usize>]) -> Vec<usize> {
    let mut indegree: Vec<usize> = incoming.iter().map(|preds| preds.len()).collect();
    let mut ranks = vec![0usize; count];
    let mut queue: Vec<usize> = (0..count).filter(|&i| indegree[i] == 0).collect();

    let mut head = 0;
    while head < queue.len() {
        let node = queue[head];
        head += 1;
        for &next in &outgoing[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push(next);
            }
        }
    }
    ranks
}

/// Group nodes by rank (input order within each group), then run alternating
/// median sweeps until stable or the sweep budget runs out.
fn order_ranks(
    count: usize,
    ranks: &[usize],
    outgoing: &[Vec<usize>],
    incoming: &[Vec<usize>],
) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for idx in 0..count {
        groups[ranks[idx]].push(idx);
    }

    // positions[i] = current index of node i within its rank
    let mut positions = vec![0usize; count];
    let reindex = |groups: &[Vec<usize>], positions: &mut [usize]| {
        for group in groups {
            for (pos, &idx) in group.iter().enumerate() {
                positions[idx] = pos;
            }
        }
    };
    reindex(&groups, &mut positions);

    for sweep in 0..MAX_ORDERING_SWEEPS {
        let downward = sweep % 2 == 0;
        let rank_order: Vec<usize> = if downward {
            (1..groups.len()).collect()
        } else {
            (0..groups.len().saturating_sub(1)).rev().collect()
        };

        let mut changed = false;
        for rank in rank_order {
            let mut keyed: Vec<(f64, usize)> = groups[rank]
                .iter()
                .map(|&idx| {
                    let neighbors = if downward { &incoming[idx] } else { &outgoing[idx] };
                    let key = median_position(neighbors, &positions)
                        .unwrap_or(positions[idx] as f64);
                    (key, idx)
                })
                .collect();
            // Stable sort: equal keys keep their current relative order.
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let reordered: Vec<usize> = keyed.into_iter().map(|(_, idx)| idx).collect();
            if reordered != groups[rank] {
                changed = true;
                groups[rank] = reordered;
                reindex(&groups, &mut positions);
            }
        }

        if !changed {
            break;
        }
    }

    groups
}

/// Median of the neighbors' in-rank positions; on an even count, the mean of
/// the two middle values. `None` when the node has no neighbors on that side.
fn median_position(neighbors: &[usize], positions: &[usize]) -> Option<f64> {
    if neighbors.is_empty() {
        return None;
    }
    let mut values: Vec<usize> = neighbors.iter().map(|&n| positions[n]).collect();
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] + values[mid]) as f64 / 2.0)
    }
}

/// Map rank/order to screen coordinates. Each rank is center-aligned against
/// the widest rank; anchors are node centers.
fn assign_coordinates(
    nodes: &mut [GraphNode],
    rank_groups: &[Vec<usize>],
    orientation: Orientation,
    params: &LayoutParams,
) {
    // Node extent along each logical axis depends on orientation.
    let (order_size, rank_size) = match orientation {
        Orientation::Vertical => (params.node_width, params.node_height),
        Orientation::Horizontal => (params.node_height, params.node_width),
    };

    let extent = |len: usize| -> f64 {
        if len == 0 {
            0.0
        } else {
            len as f64 * order_size + (len - 1) as f64 * params.node_sep
        }
    };
    let max_extent = rank_groups
        .iter()
        .map(|g| extent(g.len()))
        .fold(0.0, f64::max);

    for (rank, group) in rank_groups.iter().enumerate() {
        let start = (max_extent - extent(group.len())) / 2.0;
        let rank_coord = rank as f64 * (rank_size + params.rank_sep) + rank_size / 2.0;
        for (order, &idx) in group.iter().enumerate() {
            let order_coord = start + order as f64 * (order_size + params.node_sep) + order_size / 2.0;
            let node = &mut nodes[idx];
            node.width = params.node_width;
            node.height = params.node_height;
            match orientation {
                Orientation::Vertical => {
                    node.x = order_coord;
                    node.y = rank_coord;
                }
                Orientation::Horizontal => {
                    node.x = rank_coord;
                    node.y = order_coord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::TrickGraph;
    use proptest::prelude::*;

    fn node(id: &str) -> GraphNode {
        GraphNode::placeholder(id.to_string(), id.to_string(), false)
    }

    fn edge(source: &str, target: &str) -> ResolvedEdge {
        ResolvedEdge {
            source: source.to_string(),
            target: target.to_string(),
            satisfied: false,
        }
    }

    fn laid_out(ids: &[&str], edges: &[(&str, &str)]) -> TrickGraph {
        let mut graph = TrickGraph {
            nodes: ids.iter().map(|id| node(id)).collect(),
            edges: edges.iter().map(|(s, t)| edge(s, t)).collect(),
            warnings: Vec::new(),
        };
        layout(
            &mut graph.nodes,
            &graph.edges.clone(),
            Orientation::Vertical,
            &LayoutParams::default(),
        );
        graph
    }

    #[test]
    fn chain_ranks_increase() {
        let g = laid_out(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(g.node("a").unwrap().rank, 0);
        assert_eq!(g.node("b").unwrap().rank, 1);
        assert_eq!(g.node("c").unwrap().rank, 2);
    }

    #[test]
    fn rank_is_longest_path_not_shortest() {
        // d is reachable in one hop from a but also via b -> c.
        let g = laid_out(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("a", "d"), ("c", "d")],
        );
        assert_eq!(g.node("d").unwrap().rank, 3);
    }

    #[test]
    fn no_edges_means_single_rank_in_input_order() {
        let g = laid_out(&["c", "a", "b"], &[]);
        for n in &g.nodes {
            assert_eq!(n.rank, 0);
        }
        let orders: Vec<usize> = g.nodes.iter().map(|n| n.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn median_ordering_untangles_crossed_children() {
        // Parents p0, p1 at rank 0 (in that order). Children listed in
        // crossing order: c1 (child of p1) before c0 (child of p0).
        let g = laid_out(
            &["p0", "p1", "c1", "c0"],
            &[("p1", "c1"), ("p0", "c0")],
        );
        let c0 = g.node("c0").unwrap();
        let c1 = g.node("c1").unwrap();
        assert!(c0.order < c1.order, "median sweep should uncross the edges");
    }

    #[test]
    fn orientation_swaps_axes_only() {
        let ids = ["a", "b", "c"];
        let edges = [("a", "b"), ("a", "c")];
        let vertical = laid_out(&ids, &edges);

        let mut nodes: Vec<GraphNode> = ids.iter().map(|id| node(id)).collect();
        let edge_vec: Vec<ResolvedEdge> = edges.iter().map(|(s, t)| edge(s, t)).collect();
        layout(
            &mut nodes,
            &edge_vec,
            Orientation::Horizontal,
            &LayoutParams::default(),
        );

        for (v, h) in vertical.nodes.iter().zip(&nodes) {
            assert_eq!(v.rank, h.rank);
            assert_eq!(v.order, h.order);
        }
        // Rank axis is y when vertical, x when horizontal.
        let vb = vertical.node("b").unwrap();
        let hb = nodes.iter().find(|n| n.id == "b").unwrap();
        assert!(vb.y > vertical.node("a").unwrap().y);
        assert!(hb.x > nodes.iter().find(|n| n.id == "a").unwrap().x);
    }

    #[test]
    fn anchors_are_node_centers() {
        let g = laid_out(&["a"], &[]);
        let params = LayoutParams::default();
        let n = g.node("a").unwrap();
        assert_eq!(n.x, params.node_width / 2.0);
        assert_eq!(n.y, params.node_height / 2.0);
    }

    // Random DAG-shaped inputs: edges always point from a lower node index
    // to a higher one, so the input is acyclic by construction.
    fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (2usize..16).prop_flat_map(|n| {
            let edges = proptest::collection::vec((0..n, 0..n), 0..30).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .collect::<Vec<_>>()
            });
            (Just(n), edges)
        })
    }

    proptest! {
        #[test]
        fn rank_monotone_over_random_dags((n, pairs) in dag_strategy()) {
            let ids: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
            let mut nodes: Vec<GraphNode> = ids.iter().map(|id| node(id)).collect();
            let edges: Vec<ResolvedEdge> = pairs
                .iter()
                .map(|(a, b)| edge(&ids[*a], &ids[*b]))
                .collect();
            layout(&mut nodes, &edges, Orientation::Vertical, &LayoutParams::default());

            for (a, b) in &pairs {
                prop_assert!(nodes[*a].rank < nodes[*b].rank);
            }
        }

        #[test]
        fn layout_is_idempotent((n, pairs) in dag_strategy()) {
            let ids: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
            let mut first: Vec<GraphNode> = ids.iter().map(|id| node(id)).collect();
            let edges: Vec<ResolvedEdge> = pairs
                .iter()
                .map(|(a, b)| edge(&ids[*a], &ids[*b]))
                .collect();
            let params = LayoutParams::default();
            layout(&mut first, &edges, Orientation::Vertical, &params);
            let mut second = first.clone();
            layout(&mut second, &edges, Orientation::Vertical, &params);
            prop_assert_eq!(first, second);
        }
    }
}
