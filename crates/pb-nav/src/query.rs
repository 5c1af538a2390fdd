//! Path queries: the `NavQuery` trait and two reference navigators.
//!
//! # Pluggability
//!
//! The movement planner asks for paths through [`NavQuery`] only, so a host
//! can plug in an engine's navmesh (or anything else that returns a polyline)
//! without touching the core.  Failure is not an error at this boundary: a
//! navigator that cannot connect two points returns an empty path and the
//! planner treats that as "stay in place".

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use pb_core::{EdgeId, NodeId, Position};

use crate::graph::NavGraph;
use crate::{NavError, NavResult};

// ── NavQuery trait ────────────────────────────────────────────────────────────

/// Black-box path query.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one navigator can serve every
/// pilot when the world processes pilots on Rayon's pool.
pub trait NavQuery: Send + Sync {
    /// Polyline from `from` to `to`, both endpoints included.
    ///
    /// Returns an empty `Vec` when no path exists.
    fn find_path(&self, from: Position, to: Position) -> Vec<Position>;
}

// ── OpenFloor ─────────────────────────────────────────────────────────────────

/// An obstacle-free surface: every path is the straight segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFloor;

impl NavQuery for OpenFloor {
    fn find_path(&self, from: Position, to: Position) -> Vec<Position> {
        if !from.is_finite() || !to.is_finite() {
            return Vec::new();
        }
        vec![from, to]
    }
}

// ── GraphNavigator ────────────────────────────────────────────────────────────

/// Shortest paths over a [`NavGraph`].
///
/// Each endpoint is projected onto every link within `snap_radius`; if
/// either has no link in range the query fails.  The search starts from the
/// ends of the links near `from`, seeded with the distance already covered
/// to reach them, and may also stay on a single link when both projections
/// fall on it in order.  The returned polyline is
/// `[from, entry point, route nodes…, exit point, to]` with consecutive
/// duplicates removed, and its length is the cost the search minimised.
pub struct GraphNavigator {
    pub graph:       NavGraph,
    pub snap_radius: f32,
}

impl GraphNavigator {
    pub fn new(graph: NavGraph, snap_radius: f32) -> Self {
        Self { graph, snap_radius }
    }

    /// Node sequence of the shortest route between two graph nodes.
    ///
    /// `from == to` yields the single node.
    pub fn route(&self, from: NodeId, to: NodeId) -> NavResult<Vec<NodeId>> {
        let n = self.graph.node_count();
        if from.index() >= n {
            return Err(NavError::NodeNotFound(from));
        }
        if to.index() >= n {
            return Err(NavError::NodeNotFound(to));
        }
        let sources = [Anchor { node: from, cost: 0.0, point: Position::ORIGIN }];
        let goals = [Anchor { node: to, cost: 0.0, point: Position::ORIGIN }];
        cheapest(&self.graph, &sources, &goals)
            .map(|route| route.nodes)
            .ok_or(NavError::NoRoute { from, to })
    }

    fn try_find_path(&self, from: Position, to: Position) -> NavResult<Vec<Position>> {
        if !from.is_finite() {
            return Err(NavError::NonFinite(from));
        }
        if !to.is_finite() {
            return Err(NavError::NonFinite(to));
        }
        let near_from = self.graph.links_near(from, self.snap_radius);
        if near_from.is_empty() {
            return Err(NavError::Unsnappable(from));
        }
        let near_to = self.graph.links_near(to, self.snap_radius);
        if near_to.is_empty() {
            return Err(NavError::Unsnappable(to));
        }
        if from == to {
            return Ok(vec![from]);
        }

        // Leaving `from`: onto a link, then forward to its far end.
        let sources: Vec<Anchor> = near_from
            .iter()
            .map(|h| {
                let link = self.graph.edge(h.edge);
                let end = self.graph.position(link.to).unwrap_or(h.point);
                Anchor { node: link.to, cost: from.distance(h.point) + h.point.distance(end), point: h.point }
            })
            .collect();
        // Reaching `to`: from a link's near end, along it, then off it.
        let goals: Vec<Anchor> = near_to
            .iter()
            .map(|h| {
                let link = self.graph.edge(h.edge);
                let start = self.graph.position(link.from).unwrap_or(h.point);
                Anchor { node: link.from, cost: start.distance(h.point) + h.point.distance(to), point: h.point }
            })
            .collect();

        // Staying on one link, when `to` projects no earlier than `from`.
        let direct = near_from
            .iter()
            .filter_map(|a| {
                let b = near_to.iter().find(|b| b.edge == a.edge && b.t >= a.t)?;
                let cost = from.distance(a.point) + a.point.distance(b.point) + b.point.distance(to);
                Some((cost, a.point, b.point))
            })
            .min_by(|x, y| x.0.total_cmp(&y.0));

        let mut path = match (direct, cheapest(&self.graph, &sources, &goals)) {
            (Some((cost, _, _)), Some(route)) if route.cost < cost => self.route_path(from, route, to),
            (Some((_, enter, exit)), _) if enter == exit => vec![from, to],
            (Some((_, enter, exit)), _) => vec![from, enter, exit, to],
            (None, Some(route)) => self.route_path(from, route, to),
            (None, None) => return Err(NavError::NoPath { from, to }),
        };
        path.dedup();
        Ok(path)
    }

    fn route_path(&self, from: Position, route: Route, to: Position) -> Vec<Position> {
        let mut path = Vec::with_capacity(route.nodes.len() + 4);
        path.push(from);
        path.push(route.enter);
        path.extend(route.nodes.iter().filter_map(|&n| self.graph.position(n)));
        path.push(route.exit);
        path.push(to);
        path
    }
}

impl NavQuery for GraphNavigator {
    fn find_path(&self, from: Position, to: Position) -> Vec<Position> {
        match self.try_find_path(from, to) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("path query {from} -> {to} failed: {e}");
                Vec::new()
            }
        }
    }
}

// ── Search internals ─────────────────────────────────────────────────────────

/// Float cost with a total order so it can live in a `BinaryHeap`.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f32);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A place the search may start or finish: `node`, at `cost` from the query
/// endpoint by way of `point`.
#[derive(Copy, Clone, Debug)]
struct Anchor {
    node:  NodeId,
    cost:  f32,
    point: Position,
}

#[derive(Debug)]
struct Route {
    nodes: Vec<NodeId>,
    cost:  f32,
    enter: Position,
    exit:  Position,
}

/// Cheapest `source cost + path + goal cost` over every source and goal
/// anchor.  Only the cheapest anchor per node is kept; earlier anchors win
/// ties.
fn cheapest(graph: &NavGraph, sources: &[Anchor], goals: &[Anchor]) -> Option<Route> {
    let n = graph.node_count();
    let mut dist      = vec![f32::INFINITY; n];
    let mut prev_edge: Vec<Option<EdgeId>> = vec![None; n];
    let mut enter: Vec<Option<Position>> = vec![None; n];
    let mut exit: Vec<Option<(f32, Position)>> = vec![None; n];

    for g in goals {
        let slot = &mut exit[g.node.index()];
        if slot.is_none_or(|(c, _)| g.cost < c) {
            *slot = Some((g.cost, g.point));
        }
    }

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    for s in sources {
        let i = s.node.index();
        if s.cost < dist[i] {
            dist[i] = s.cost;
            enter[i] = Some(s.point);
            heap.push(Reverse((Cost(s.cost), s.node)));
        }
    }

    let mut best: Option<(f32, NodeId)> = None;
    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if best.is_some_and(|(b, _)| cost >= b) {
            break;
        }
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }
        if let Some((extra, _)) = exit[node.index()] {
            if best.is_none_or(|(b, _)| cost + extra < b) {
                best = Some((cost + extra, node));
            }
        }

        for edge in graph.out_edges(node) {
            let link = graph.edge(edge);
            let neighbor = link.to;
            let new_cost = cost + link.length;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = Some(edge);
                enter[neighbor.index()] = None;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    let (total, last) = best?;
    let nodes = reconstruct(graph, &prev_edge, last);
    let first = *nodes.first()?;
    Some(Route {
        cost:  total,
        enter: enter[first.index()]?,
        exit:  exit[last.index()]?.1,
        nodes,
    })
}

fn reconstruct(graph: &NavGraph, prev_edge: &[Option<EdgeId>], to: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    while let Some(e) = prev_edge[cur.index()] {
        cur = graph.edge(e).from;
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
