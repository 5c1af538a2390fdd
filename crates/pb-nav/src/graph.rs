//! The waypoint graph.
//!
//! Edges are stored grouped by source node, so the links leaving a waypoint
//! form one contiguous run of `edges`:
//!
//! ```text
//! edges[ first_edge[n] .. first_edge[n + 1] ]
//! ```
//!
//! Waypoints and links are also loaded into R-trees, so an arbitrary hit
//! point can be snapped to the closest waypoint or projected onto the links
//! passing near it.

use rstar::primitives::{GeomWithData, Line};
use rstar::{PointDistance, RTree};

use pb_core::{EdgeId, NodeId, Position};

use crate::{NavError, NavResult};

type IndexedWaypoint = GeomWithData<[f32; 3], NodeId>;
type IndexedLink = GeomWithData<Line<[f32; 3]>, EdgeId>;

/// One directed link.  `length` is the straight-line distance between the
/// two waypoints.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from:   NodeId,
    pub to:     NodeId,
    pub length: f32,
}

/// A point projected onto a link.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkHit {
    pub edge:  EdgeId,
    /// The closest point of the link.
    pub point: Position,
    /// How far along the link `point` lies, from 0 at `from` to 1 at `to`.
    pub t:     f32,
}

/// Directed waypoint graph with nearest-waypoint lookup.
///
/// Built with [`NavGraphBuilder`].
pub struct NavGraph {
    waypoints:  Vec<Position>,
    first_edge: Vec<u32>,
    edges:      Vec<Edge>,
    index:      RTree<IndexedWaypoint>,
    links:      RTree<IndexedLink>,
}

impl NavGraph {
    /// A graph with no waypoints.  Snapping to it always fails.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.waypoints.get(node.index()).copied()
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// IDs of the links leaving `node`.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let (lo, hi) = self.edge_run(node);
        (lo..hi).map(EdgeId)
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        let (lo, hi) = self.edge_run(node);
        (hi - lo) as usize
    }

    fn edge_run(&self, node: NodeId) -> (u32, u32) {
        let n = node.index();
        (self.first_edge[n], self.first_edge[n + 1])
    }

    /// Closest waypoint to `pos` and its distance; `None` for an empty graph.
    pub fn nearest_node(&self, pos: Position) -> Option<(NodeId, f32)> {
        let query = pos.to_array();
        self.index
            .nearest_neighbor(&query)
            .map(|w| (w.data, w.distance_2(&query).sqrt()))
    }

    /// Closest waypoint to `pos`, provided it is at most `radius` away.
    pub fn snap(&self, pos: Position, radius: f32) -> NavResult<NodeId> {
        match self.nearest_node(pos) {
            Some((id, d)) if d <= radius => Ok(id),
            _ => Err(NavError::Unsnappable(pos)),
        }
    }

    /// Every link passing within `radius` of `pos`, with `pos` projected onto
    /// it.  Sorted by edge ID.
    pub fn links_near(&self, pos: Position, radius: f32) -> Vec<LinkHit> {
        let mut hits: Vec<LinkHit> = self
            .links
            .locate_within_distance(pos.to_array(), radius * radius)
            .map(|l| {
                let e = self.edge(l.data);
                let a = self.waypoints[e.from.index()];
                let b = self.waypoints[e.to.index()];
                let t = project(a, b, pos);
                LinkHit { edge: l.data, point: a.lerp(b, t), t }
            })
            .collect();
        hits.sort_unstable_by_key(|h| h.edge);
        hits
    }

    /// The `k` waypoints closest to `pos`, nearest first.
    pub fn k_nearest_nodes(&self, pos: Position, k: usize) -> Vec<NodeId> {
        self.index
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|w| w.data)
            .collect()
    }
}

/// Collects waypoints and links, then freezes them into a [`NavGraph`].
///
/// ```
/// use pb_core::Position;
/// use pb_nav::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_node(Position::new(0.0, 0.0, 0.0));
/// let c = b.add_node(Position::new(3.0, 0.0, 4.0));
/// b.add_link(a, c).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.edge_count(), 2);
/// assert!(graph.out_edges(a).all(|e| graph.edge(e).length == 5.0));
/// ```
#[derive(Default)]
pub struct NavGraphBuilder {
    waypoints: Vec<Position>,
    edges:     Vec<Edge>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a waypoint.  IDs are handed out from 0 in insertion order.
    pub fn add_node(&mut self, pos: Position) -> NodeId {
        let id = NodeId(self.waypoints.len() as u32);
        self.waypoints.push(pos);
        id
    }

    /// One-way link from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) -> NavResult<()> {
        let length = self.node_pos(from)?.distance(self.node_pos(to)?);
        self.edges.push(Edge { from, to, length });
        Ok(())
    }

    /// Two-way link between `a` and `b`.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> NavResult<()> {
        self.add_directed_edge(a, b)?;
        self.add_directed_edge(b, a)
    }

    /// Two-way links along consecutive waypoints of `chain`.
    pub fn add_corridor(&mut self, chain: &[NodeId]) -> NavResult<()> {
        chain.windows(2).try_for_each(|w| self.add_link(w[0], w[1]))
    }

    pub fn node_pos(&self, id: NodeId) -> NavResult<Position> {
        self.waypoints.get(id.index()).copied().ok_or(NavError::NodeNotFound(id))
    }

    pub fn node_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn build(self) -> NavGraph {
        let n = self.waypoints.len();

        // Counting sort by source; links keep their insertion order per node.
        let mut first_edge = vec![0u32; n + 1];
        for e in &self.edges {
            first_edge[e.from.index() + 1] += 1;
        }
        for i in 0..n {
            first_edge[i + 1] += first_edge[i];
        }
        let mut cursor = first_edge.clone();
        let mut slots: Vec<Option<Edge>> = vec![None; self.edges.len()];
        for e in self.edges {
            let slot = &mut cursor[e.from.index()];
            slots[*slot as usize] = Some(e);
            *slot += 1;
        }
        let edges: Vec<Edge> = slots.into_iter().flatten().collect();

        let index = RTree::bulk_load(
            self.waypoints
                .iter()
                .enumerate()
                .map(|(i, p)| GeomWithData::new(p.to_array(), NodeId(i as u32)))
                .collect(),
        );

        let links = RTree::bulk_load(
            edges
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let a = self.waypoints[e.from.index()].to_array();
                    let b = self.waypoints[e.to.index()].to_array();
                    GeomWithData::new(Line::new(a, b), EdgeId(i as u32))
                })
                .collect(),
        );

        NavGraph { waypoints: self.waypoints, first_edge, edges, index, links }
    }
}

/// Parameter of the point of segment `a..b` closest to `p`, in `[0, 1]`.
fn project(a: Position, b: Position, p: Position) -> f32 {
    let len_sq = a.distance_sq(b);
    if len_sq == 0.0 {
        return 0.0;
    }
    let dot = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y) + (p.z - a.z) * (b.z - a.z);
    (dot / len_sq).clamp(0.0, 1.0)
}
