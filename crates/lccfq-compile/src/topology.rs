//! Physical qubit connectivity.

use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use crate::error::{CompileError, CompileResult};

const UNREACHABLE: u32 = u32::MAX;

/// Serialized form of a [`Topology`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    /// Number of physical qubits.
    pub num_qubits: u32,
    /// Undirected coupling pairs.
    #[serde(default)]
    pub edges: Vec<(u32, u32)>,
}

/// The undirected coupling graph of a device.
///
/// Construction precomputes an all-pairs distance matrix with one BFS per
/// qubit, so adjacency and distance queries are O(1) and path reconstruction
/// is O(distance). A topology is read-only after construction and can be
/// shared between concurrent compilations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TopologySpec", into = "TopologySpec")]
pub struct Topology {
    num_qubits: u32,
    /// Normalized `(min, max)` pairs, ascending.
    edges: Vec<(u32, u32)>,
    /// Ascending neighbor lists, indexed by physical qubit.
    adjacency: Vec<Vec<u32>>,
    /// `dist[a][b]`, or `UNREACHABLE`.
    dist: Vec<Vec<u32>>,
    /// Connected component label per qubit.
    component: Vec<usize>,
    num_components: usize,
}

impl Topology {
    /// Build a topology from coupling pairs.
    ///
    /// Pairs are undirected; duplicates and reversed duplicates collapse.
    /// Fails on self-loops and on indices outside `0..num_qubits`.
    pub fn new(
        num_qubits: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> CompileResult<Self> {
        let mut normalized = BTreeSet::new();
        for (a, b) in edges {
            if a >= num_qubits || b >= num_qubits {
                return Err(CompileError::InvalidTopology(format!(
                    "edge ({a}, {b}) references a qubit outside 0..{num_qubits}"
                )));
            }
            if a == b {
                return Err(CompileError::InvalidTopology(format!(
                    "self-loop on qubit {a}"
                )));
            }
            normalized.insert((a.min(b), a.max(b)));
        }
        Ok(Self::from_normalized(num_qubits, normalized.into_iter().collect()))
    }

    fn from_normalized(num_qubits: u32, edges: Vec<(u32, u32)>) -> Self {
        let n = num_qubits as usize;
        let mut adjacency = vec![vec![]; n];
        for &(a, b) in &edges {
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }

        let graph = UnGraph::<(), ()>::from_edges(edges.iter().copied());
        let mut components = UnionFind::<usize>::new(n);
        for edge in graph.raw_edges() {
            components.union(edge.source().index(), edge.target().index());
        }
        let labels = components.into_labeling();
        let num_components = petgraph::algo::connected_components(&graph)
            + n.saturating_sub(graph.node_count());

        let mut topology = Self {
            num_qubits,
            edges,
            adjacency,
            dist: vec![],
            component: labels,
            num_components,
        };
        topology.precompute_distances();
        topology
    }

    fn precompute_distances(&mut self) {
        let n = self.num_qubits as usize;
        self.dist = vec![vec![UNREACHABLE; n]; n];
        for src in 0..n {
            self.dist[src][src] = 0;
            let mut queue = VecDeque::from([src]);
            while let Some(current) = queue.pop_front() {
                for &neighbor in &self.adjacency[current] {
                    let nb = neighbor as usize;
                    if self.dist[src][nb] == UNREACHABLE {
                        self.dist[src][nb] = self.dist[src][current] + 1;
                        queue.push_back(nb);
                    }
                }
            }
        }
    }

    /// Linear chain 0-1-2-...
    pub fn linear(n: u32) -> Self {
        Self::from_normalized(n, (1..n).map(|i| (i - 1, i)).collect())
    }

    /// Closed ring.
    pub fn ring(n: u32) -> Self {
        let mut edges: BTreeSet<(u32, u32)> = (1..n).map(|i| (i - 1, i)).collect();
        if n > 2 {
            edges.insert((0, n - 1));
        }
        Self::from_normalized(n, edges.into_iter().collect())
    }

    /// Qubit 0 coupled to every other qubit.
    pub fn star(n: u32) -> Self {
        Self::from_normalized(n, (1..n).map(|i| (0, i)).collect())
    }

    /// Every pair coupled.
    pub fn full(n: u32) -> Self {
        let edges = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        Self::from_normalized(n, edges)
    }

    /// Rectangular nearest-neighbor grid, row-major numbering.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut edges = BTreeSet::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    edges.insert((q, q + 1));
                }
                if r + 1 < rows {
                    edges.insert((q, q + cols));
                }
            }
        }
        Self::from_normalized(rows * cols, edges.into_iter().collect())
    }

    /// Qubits with no couplings at all.
    pub fn disconnected(n: u32) -> Self {
        Self::from_normalized(n, vec![])
    }

    /// A copy with every coupling that touches an excluded qubit removed.
    #[must_use]
    pub fn without_qubits(&self, excluded: &[u32]) -> Self {
        let edges = self
            .edges
            .iter()
            .copied()
            .filter(|(a, b)| !excluded.contains(a) && !excluded.contains(b))
            .collect();
        Self::from_normalized(self.num_qubits, edges)
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Coupling pairs as `(min, max)`, ascending.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Whether a direct two-qubit operation between `a` and `b` is possible.
    #[inline]
    pub fn is_adjacent(&self, a: u32, b: u32) -> bool {
        self.adjacency
            .get(a as usize)
            .is_some_and(|n| n.binary_search(&b).is_ok())
    }

    /// Neighbors of `qubit`, ascending.
    pub fn neighbors(&self, qubit: u32) -> &[u32] {
        self.adjacency
            .get(qubit as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of couplings of `qubit`.
    pub fn degree(&self, qubit: u32) -> usize {
        self.neighbors(qubit).len()
    }

    /// Hop distance, `None` when unreachable or out of range.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        let d = *self.dist.get(from as usize)?.get(to as usize)?;
        (d != UNREACHABLE).then_some(d)
    }

    /// Whether `a` and `b` lie in the same connected component.
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        match (self.component.get(a as usize), self.component.get(b as usize)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Number of connected components; isolated qubits count individually.
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Shortest path from `from` to `to`, both endpoints included.
    ///
    /// Among all shortest paths the lexicographically smallest sequence of
    /// qubit indices is returned, so routing is deterministic.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        let mut remaining = self.distance(from, to)?;
        let mut path = vec![from];
        let mut current = from;
        while remaining > 0 {
            let next = self
                .neighbors(current)
                .iter()
                .copied()
                .find(|&n| self.dist[n as usize][to as usize] == remaining - 1)?;
            path.push(next);
            current = next;
            remaining -= 1;
        }
        Some(path)
    }
}

impl PartialEq for Topology {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits && self.edges == other.edges
    }
}

impl Eq for Topology {}

impl TryFrom<TopologySpec> for Topology {
    type Error = CompileError;

    fn try_from(spec: TopologySpec) -> Result<Self, Self::Error> {
        Topology::new(spec.num_qubits, spec.edges)
    }
}

impl From<Topology> for TopologySpec {
    fn from(topology: Topology) -> Self {
        TopologySpec {
            num_qubits: topology.num_qubits,
            edges: topology.edges,
        }
    }
}
