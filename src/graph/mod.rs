//! Dependency graph ordering
//!
//! Topological sort over a square boolean adjacency matrix using Kahn's algorithm.
//! `matrix[row][col] == true` means `col` depends on `row`, so `row` is emitted first.
//! Among vertices that are ready at the same time the lowest index wins, which keeps
//! the order stable with respect to declaration order.

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Error during topological sorting
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SortError {
    #[error("Adjacency matrix must be square, but got shape ({rows}, {cols})")]
    NotSquare { rows: usize, cols: usize },
    #[error("Adjacency matrix contains circular structure (vertices involved: {members:?})")]
    Cycle { members: Vec<usize> },
}

/// Square boolean adjacency matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Create an `size x size` matrix without edges
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Build a matrix from rows, rejecting non-square input
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, SortError> {
        let size = rows.len();
        let mut matrix = Self::new(size);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != size {
                return Err(SortError::NotSquare {
                    rows: size,
                    cols: cells.len(),
                });
            }
            for (col, cell) in cells.into_iter().enumerate() {
                if cell {
                    matrix.set(row, col);
                }
            }
        }
        Ok(matrix)
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Mark `col` as depending on `row`
    pub fn set(&mut self, row: usize, col: usize) {
        self.cells[row * self.size + col] = true;
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.size + col]
    }

    fn into_graph(self) -> DiGraph<usize, ()> {
        let mut graph = DiGraph::with_capacity(self.size, 0);
        let nodes: Vec<NodeIndex> = (0..self.size).map(|i| graph.add_node(i)).collect();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.get(row, col) {
                    graph.add_edge(nodes[row], nodes[col], ());
                }
            }
        }
        graph
    }
}

/// Sort the vertices of `matrix` in dependency order
///
/// Returns a permutation of `0..matrix.len()`. The matrix is consumed; fails with
/// [`SortError::Cycle`] whenever any edge survives the elimination.
pub fn topological_sort(matrix: AdjacencyMatrix) -> Result<Vec<usize>, SortError> {
    let graph = matrix.into_graph();
    let vertex_count = graph.node_count();

    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(vertex, _)| Reverse(vertex))
        .collect();

    let mut order = Vec::with_capacity(vertex_count);
    while let Some(Reverse(vertex)) = ready.pop() {
        order.push(vertex);
        for successor in graph.neighbors_directed(NodeIndex::new(vertex), Direction::Outgoing) {
            let successor = successor.index();
            in_degree[successor] -= 1;
            if in_degree[successor] == 0 {
                ready.push(Reverse(successor));
            }
        }
    }

    if order.len() == vertex_count {
        Ok(order)
    } else {
        Err(SortError::Cycle {
            members: cycle_members(&graph),
        })
    }
}

/// Vertices that sit on a cycle: members of non-trivial strongly connected
/// components plus self-referencing vertices
fn cycle_members(graph: &DiGraph<usize, ()>) -> Vec<usize> {
    let mut members: Vec<usize> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .flatten()
        .map(|node| graph[node])
        .collect();
    members.sort_unstable();
    members
}
