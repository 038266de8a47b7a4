//! Successive shortest path min-cost flow.
//!
//! Each round finds a cheapest source→sink path in the residual graph and
//! pushes as much flow along it as the path allows, until the required
//! supply is routed. With integral capacities every augmentation is
//! integral, and every intermediate flow is cost-optimal for its value.
//!
//! Ties are resolved toward lower node indices: players and roles that came
//! first in the input win equal-cost choices.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{Result, RoleFlowError};
use crate::network::FlowNetwork;

use super::{FlowSolution, MinCostFlowSolver, PathSearch};

const UNREACHED: i64 = i64::MAX;

#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessiveShortestPath {
    search: PathSearch,
}

impl SuccessiveShortestPath {
    pub fn new(search: PathSearch) -> Self {
        Self { search }
    }
}

impl MinCostFlowSolver for SuccessiveShortestPath {
    fn solve(&self, network: &FlowNetwork) -> Result<FlowSolution> {
        let required = network.supply();
        let source = network.source().index;
        let sink = network.sink().index;

        let mut residual = Residual::from_network(network);
        // All edge costs are ranks, so zero potentials start out valid.
        let mut potential = vec![0i64; network.node_count()];
        let mut routed: i64 = 0;
        let mut cost: i64 = 0;
        let mut rounds = 0usize;

        while routed < required {
            let (dist, prev) = match self.search {
                PathSearch::Dijkstra => residual.dijkstra(source, &potential),
                PathSearch::BellmanFord => residual.bellman_ford(source),
            };

            let Some(path) = residual.path_to(&prev, source, sink) else {
                tracing::warn!(required, routed, "no augmenting path left");
                return Err(RoleFlowError::Infeasible { required, routed });
            };

            if self.search == PathSearch::Dijkstra {
                for (p, &d) in potential.iter_mut().zip(&dist) {
                    if d != UNREACHED {
                        *p += d;
                    }
                }
            }

            let bottleneck = path
                .iter()
                .map(|&arc| residual.cap[arc])
                .fold(required - routed, i64::min);
            let path_cost: i64 = path.iter().map(|&arc| residual.cost[arc]).sum();
            residual.augment(&path, bottleneck);

            routed += bottleneck;
            cost += bottleneck * path_cost;
            rounds += 1;
            tracing::trace!(round = rounds, bottleneck, path_cost, "augmented");
        }

        tracing::debug!(
            search = %self.search,
            rounds,
            value = routed,
            cost,
            "min-cost flow solved"
        );

        Ok(FlowSolution {
            flows: residual.edge_flows(),
            value: routed,
            cost,
        })
    }
}

/// Residual graph stored as paired arcs: arc `2k` is edge `k` forward,
/// arc `2k + 1` its reverse. The reverse arc's capacity is the edge's flow.
struct Residual {
    to: Vec<usize>,
    cap: Vec<i64>,
    cost: Vec<i64>,
    adjacency: Vec<Vec<usize>>,
}

impl Residual {
    fn from_network(network: &FlowNetwork) -> Self {
        let arcs = network.edge_count() * 2;
        let mut residual = Self {
            to: vec![0; arcs],
            cap: vec![0; arcs],
            cost: vec![0; arcs],
            adjacency: vec![Vec::new(); network.node_count()],
        };

        for edge in network.edges() {
            let forward = edge.index * 2;
            let backward = forward + 1;
            residual.to[forward] = edge.to.index;
            residual.cap[forward] = edge.capacity;
            residual.cost[forward] = edge.cost;
            residual.to[backward] = edge.from.index;
            residual.cost[backward] = -edge.cost;
            residual.adjacency[edge.from.index].push(forward);
            residual.adjacency[edge.to.index].push(backward);
        }

        residual
    }

    fn tail(&self, arc: usize) -> usize {
        self.to[arc ^ 1]
    }

    fn dijkstra(&self, source: usize, potential: &[i64]) -> (Vec<i64>, Vec<Option<usize>>) {
        let n = self.adjacency.len();
        let mut dist = vec![UNREACHED; n];
        let mut prev = vec![None; n];
        dist[source] = 0;

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0i64, source)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if d > dist[u] {
                continue;
            }
            for &arc in &self.adjacency[u] {
                if self.cap[arc] <= 0 {
                    continue;
                }
                let v = self.to[arc];
                let reduced = self.cost[arc] + potential[u] - potential[v];
                debug_assert!(reduced >= 0, "negative reduced cost on arc {arc}");
                let next = d + reduced;
                if next < dist[v] {
                    dist[v] = next;
                    prev[v] = Some(arc);
                    heap.push(Reverse((next, v)));
                }
            }
        }

        (dist, prev)
    }

    fn bellman_ford(&self, source: usize) -> (Vec<i64>, Vec<Option<usize>>) {
        let n = self.adjacency.len();
        let mut dist = vec![UNREACHED; n];
        let mut prev = vec![None; n];
        dist[source] = 0;

        for _ in 1..n {
            let mut changed = false;
            for u in 0..n {
                if dist[u] == UNREACHED {
                    continue;
                }
                for &arc in &self.adjacency[u] {
                    if self.cap[arc] <= 0 {
                        continue;
                    }
                    let v = self.to[arc];
                    let next = dist[u] + self.cost[arc];
                    if next < dist[v] {
                        dist[v] = next;
                        prev[v] = Some(arc);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        (dist, prev)
    }

    /// Arcs from `source` to `sink` following `prev`, or `None` if the sink
    /// was not reached.
    fn path_to(&self, prev: &[Option<usize>], source: usize, sink: usize) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut node = sink;
        while node != source {
            let arc = prev[node]?;
            path.push(arc);
            node = self.tail(arc);
        }
        Some(path)
    }

    fn augment(&mut self, path: &[usize], amount: i64) {
        for &arc in path {
            self.cap[arc] -= amount;
            self.cap[arc ^ 1] += amount;
        }
    }

    fn edge_flows(&self) -> Vec<i64> {
        self.cap.iter().skip(1).step_by(2).copied().collect()
    }
}
