//! Min-cost flow solvers.
//!
//! A solver only reads the network through its public views and returns one
//! flow value per edge; [`FlowNetwork::into_solved`] checks the result, so a
//! faulty implementation cannot produce an inconsistent assignment.

mod ssp;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::FlowNetwork;

pub use ssp::SuccessiveShortestPath;

/// Computes a minimum-cost flow that routes exactly `network.supply()` units.
pub trait MinCostFlowSolver {
    fn solve(&self, network: &FlowNetwork) -> Result<FlowSolution>;
}

/// Flow per edge, indexed by [`EdgeView::index`](crate::network::EdgeView::index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSolution {
    pub flows: Vec<i64>,
    /// Units routed from source to sink.
    pub value: i64,
    pub cost: i64,
}

/// Shortest-path routine used for each augmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathSearch {
    /// Dijkstra over reduced costs, keeping node potentials between rounds.
    #[default]
    Dijkstra,
    /// Bellman-Ford over raw residual costs.
    BellmanFord,
}

impl PathSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dijkstra => "dijkstra",
            Self::BellmanFord => "bellman-ford",
        }
    }
}

impl std::fmt::Display for PathSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
