//! Layered flow network: source → players → roles → sink.
//!
//! Every player gets a unit-capacity edge from the source, one edge per
//! known role it lists (cost = rank), and every role drains into the sink
//! with its seat count as capacity. The graph is acyclic by construction.
//!
//! The network is read-only once built. Flows are written exactly once, by
//! [`FlowNetwork::into_solved`], after checking them against capacities and
//! conservation.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::error::{Result, RoleFlowError};
use crate::model::{Agent, Category};

pub const SOURCE_LABEL: &str = "source";
pub const SINK_LABEL: &str = "sink";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Source,
    Agent,
    Category,
    Sink,
}

#[derive(Debug, Clone)]
pub struct FlowNode {
    pub kind: NodeKind,
    pub label: String,
    /// Negative for supply, positive for demand.
    pub demand: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEdge {
    pub capacity: i64,
    /// Cost per unit of flow.
    pub cost: i64,
    pub flow: i64,
}

impl FlowEdge {
    fn new(capacity: i64, cost: i64) -> Self {
        Self {
            capacity,
            cost,
            flow: 0,
        }
    }
}

impl std::fmt::Display for FlowNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

impl std::fmt::Display for FlowEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} @{}", self.flow, self.capacity, self.cost)
    }
}

/// Borrowed view of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeView<'a> {
    pub index: usize,
    pub kind: NodeKind,
    pub label: &'a str,
    pub demand: i64,
}

/// Borrowed view of one edge. `flow` is zero until the network is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeView<'a> {
    pub index: usize,
    pub from: NodeView<'a>,
    pub to: NodeView<'a>,
    pub capacity: i64,
    pub cost: i64,
    pub flow: i64,
}

#[derive(Debug, Clone)]
pub struct FlowNetwork {
    graph: DiGraph<FlowNode, FlowEdge>,
    source: NodeIndex,
    sink: NodeIndex,
    agents: Vec<NodeIndex>,
    total_capacity: i64,
    supply: i64,
}

/// Build the flow network for `agents` competing for `categories`.
///
/// Preferences naming unknown roles are skipped; their position still
/// counts towards the rank of later entries. Source supply is capped at the
/// number of players that have at least one usable edge.
pub fn build_network(agents: &[Agent], categories: &[Category]) -> Result<FlowNetwork> {
    let mut seen_categories = HashSet::new();
    let mut total_capacity: i64 = 0;
    for category in categories {
        if category.capacity < 0 {
            return Err(RoleFlowError::NegativeCapacity {
                category: category.id.clone(),
                capacity: category.capacity,
            });
        }
        if !seen_categories.insert(category.id.as_str()) {
            return Err(RoleFlowError::DuplicateCategory {
                category: category.id.clone(),
            });
        }
        total_capacity = total_capacity.saturating_add(category.capacity);
    }

    let mut seen_agents = HashSet::new();
    for agent in agents {
        if !seen_agents.insert(agent.id.as_str()) {
            return Err(RoleFlowError::DuplicateAgent {
                agent: agent.id.clone(),
            });
        }
        let mut listed = HashSet::new();
        for category in &agent.preferences {
            if !listed.insert(category.as_str()) {
                return Err(RoleFlowError::DuplicatePreference {
                    agent: agent.id.clone(),
                    category: category.clone(),
                });
            }
        }
    }

    let mut graph = DiGraph::with_capacity(agents.len() + categories.len() + 2, 0);
    let source = graph.add_node(FlowNode {
        kind: NodeKind::Source,
        label: SOURCE_LABEL.to_string(),
        demand: 0,
    });

    let agent_nodes: Vec<NodeIndex> = agents
        .iter()
        .map(|agent| {
            graph.add_node(FlowNode {
                kind: NodeKind::Agent,
                label: agent.id.clone(),
                demand: 0,
            })
        })
        .collect();

    let mut category_nodes: HashMap<&str, NodeIndex> = HashMap::with_capacity(categories.len());
    for category in categories {
        let node = graph.add_node(FlowNode {
            kind: NodeKind::Category,
            label: category.id.clone(),
            demand: 0,
        });
        category_nodes.insert(category.id.as_str(), node);
    }

    let sink = graph.add_node(FlowNode {
        kind: NodeKind::Sink,
        label: SINK_LABEL.to_string(),
        demand: 0,
    });

    for &node in &agent_nodes {
        graph.add_edge(source, node, FlowEdge::new(1, 0));
    }

    let mut eligible: i64 = 0;
    for (agent, &node) in agents.iter().zip(&agent_nodes) {
        let mut usable = false;
        for (rank, category) in agent.preferences.iter().enumerate() {
            if let Some(&target) = category_nodes.get(category.as_str()) {
                graph.add_edge(node, target, FlowEdge::new(1, rank as i64));
                usable = true;
            }
        }
        if usable {
            eligible += 1;
        } else {
            tracing::debug!(agent = %agent.id, "player has no usable preference");
        }
    }

    for category in categories {
        let node = category_nodes[category.id.as_str()];
        graph.add_edge(node, sink, FlowEdge::new(category.capacity, 0));
    }

    let supply = total_capacity.min(eligible);
    graph[source].demand = -supply;
    graph[sink].demand = supply;

    tracing::debug!(
        agents = agents.len(),
        categories = categories.len(),
        edges = graph.edge_count(),
        total_capacity,
        eligible,
        supply,
        "flow network built"
    );

    Ok(FlowNetwork {
        graph,
        source,
        sink,
        agents: agent_nodes,
        total_capacity,
        supply,
    })
}

impl FlowNetwork {
    /// Units of flow the source must push (and the sink must absorb).
    pub fn supply(&self) -> i64 {
        self.supply
    }

    /// Sum of all role capacities, before capping by eligible players.
    pub fn total_capacity(&self) -> i64 {
        self.total_capacity
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn category_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|n| n.kind == NodeKind::Category)
            .count()
    }

    pub fn source(&self) -> NodeView<'_> {
        self.node_view(self.source)
    }

    pub fn sink(&self) -> NodeView<'_> {
        self.node_view(self.sink)
    }

    /// Nodes in insertion order: source, players, roles, sink.
    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        self.graph.node_indices().map(move |i| self.node_view(i))
    }

    /// Edges in insertion order; `EdgeView::index` matches the position in
    /// a [`FlowSolution`](crate::solver::FlowSolution) flow vector.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.graph.edge_references().map(move |e| {
            let weight = e.weight();
            EdgeView {
                index: e.id().index(),
                from: self.node_view(e.source()),
                to: self.node_view(e.target()),
                capacity: weight.capacity,
                cost: weight.cost,
                flow: weight.flow,
            }
        })
    }

    fn node_view(&self, index: NodeIndex) -> NodeView<'_> {
        let node = &self.graph[index];
        NodeView {
            index: index.index(),
            kind: node.kind,
            label: &node.label,
            demand: node.demand,
        }
    }

    pub(crate) fn graph(&self) -> &DiGraph<FlowNode, FlowEdge> {
        &self.graph
    }

    /// Player nodes in input order.
    pub(crate) fn agent_nodes(&self) -> &[NodeIndex] {
        &self.agents
    }

    /// Write `flows` into the network after checking them.
    ///
    /// Rejects vectors of the wrong length, flows outside `[0, capacity]`,
    /// conservation violations at player and role nodes, and a total that
    /// differs from the supply.
    pub fn into_solved(mut self, flows: &[i64]) -> Result<SolvedNetwork> {
        if flows.len() != self.graph.edge_count() {
            return Err(invalid_flow(format!(
                "expected {} edge flows, got {}",
                self.graph.edge_count(),
                flows.len()
            )));
        }

        let mut balance = vec![0i64; self.graph.node_count()];
        let mut total_cost: i64 = 0;
        for edge in self.graph.edge_references() {
            let flow = flows[edge.id().index()];
            let weight = edge.weight();
            if flow < 0 || flow > weight.capacity {
                return Err(invalid_flow(format!(
                    "flow {} on {} -> {} outside [0, {}]",
                    flow,
                    self.graph[edge.source()].label,
                    self.graph[edge.target()].label,
                    weight.capacity
                )));
            }
            balance[edge.source().index()] -= flow;
            balance[edge.target().index()] += flow;
            total_cost += flow * weight.cost;
        }

        for index in self.graph.node_indices() {
            let node = &self.graph[index];
            if node.demand != balance[index.index()] {
                return Err(invalid_flow(format!(
                    "node {} has net inflow {}, expected {}",
                    node.label,
                    balance[index.index()],
                    node.demand
                )));
            }
        }

        for (edge, &flow) in self.graph.edge_weights_mut().zip(flows) {
            edge.flow = flow;
        }

        Ok(SolvedNetwork {
            value: self.supply,
            total_cost,
            network: self,
        })
    }
}

fn invalid_flow(reason: String) -> RoleFlowError {
    RoleFlowError::InvalidFlow { reason }
}

/// A network whose edges carry a checked, feasible flow.
#[derive(Debug, Clone)]
pub struct SolvedNetwork {
    network: FlowNetwork,
    value: i64,
    total_cost: i64,
}

impl SolvedNetwork {
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        self.network.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.network.edges()
    }

    /// Units routed from source to sink.
    pub fn flow_value(&self) -> i64 {
        self.value
    }

    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    pub fn supply(&self) -> i64 {
        self.network.supply()
    }

    /// Role receiving flow from `agent`, if any.
    pub fn assigned_category(&self, agent: &str) -> Option<&str> {
        let graph = self.network.graph();
        let node = self
            .network
            .agent_nodes()
            .iter()
            .copied()
            .find(|&n| graph[n].label == agent)?;
        self.outflow_target(node).map(|(target, _)| graph[target].label.as_str())
    }

    /// First outgoing edge of `node` carrying flow, with its cost.
    pub(crate) fn outflow_target(&self, node: NodeIndex) -> Option<(NodeIndex, i64)> {
        self.network
            .graph()
            .edges_directed(node, Direction::Outgoing)
            .filter(|e| e.weight().flow > 0)
            .map(|e| (e.target(), e.weight().cost))
            .min_by_key(|&(target, _)| target.index())
    }
}
