//! Turning a solved network back into a player → role mapping.

use serde::Serialize;

use crate::error::Result;
use crate::model::{Agent, Category};
use crate::network::{build_network, SolvedNetwork};
use crate::solver::{MinCostFlowSolver, PathSearch, SuccessiveShortestPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedAgent {
    pub agent: String,
    pub category: String,
    /// Zero-based position of `category` in the player's preferences.
    pub rank: usize,
}

/// Result of one solve: assigned players in input order, plus the players
/// left without a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    assigned: Vec<AssignedAgent>,
    unassigned: Vec<String>,
}

impl Assignment {
    /// Read the role of every player off the flow on its outgoing edges.
    pub fn decode(solved: &SolvedNetwork) -> Self {
        let graph = solved.network().graph();
        let mut assignment = Self::default();

        for &node in solved.network().agent_nodes() {
            let agent = graph[node].label.clone();
            match solved.outflow_target(node) {
                Some((target, cost)) => assignment.assigned.push(AssignedAgent {
                    agent,
                    category: graph[target].label.clone(),
                    rank: cost as usize,
                }),
                None => assignment.unassigned.push(agent),
            }
        }

        assignment
    }

    pub fn get(&self, agent: &str) -> Option<&str> {
        self.assigned
            .iter()
            .find(|a| a.agent == agent)
            .map(|a| a.category.as_str())
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Sum of ranks over all assigned players.
    pub fn total_cost(&self) -> usize {
        self.assigned.iter().map(|a| a.rank).sum()
    }

    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    pub fn count_for(&self, category: &str) -> usize {
        self.assigned
            .iter()
            .filter(|a| a.category == category)
            .count()
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a AssignedAgent;
    type IntoIter = std::slice::Iter<'a, AssignedAgent>;

    fn into_iter(self) -> Self::IntoIter {
        self.assigned.iter()
    }
}

/// Builds, solves and decodes with a chosen solver.
#[derive(Debug, Clone, Default)]
pub struct Assigner<S = SuccessiveShortestPath> {
    solver: S,
}

impl Assigner<SuccessiveShortestPath> {
    pub fn with_search(search: PathSearch) -> Self {
        Self::new(SuccessiveShortestPath::new(search))
    }
}

impl<S: MinCostFlowSolver> Assigner<S> {
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    pub fn assign(
        &self,
        agents: &[Agent],
        categories: &[Category],
    ) -> Result<(Assignment, SolvedNetwork)> {
        let network = build_network(agents, categories)?;
        let solution = self.solver.solve(&network)?;
        let solved = network.into_solved(&solution.flows)?;
        let assignment = Assignment::decode(&solved);

        tracing::info!(
            assigned = assignment.len(),
            unassigned = assignment.unassigned().len(),
            cost = solved.total_cost(),
            "roles assigned"
        );

        Ok((assignment, solved))
    }
}

/// Assign `agents` to `categories` with the default solver.
pub fn compute_assignment(
    agents: &[Agent],
    categories: &[Category],
) -> Result<(Assignment, SolvedNetwork)> {
    Assigner::with_search(PathSearch::default()).assign(agents, categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoleFlowError;
    use crate::network::FlowNetwork;
    use crate::solver::FlowSolution;

    fn scenario() -> (Vec<Agent>, Vec<Category>) {
        let agents = vec![
            Agent::new("A", ["X", "Y"]),
            Agent::new("B", ["X"]),
            Agent::new("C", ["Y", "X"]),
        ];
        let categories = vec![Category::new("X", 1), Category::new("Y", 1)];
        (agents, categories)
    }

    #[test]
    fn test_scenario() {
        let (agents, categories) = scenario();
        let (assignment, solved) = compute_assignment(&agents, &categories).unwrap();

        assert_eq!(assignment.total_cost(), 0);
        assert_eq!(assignment.count_for("X"), 1);
        assert_eq!(assignment.count_for("Y"), 1);
        assert_eq!(assignment.get("A"), Some("X"));
        assert_eq!(assignment.get("C"), Some("Y"));
        assert_eq!(assignment.unassigned(), ["B".to_string()]);
        assert_eq!(solved.total_cost(), 0);
        assert_eq!(solved.flow_value(), 2);
    }

    #[test]
    fn test_ranks_come_from_preferences() {
        let agents = vec![Agent::new("A", ["X", "Y"]), Agent::new("B", ["X"])];
        let categories = vec![Category::new("X", 1), Category::new("Y", 1)];
        let (assignment, _) = compute_assignment(&agents, &categories).unwrap();

        for entry in &assignment {
            let agent = agents.iter().find(|a| a.id == entry.agent).unwrap();
            assert_eq!(agent.rank_of(&entry.category), Some(entry.rank));
        }
        assert_eq!(assignment.total_cost(), 1);
    }

    #[test]
    fn test_players_without_usable_preferences_stay_unassigned() {
        let agents = vec![
            Agent::new("A", Vec::<String>::new()),
            Agent::new("B", ["Bard"]),
            Agent::new("C", ["X"]),
        ];
        let categories = vec![Category::new("X", 3)];
        let (assignment, solved) = compute_assignment(&agents, &categories).unwrap();

        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.get("C"), Some("X"));
        assert_eq!(assignment.unassigned(), ["A".to_string(), "B".to_string()]);
        assert_eq!(solved.supply(), 1);
    }

    #[test]
    fn test_zero_capacity_everywhere_is_empty_not_error() {
        let (agents, _) = scenario();
        let categories = vec![Category::new("X", 0), Category::new("Y", 0)];
        let (assignment, _) = compute_assignment(&agents, &categories).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(assignment.unassigned().len(), 3);
    }

    #[test]
    fn test_unreachable_seat_is_infeasible_not_partial() {
        let agents = vec![
            Agent::new("A", ["X"]),
            Agent::new("B", ["X"]),
            Agent::new("C", ["X"]),
        ];
        let categories = vec![Category::new("X", 1), Category::new("Y", 1)];
        match compute_assignment(&agents, &categories) {
            Err(RoleFlowError::Infeasible { required, routed }) => {
                assert_eq!((required, routed), (2, 1));
            }
            other => panic!("unexpected result: {:?}", other.map(|(a, _)| a)),
        }
    }

    #[test]
    fn test_search_choice_does_not_change_cost() {
        let (agents, categories) = scenario();
        let (a, _) = Assigner::with_search(PathSearch::Dijkstra)
            .assign(&agents, &categories)
            .unwrap();
        let (b, _) = Assigner::with_search(PathSearch::BellmanFord)
            .assign(&agents, &categories)
            .unwrap();
        assert_eq!(a.total_cost(), b.total_cost());
    }

    #[test]
    fn test_config_errors_surface() {
        let agents = vec![Agent::new("A", ["X", "X"])];
        let categories = vec![Category::new("X", 1)];
        let err = compute_assignment(&agents, &categories).unwrap_err();
        assert!(matches!(err, RoleFlowError::DuplicatePreference { .. }));
    }

    struct BrokenSolver;

    impl MinCostFlowSolver for BrokenSolver {
        fn solve(&self, network: &FlowNetwork) -> Result<FlowSolution> {
            Ok(FlowSolution {
                flows: vec![1; network.edge_count()],
                value: network.supply(),
                cost: 0,
            })
        }
    }

    #[test]
    fn test_bad_solver_output_is_rejected() {
        let (agents, categories) = scenario();
        let err = Assigner::new(BrokenSolver)
            .assign(&agents, &categories)
            .unwrap_err();
        assert!(matches!(err, RoleFlowError::InvalidFlow { .. }));
    }
}
