//! # role-flow-core
//!
//! Assigns players to roles from ranked preferences. Each role has a fixed
//! number of seats. The assignment seats `min(total seats, players with at
//! least one preference)` players at the lowest total rank, leaving the
//! surplus out. When preferences leave fewer seats reachable than that,
//! [`compute_assignment`] returns [`RoleFlowError::Infeasible`] rather than a
//! partial result.
//!
//! The problem is reduced to min-cost flow on a four-layer network
//! (source → players → roles → sink), solved with successive shortest
//! paths, and decoded back into a mapping.
//!
//! ```rust
//! use role_flow_core::{compute_assignment, Agent, Category};
//!
//! let agents = vec![
//!     Agent::new("A", ["X", "Y"]),
//!     Agent::new("B", ["X"]),
//!     Agent::new("C", ["Y", "X"]),
//! ];
//! let categories = vec![Category::new("X", 1), Category::new("Y", 1)];
//!
//! let (assignment, _network) = compute_assignment(&agents, &categories)?;
//! assert_eq!(assignment.total_cost(), 0);
//! assert_eq!(assignment.len(), 2);
//! # Ok::<(), role_flow_core::RoleFlowError>(())
//! ```

pub mod assignment;
pub mod config;
pub mod dot;
pub mod error;
pub mod model;
pub mod network;
pub mod roster;
pub mod solver;

pub use assignment::{compute_assignment, AssignedAgent, Assigner, Assignment};
pub use config::{Config, SolverConfig, CONFIG_FILE, DEFAULT_ROLES};
pub use dot::render_dot;
pub use error::{ErrorKind, Result, RoleFlowError};
pub use model::{Agent, Category};
pub use network::{build_network, EdgeView, FlowNetwork, NodeKind, NodeView, SolvedNetwork};
pub use roster::{load_agents, parse_agents};
pub use solver::{FlowSolution, MinCostFlowSolver, PathSearch, SuccessiveShortestPath};
