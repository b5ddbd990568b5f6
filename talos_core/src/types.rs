// talos_core/src/types.rs

use nalgebra::{DMatrix, DVector};

// --- Core Type Aliases ---
/// A candidate trajectory: rows are the degrees of freedom of the planning
/// group, columns are timesteps. The optimizer owns it; cost terms only
/// borrow it for the duration of one evaluation call.
pub type Trajectory = DMatrix<f64>;

/// One scalar cost per evaluated timestep.
pub type CostVector = DVector<f64>;

// --- Core Identifier ---
/// A cheap, copyable identifier for a planning scene.
///
/// The scene itself (world geometry, distance field) lives inside the
/// `PlanningModel`; cost terms only carry this handle and pass it back on
/// every clearance query. On a real robot this might be a revision counter
/// of the world model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneHandle(pub u64);
