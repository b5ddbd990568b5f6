// talos_core/src/model.rs

use nalgebra::{DVector, DVectorView};
use std::fmt::Debug;

use crate::error::{CostTermError, Result};
use crate::messages::StartStateMsg;
use crate::types::SceneHandle;

// --- PLANNING MODEL TRAIT ---
// The evaluator's window onto the robot and its environment. `z = clearance(q)`
/// The contract between cost terms and the robot/environment model.
///
/// The model owns the kinematic description of the robot and whatever
/// collision machinery backs the clearance query (typically a precomputed
/// distance field per planning group). Cost terms hold a shared, read-only
/// handle to it for the lifetime of one planning session and must never
/// mutate it. Implementations should be `Send + Sync` so the optimizer can
/// hand one model to an evaluator instance per worker thread.
pub trait PlanningModel: Debug + Send + Sync {
    /// Returns the ordered joint names of a planning group, or `None` if the
    /// group is unknown. The order defines the row layout of every
    /// trajectory evaluated for that group.
    fn group_joints(&self, group: &str) -> Option<&[String]>;

    /// Reports whether a distance field has been built for the group.
    /// Obstacle-proximity terms refuse to initialize without one.
    fn has_distance_field(&self, group: &str) -> bool;

    /// Signed clearance between the given configuration and the nearest
    /// obstacle in the scene, in meters. Negative values mean the
    /// configuration is in penetration.
    ///
    /// The query is scoped to one planning group and one scene; the model is
    /// responsible for any derived state (forward kinematics, padding) it
    /// needs to answer.
    fn clearance(&self, group: &str, scene: SceneHandle, state: &RobotState) -> f64;
}

// --- WORKING CONFIGURATION ---
/// The mutable robot configuration a cost term reuses across timesteps.
///
/// One instance is created per bound planning request and overwritten in
/// place once per timestep during evaluation, so the per-rollout loop does
/// no allocation. It is owned exclusively by its evaluator and must not be
/// shared across concurrent planning requests.
#[derive(Clone, Debug)]
pub struct RobotState {
    positions: DVector<f64>,
}

impl RobotState {
    /// Builds a working configuration from a request's start state.
    ///
    /// Every joint of the planning group must appear in the message; a
    /// missing joint makes the whole conversion fail rather than default to
    /// zero, since a silently wrong seed state would corrupt every clearance
    /// query afterwards.
    pub fn from_start_state(group_joints: &[String], msg: &StartStateMsg) -> Result<Self> {
        let mut positions = DVector::zeros(group_joints.len());
        for (i, joint) in group_joints.iter().enumerate() {
            let value = msg.position_of(joint).ok_or_else(|| {
                CostTermError::StartStateConversion(format!(
                    "joint '{joint}' has no position in the request start state"
                ))
            })?;
            positions[i] = value;
        }
        Ok(Self { positions })
    }

    /// Number of degrees of freedom in this configuration.
    pub fn dof(&self) -> usize {
        self.positions.len()
    }

    /// Current joint positions, in the group's row order.
    pub fn positions(&self) -> &DVector<f64> {
        &self.positions
    }

    /// Overwrites the configuration with one trajectory column.
    ///
    /// # Panics
    /// Panics in debug builds if the column length does not match the
    /// group's degrees of freedom.
    #[inline]
    pub fn set_positions(&mut self, column: DVectorView<f64>) {
        debug_assert_eq!(
            column.len(),
            self.positions.len(),
            "trajectory column length must match the group's DoF"
        );
        self.positions.copy_from(&column);
    }
}
