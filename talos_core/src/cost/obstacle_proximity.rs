// talos_core/src/cost/obstacle_proximity.rs

use log::{debug, error};
use std::sync::Arc;

use crate::cost::{required_f64, CostOutput, CostTerm, CostTermConfig};
use crate::error::{CostTermError, Result};
use crate::messages::{PlanRequest, RunOutcome};
use crate::model::{PlanningModel, RobotState};
use crate::types::{CostVector, SceneHandle, Trajectory};

/// Maps a signed clearance distance to a normalized cost in `[0, 1]`.
///
/// Three regions: safely clear (`dist >= max_distance`) costs nothing, a
/// colliding configuration (`dist < 0`) costs the maximum, and in between
/// the cost ramps linearly from 1 at contact down toward 0 at
/// `max_distance`. `max_distance` must be positive; `configure` enforces
/// that before this is ever called.
#[inline]
pub fn proximity_cost(dist: f64, max_distance: f64) -> f64 {
    if dist >= max_distance {
        0.0
    } else if dist < 0.0 {
        1.0
    } else {
        (max_distance - dist) / max_distance
    }
}

/// Validated numeric parameters, stored only after both parse.
#[derive(Clone, Copy, Debug)]
struct Params {
    cost_weight: f64,
    max_distance: f64,
}

/// Per-request state: the scene the clearance queries are scoped to and the
/// working configuration reused across timesteps.
#[derive(Debug)]
struct BoundRequest {
    scene: SceneHandle,
    state: RobotState,
}

/// A cost term penalizing proximity to, or collision with, obstacles.
///
/// For every timestep of a rollout it projects the trajectory column into
/// its working configuration, asks the planning model for the signed
/// clearance, and maps that distance through [`proximity_cost`]. The
/// mapping is a pure potential-field sample per timestep: no smoothing, no
/// gradient, no early exit once a collision is seen. Averaging across noisy
/// rollouts is the optimizer's job.
#[derive(Debug, Default)]
pub struct ObstacleProximity {
    model: Option<Arc<dyn PlanningModel>>,
    group_name: String,
    params: Option<Params>,
    bound: Option<BoundRequest>,
}

impl ObstacleProximity {
    /// The kind string this term registers under in the factory.
    pub const KIND: &'static str = "obstacle_proximity";

    pub fn new() -> Self {
        Self::default()
    }

    fn parse_params(config: &CostTermConfig) -> Result<Params> {
        let cost_weight = required_f64(config, "cost_weight")?;
        let max_distance = required_f64(config, "max_distance")?;
        if max_distance <= 0.0 {
            // A non-positive max_distance makes the linear ramp degenerate
            // (division by zero at worst), so it is rejected up front.
            return Err(CostTermError::ParameterRange {
                key: "max_distance",
                value: max_distance,
            });
        }
        Ok(Params {
            cost_weight,
            max_distance,
        })
    }
}

impl CostTerm for ObstacleProximity {
    fn name(&self) -> &str {
        Self::KIND
    }

    fn initialize(
        &mut self,
        model: Arc<dyn PlanningModel>,
        group: &str,
        config: &CostTermConfig,
    ) -> Result<()> {
        if !model.has_distance_field(group) {
            error!(
                "{}: planning model has no distance field for group '{group}'",
                Self::KIND
            );
            return Err(CostTermError::MissingDistanceField(group.to_string()));
        }

        self.model = Some(model);
        self.group_name = group.to_string();
        self.configure(config)
    }

    fn configure(&mut self, config: &CostTermConfig) -> Result<()> {
        // Parse everything before storing anything, so a bad table leaves
        // the previous parameters in effect.
        let params = match Self::parse_params(config) {
            Ok(params) => params,
            Err(e) => {
                error!("{}: {e}", Self::KIND);
                return Err(e);
            }
        };
        self.params = Some(params);
        Ok(())
    }

    fn bind_request(&mut self, scene: SceneHandle, request: &PlanRequest) -> Result<()> {
        let model = self.model.as_ref().ok_or(CostTermError::NotInitialized)?;
        let joints = model.group_joints(&self.group_name).ok_or_else(|| {
            CostTermError::StartStateConversion(format!(
                "planning model has no group '{}'",
                self.group_name
            ))
        })?;

        let state = match RobotState::from_start_state(joints, &request.start_state) {
            Ok(state) => state,
            Err(e) => {
                error!("{}: {e}", Self::KIND);
                return Err(e);
            }
        };

        debug!(
            "{}: bound to scene {:?} with a {}-DoF start state",
            Self::KIND,
            scene,
            state.dof()
        );
        // Any previously bound request is discarded here.
        self.bound = Some(BoundRequest { scene, state });
        Ok(())
    }

    fn evaluate_costs(
        &mut self,
        trajectory: &Trajectory,
        start_timestep: usize,
        num_timesteps: usize,
    ) -> Result<CostOutput> {
        let model = self.model.as_ref().ok_or(CostTermError::NotInitialized)?;
        let params = self.params.ok_or(CostTermError::NotInitialized)?;
        let bound = self.bound.as_mut().ok_or(CostTermError::NotBound)?;

        let need = start_timestep + num_timesteps;
        if trajectory.ncols() < need {
            return Err(CostTermError::TrajectoryTooShort {
                have: trajectory.ncols(),
                need,
            });
        }

        let mut costs = CostVector::zeros(num_timesteps);
        for t in start_timestep..need {
            bound.state.set_positions(trajectory.column(t));
            let dist = model.clearance(&self.group_name, bound.scene, &bound.state);
            costs[t - start_timestep] = proximity_cost(dist, params.max_distance);
        }

        // A colliding timestep shows up as a cost of 1.0 but does not
        // invalidate the rollout; the optimizer weighs cost rather than
        // rejecting outright.
        Ok(CostOutput {
            costs,
            validity: true,
        })
    }

    fn weight(&self) -> f64 {
        self.params.map_or(1.0, |p| p.cost_weight)
    }

    fn complete(&mut self, outcome: &RunOutcome) {
        debug!(
            "{}: planning run finished (success: {}, iterations: {}, final cost: {:.4})",
            Self::KIND,
            outcome.success,
            outcome.total_iterations,
            outcome.final_cost
        );
        self.bound = None;
    }
}
