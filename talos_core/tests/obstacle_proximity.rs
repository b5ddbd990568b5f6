// talos_core/tests/obstacle_proximity.rs
//
// Drives the obstacle-proximity cost term through the full lifecycle an
// optimizer would: build it from the factory, initialize it against a
// planning model, bind a request, evaluate rollouts, and complete the run.

use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::DMatrix;
use talos_core::prelude::*;

/// A stand-in planning model: a 2-DoF planar point robot in a world with a
/// single wall at x = 1.0. Clearance is the gap between the robot's x
/// position and the wall, negative once the robot is past it.
#[derive(Debug)]
struct WallWorld {
    joints: Vec<String>,
    wall_x: f64,
}

impl WallWorld {
    fn new() -> Self {
        Self {
            joints: vec!["base_x".into(), "base_y".into()],
            wall_x: 1.0,
        }
    }
}

impl PlanningModel for WallWorld {
    fn group_joints(&self, group: &str) -> Option<&[String]> {
        (group == "base").then_some(self.joints.as_slice())
    }

    fn has_distance_field(&self, group: &str) -> bool {
        group == "base"
    }

    fn clearance(&self, _group: &str, _scene: SceneHandle, state: &RobotState) -> f64 {
        self.wall_x - state.positions()[0]
    }
}

fn config() -> CostTermConfig {
    toml::from_str("cost_weight = 1.0\nmax_distance = 0.1").unwrap()
}

fn request() -> PlanRequest {
    PlanRequest {
        group_name: "base".into(),
        start_state: StartStateMsg {
            joint_names: vec!["base_x".into(), "base_y".into()],
            positions: vec![0.0, 0.0],
        },
    }
}

fn ready_term() -> Box<dyn CostTerm> {
    let mut term = build_cost_term("obstacle_proximity").expect("kind is registered");
    term.initialize(Arc::new(WallWorld::new()), "base", &config())
        .expect("model has a distance field");
    term.bind_request(SceneHandle(7), &request())
        .expect("start state matches the group");
    term
}

/// Rows are (base_x, base_y); the wall sits at x = 1.0.
fn trajectory_at(xs: &[f64]) -> Trajectory {
    let mut m = DMatrix::zeros(2, xs.len());
    for (t, &x) in xs.iter().enumerate() {
        m[(0, t)] = x;
    }
    m
}

#[test]
fn single_timestep_at_half_max_distance_costs_one_half() {
    let mut term = ready_term();

    // x = 0.95 leaves a 0.05 gap to the wall; max_distance is 0.1.
    let output = term
        .evaluate_costs(&trajectory_at(&[0.95]), 0, 1)
        .unwrap();

    assert_eq!(output.costs.len(), 1);
    assert_relative_eq!(output.costs[0], 0.5, epsilon = 1e-12);
    assert!(output.validity);
}

#[test]
fn collision_records_max_cost_but_keeps_rollout_valid() {
    let mut term = ready_term();

    // Timestep 2 is 0.01 past the wall (clearance -0.01).
    let output = term
        .evaluate_costs(&trajectory_at(&[0.5, 0.9, 1.01, 0.5]), 0, 4)
        .unwrap();

    assert_relative_eq!(output.costs[2], 1.0);
    // A collision never flips the validity flag: the optimizer weighs the
    // cost rather than rejecting the rollout. Pinned here on purpose.
    assert!(output.validity);
}

#[test]
fn far_timesteps_cost_nothing() {
    let mut term = ready_term();

    let output = term
        .evaluate_costs(&trajectory_at(&[0.0, 0.2, 0.5]), 0, 3)
        .unwrap();

    for t in 0..3 {
        assert_relative_eq!(output.costs[t], 0.0);
    }
}

#[test]
fn repeated_rollout_evaluations_reuse_one_bind() {
    let mut term = ready_term();
    let trajectory = trajectory_at(&[0.95, 1.01]);

    // One bind serves many rollouts across many iterations.
    for _ in 0..5 {
        let output = term.evaluate_costs(&trajectory, 0, 2).unwrap();
        assert_relative_eq!(output.costs[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(output.costs[1], 1.0);
    }
}

#[test]
fn complete_releases_the_bound_request() {
    let mut term = ready_term();
    term.complete(&RunOutcome {
        success: true,
        total_iterations: 40,
        final_cost: 0.12,
    });

    let err = term
        .evaluate_costs(&trajectory_at(&[0.5]), 0, 1)
        .unwrap_err();
    assert!(matches!(err, CostTermError::NotBound));

    // A fresh bind brings the term back into service.
    term.bind_request(SceneHandle(8), &request()).unwrap();
    let output = term.evaluate_costs(&trajectory_at(&[0.95]), 0, 1).unwrap();
    assert_relative_eq!(output.costs[0], 0.5, epsilon = 1e-12);
}

#[test]
fn evaluation_never_runs_on_an_unbound_term() {
    let mut term = build_cost_term("obstacle_proximity").unwrap();
    term.initialize(Arc::new(WallWorld::new()), "base", &config())
        .unwrap();

    let err = term
        .evaluate_costs(&trajectory_at(&[0.5]), 0, 1)
        .unwrap_err();
    assert!(matches!(err, CostTermError::NotBound));
}

#[test]
fn initialize_fails_without_a_distance_field() {
    #[derive(Debug)]
    struct NoField(WallWorld);

    impl PlanningModel for NoField {
        fn group_joints(&self, group: &str) -> Option<&[String]> {
            self.0.group_joints(group)
        }
        fn has_distance_field(&self, _group: &str) -> bool {
            false
        }
        fn clearance(&self, group: &str, scene: SceneHandle, state: &RobotState) -> f64 {
            self.0.clearance(group, scene, state)
        }
    }

    let mut term = build_cost_term("obstacle_proximity").unwrap();
    let err = term
        .initialize(Arc::new(NoField(WallWorld::new())), "base", &config())
        .unwrap_err();
    assert!(matches!(err, CostTermError::MissingDistanceField(_)));
}

#[test]
fn weight_is_stored_for_the_optimizer_not_applied_to_costs() {
    let mut term = build_cost_term("obstacle_proximity").unwrap();
    let config: CostTermConfig =
        toml::from_str("cost_weight = 4.0\nmax_distance = 0.1").unwrap();
    term.initialize(Arc::new(WallWorld::new()), "base", &config)
        .unwrap();
    term.bind_request(SceneHandle(7), &request()).unwrap();

    assert_relative_eq!(term.weight(), 4.0);

    // Costs stay normalized to [0, 1]; scaling is the optimizer's job.
    let output = term.evaluate_costs(&trajectory_at(&[0.95]), 0, 1).unwrap();
    assert_relative_eq!(output.costs[0], 0.5, epsilon = 1e-12);
}
