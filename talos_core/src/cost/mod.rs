// talos_core/src/cost/mod.rs

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{CostTermError, Result};
use crate::messages::{PlanRequest, RunOutcome};
use crate::model::PlanningModel;
use crate::types::{CostVector, SceneHandle, Trajectory};

/// Raw configuration for one cost term: an already-parsed TOML table.
///
/// Reading and parsing the configuration file belongs to the host; cost
/// terms only validate and extract the keys they care about. Unknown keys
/// are ignored so several terms can share one table.
pub type CostTermConfig = toml::value::Table;

/// The per-call product of one cost term: one cost per requested timestep
/// plus an overall validity verdict for the rollout.
#[derive(Clone, Debug)]
pub struct CostOutput {
    pub costs: CostVector,
    pub validity: bool,
}

// --- The CostTerm Trait ("Contract") ---
/// The contract for any pluggable contributor to the total trajectory cost.
///
/// The optimizer holds a `Vec<Box<dyn CostTerm>>`, drives each one through
/// the same lifecycle (`initialize` once per planning group, `bind_request`
/// once per planning request, `evaluate_costs` once per rollout per
/// iteration, `complete` when the run ends), and combines the weighted
/// outputs. A term is synchronous and single-threaded; parallel rollout
/// evaluation requires one instance per worker.
pub trait CostTerm: Debug + Send + Sync {
    /// A stable, human-readable identifier used in logs and error reports.
    fn name(&self) -> &str;

    /// One-time setup for a planning group. Verifies the model exposes the
    /// capabilities this term needs, then applies the configuration.
    fn initialize(
        &mut self,
        model: Arc<dyn PlanningModel>,
        group: &str,
        config: &CostTermConfig,
    ) -> Result<()>;

    /// Validates and applies numeric parameters. May be called again later
    /// to re-tune a term; on failure the previous parameters stay in effect.
    fn configure(&mut self, config: &CostTermConfig) -> Result<()>;

    /// Binds the term to one planning request, building whatever per-request
    /// state it needs from the declared start configuration. Repeatable;
    /// each call discards the previous request's state.
    fn bind_request(&mut self, scene: SceneHandle, request: &PlanRequest) -> Result<()>;

    /// Evaluates one rollout over the timestep window
    /// `[start_timestep, start_timestep + num_timesteps)`.
    /// The trajectory is never mutated and never retained.
    fn evaluate_costs(
        &mut self,
        trajectory: &Trajectory,
        start_timestep: usize,
        num_timesteps: usize,
    ) -> Result<CostOutput>;

    /// The scaling factor the optimizer applies to this term's costs when
    /// combining terms. Not applied inside the term itself.
    fn weight(&self) -> f64 {
        1.0
    }

    /// Notification that the planning run is over. Releases per-request
    /// state, returning the term to its configured-but-unbound state.
    /// Never fails.
    fn complete(&mut self, outcome: &RunOutcome);
}

/// The "factory" logic to build a cost term from its configured kind string.
///
/// Returns `None` for kinds this library does not provide, letting the host
/// fall through to its own terms.
pub fn build_cost_term(kind: &str) -> Option<Box<dyn CostTerm>> {
    match kind {
        ObstacleProximity::KIND => Some(Box::new(ObstacleProximity::new())),
        _ => None,
    }
}

/// Extracts a required numeric parameter from a config table.
/// Integer values are accepted where a float is expected.
pub(crate) fn required_f64(config: &CostTermConfig, key: &'static str) -> Result<f64> {
    match config.get(key) {
        None => Err(CostTermError::MissingParameter(key)),
        Some(toml::Value::Float(f)) => Ok(*f),
        Some(toml::Value::Integer(i)) => Ok(*i as f64),
        Some(_) => Err(CostTermError::ParameterType(key)),
    }
}

mod obstacle_proximity;
pub use obstacle_proximity::{proximity_cost, ObstacleProximity};

#[cfg(test)]
mod tests {
    use super::*;

    fn table(toml: &str) -> CostTermConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn factory_builds_the_obstacle_proximity_term() {
        let term = build_cost_term("obstacle_proximity").unwrap();
        assert_eq!(term.name(), "obstacle_proximity");
    }

    #[test]
    fn factory_rejects_unknown_kinds() {
        assert!(build_cost_term("path_smoothness").is_none());
    }

    #[test]
    fn required_f64_accepts_floats_and_integers() {
        let config = table("a = 0.25\nb = 3");
        assert_eq!(required_f64(&config, "a").unwrap(), 0.25);
        assert_eq!(required_f64(&config, "b").unwrap(), 3.0);
    }

    #[test]
    fn required_f64_distinguishes_missing_from_mistyped() {
        let config = table("a = \"fast\"");
        assert!(matches!(
            required_f64(&config, "a"),
            Err(CostTermError::ParameterType("a"))
        ));
        assert!(matches!(
            required_f64(&config, "z"),
            Err(CostTermError::MissingParameter("z"))
        ));
    }
}
