// talos_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::cost::{CostTerm, CostTermConfig};
pub use crate::model::PlanningModel;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::cost::CostOutput;
pub use crate::error::{CostTermError, Result};
pub use crate::messages::{PlanRequest, RunOutcome, StartStateMsg};
pub use crate::model::RobotState;
pub use crate::types::{CostVector, SceneHandle, Trajectory};

// --- Concrete Cost Terms (Export common ones for convenience) ---
pub use crate::cost::{build_cost_term, ObstacleProximity};
