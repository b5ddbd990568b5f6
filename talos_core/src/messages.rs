// talos_core/src/messages.rs

use serde::{Deserialize, Serialize};

// =========================================================================
// == Request Payloads ==
// =========================================================================

/// The serialized start configuration carried inside a planning request.
///
/// Joint names and positions are parallel arrays, the way external planning
/// frontends typically transmit robot states. Conversion into a working
/// configuration happens at bind time and validates the two against the
/// planning group's layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StartStateMsg {
    pub joint_names: Vec<String>,
    pub positions: Vec<f64>,
}

impl StartStateMsg {
    /// Looks up the position of a single joint by name.
    pub fn position_of(&self, joint: &str) -> Option<f64> {
        self.joint_names
            .iter()
            .position(|n| n == joint)
            .and_then(|i| self.positions.get(i))
            .copied()
    }
}

/// One motion-planning request as seen by a cost term.
///
/// The optimizer receives the full request from its frontend; cost terms
/// only need the group being optimized and the declared start state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanRequest {
    pub group_name: String,
    pub start_state: StartStateMsg,
}

// =========================================================================
// == Completion Notification ==
// =========================================================================

/// Final report the optimizer hands to every cost term when a planning run
/// ends, successful or not.
#[derive(Clone, Copy, Debug)]
pub struct RunOutcome {
    pub success: bool,
    pub total_iterations: usize,
    pub final_cost: f64,
}
