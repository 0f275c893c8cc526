use crate::plan::Plan;
use serde_json::{json, Value};

/// The plan as a JSON object: `valid_moves`, `conflicts` and `has_conflicts`.
pub fn plan_json(plan: &Plan) -> Value {
    json!({
        "valid_moves": plan.valid_moves,
        "conflicts": plan.conflicts,
        "has_conflicts": plan.has_conflicts(),
    })
}
