// ═══════════════════════════════════════════════════════════════════════
// Human — plays back whatever the operator scripted
//
// Interactive input adapters live outside the engine; this carries their
// output. A seat with no remaining scripted rounds simply passes.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{RoundPlan, TerritoryId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanChoices {
    /// One plan per round, consumed front to back.
    pub plans: VecDeque<RoundPlan>,
    pub attack: Vec<TerritoryId>,
    pub defend: Vec<TerritoryId>,
}

pub fn plan(choices: &mut HumanChoices) -> RoundPlan {
    choices.plans.pop_front().unwrap_or_default()
}
