// ═══════════════════════════════════════════════════════════════════════
// Neutral — sits still until someone hits it
//
// Issues nothing and attacks nobody. The engine reclassifies the seat as
// Aggressive the moment one of its territories is conquered.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::RoundPlan;

pub fn plan() -> RoundPlan {
    RoundPlan::default()
}
