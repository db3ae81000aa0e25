use crate::battle::action::Action;
use crate::battle::rng::BattleRng;
use serde::{Deserialize, Serialize};

/// How speed ties and jitter are handled when ordering a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderMode {
    /// Priority desc, then speed plus a uniform [0, 255) jitter desc,
    /// then a fresh random tie-break.
    #[default]
    Standard,
    /// Priority desc, then pure speed desc, then a random tie-break.
    Legacy,
}

/// One action with its ordering inputs already resolved: the engine looks
/// up attack priorities and effective speeds before calling the sorter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderEntry {
    pub action: Action,
    pub priority: i8,
    pub speed: u16,
}

/// Sort a turn's actions into execution order. Jitter and tie-break values
/// are drawn per entry in submission order, so a fixed seed and action
/// sequence replays identically. While `distortion` is active the speed
/// comparison inside a priority group is inverted; priority itself is not.
pub fn resolve(
    entries: Vec<OrderEntry>,
    mode: OrderMode,
    distortion: bool,
    rng: &mut BattleRng,
) -> Vec<Action> {
    let mut keyed: Vec<(OrderEntry, i64, u32)> = entries
        .into_iter()
        .map(|entry| {
            let speed_key = match mode {
                OrderMode::Standard => entry.speed as i64 + rng.speed_jitter() as i64,
                OrderMode::Legacy => entry.speed as i64,
            };
            let speed_key = if distortion { -speed_key } else { speed_key };
            (entry, speed_key, rng.tiebreak())
        })
        .collect();

    keyed.sort_by(|(a, a_key, a_tie), (b, b_key, b_tie)| {
        b.priority
            .cmp(&a.priority)
            .then(b_key.cmp(a_key))
            .then(a_tie.cmp(b_tie))
    });

    keyed.into_iter().map(|(entry, _, _)| entry.action).collect()
}
