//! Headless salvo loop at the nominal frame time.

use tracing::{debug, info};

use trailburst_core::constants::FRAME_TIME;
use trailburst_core::types::TargetId;
use trailburst_sim::{SalvoEngine, SalvoSnapshot};

use crate::error::AppError;
use crate::scenario::Scenario;

/// Fire one salvo and tick until it has resolved or `max_ticks` is reached.
pub fn run_salvo(scenario: &Scenario) -> Result<SalvoSnapshot, AppError> {
    scenario.validate()?;
    let mut engine = SalvoEngine::new(scenario.salvo)?;
    for (i, position) in scenario.targets.iter().enumerate() {
        engine.set_target(TargetId(i as u32), *position);
    }

    let shots = engine.fire_salvo()?;
    info!(shots, targets = scenario.targets.len(), "salvo started");

    let mut snapshot = engine.snapshot();
    while engine.is_busy() && snapshot.tick < scenario.max_ticks {
        snapshot = engine.tick(FRAME_TIME)?;

        if scenario.mesh_interval > 0 && snapshot.tick % scenario.mesh_interval == 0 {
            let drawable = engine.rebuild_mesh()?;
            debug!(
                tick = snapshot.tick,
                in_flight = snapshot.projectiles.len(),
                drawable,
                "mesh rebuilt"
            );
        }
    }

    info!(
        ticks = snapshot.tick,
        hits = snapshot.hits,
        lost = snapshot.lost,
        in_flight = snapshot.projectiles.len(),
        "salvo finished"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_salvo_respects_tick_limit() {
        let scenario = Scenario {
            max_ticks: 5,
            ..Scenario::default()
        };
        let snapshot = run_salvo(&scenario).unwrap();
        assert_eq!(snapshot.tick, 5);
    }

    #[test]
    fn test_run_salvo_is_deterministic() {
        let scenario = Scenario {
            max_ticks: 90,
            ..Scenario::default()
        };
        let a = serde_json::to_string(&run_salvo(&scenario).unwrap()).unwrap();
        let b = serde_json::to_string(&run_salvo(&scenario).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_salvo_rejects_empty_targets() {
        let scenario = Scenario {
            targets: Vec::new(),
            ..Scenario::default()
        };
        assert!(matches!(run_salvo(&scenario), Err(AppError::NoTargets)));
    }
}
