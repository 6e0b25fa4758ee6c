/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound; nothing here feeds
/// back into the simulation.

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    Jumped,
    AttackStarted,
    Footstep,
    Damaged,
    CheckpointActivated { id: u32 },
    Respawned,
    LevelComplete,
}
