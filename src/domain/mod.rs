pub mod collision;
pub mod hazard;
pub mod phase;
pub mod platform;
pub mod player;
