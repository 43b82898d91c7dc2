//! Stealth simulation core: player locomotion, NPC perception and patrol,
//! and the global suspicion meter, advanced one tick at a time.

pub mod config;
pub mod debug;
pub mod demo;
pub mod ecs;
pub mod frame;
pub mod input;
pub mod level;
pub mod npc;
pub mod player;
pub mod session;
pub mod sim;
pub mod spatial;
pub mod stealth;

pub use config::{ConfigError, SimConfig};
pub use frame::FrameResult;
pub use input::{InputCommand, KeyBindings};
pub use level::{Level, LevelError, LevelWarning};
pub use session::{GameState, Session};
pub use sim::Simulation;
