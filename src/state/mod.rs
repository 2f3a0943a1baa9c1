pub mod body;
pub mod bumper;
pub mod common;
pub mod floating_text;
pub mod game_state;
pub mod save;
pub mod spawner;
pub mod tuning;
pub mod upgrades;

pub use body::{Body, BodyUpdateResult};
pub use bumper::{ActiveBumper, Bumper, BumperField, BumperId, PlacementError};
pub use common::{AREA_H, AREA_W, Pos};
pub use floating_text::FloatingText;
pub use game_state::{GameState, Notice, TickEvent};
pub use save::{SaveData, SavedBumper};
pub use spawner::Spawner;
pub use tuning::Tuning;
pub use upgrades::Upgrades;
