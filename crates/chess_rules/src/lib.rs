pub mod apply;
pub mod attack;
pub mod error;
pub mod game;
pub mod movegen;

pub use apply::{apply_move, Capture, MoveOutcome};
pub use attack::is_square_attacked;
pub use error::MoveError;
pub use game::Game;
pub use movegen::{legal_targets, raw_targets, targets, GenerationMode};
