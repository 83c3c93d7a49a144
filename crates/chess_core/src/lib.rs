// Core chess data model: squares, pieces and the board store
pub mod board;
pub mod coordinate;
pub mod piece;

// Re-export main types for convenience
pub use board::{BoardState, CastlingRights};
pub use coordinate::{Coordinate, InvalidSquare};
pub use piece::{Color, Piece, PieceType};
