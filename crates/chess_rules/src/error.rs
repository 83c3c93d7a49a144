use chess_core::{Coordinate, InvalidSquare};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    InvalidSquare(#[from] InvalidSquare),

    #[error("{to} is not a legal destination for the piece on {from}")]
    IllegalMove { from: Coordinate, to: Coordinate },

    /// No piece on the square, or the piece belongs to the side not to move.
    #[error("no piece of the side to move on {0}")]
    EmptySelection(Coordinate),
}
