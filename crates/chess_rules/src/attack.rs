use chess_core::{BoardState, Color, Coordinate};
use log::trace;

use crate::movegen::raw_targets;

/// True if any piece of `by` could move onto `target` in raw mode.
///
/// This is a union over raw move sets rather than a dedicated attack map, so
/// a pawn only covers squares it could actually move to, and a square held by
/// one of `by`'s own pieces is never reported. Cost is one raw generation per
/// piece of `by`; callers inside raw generation must not use this.
pub fn is_square_attacked(board: &BoardState, target: Coordinate, by: Color) -> bool {
    let attacker = board
        .pieces()
        .filter(|(_, piece)| piece.color == by)
        .find(|&(at, piece)| raw_targets(piece, at, board).contains(&target));

    if let Some((at, piece)) = attacker {
        trace!("{} attacked by {:?} on {}", target, piece.piece_type, at);
        true
    } else {
        false
    }
}
