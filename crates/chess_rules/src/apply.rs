use chess_core::{BoardState, Color, Coordinate, Piece, PieceType};
use log::debug;

use crate::error::MoveError;
use crate::movegen::{legal_targets, CASTLE_SIDES, KING_HOME_FILE};

/// A piece removed from the board by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub square: Coordinate,
    pub piece: Piece,
}

/// Everything one committed move changed, for callers that redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub piece: Piece,
    pub from: Coordinate,
    pub to: Coordinate,
    pub capture: Option<Capture>,
    /// Set when the capture was en passant (the captured pawn was not on `to`).
    pub en_passant: bool,
    /// Rook origin and destination when the move castled.
    pub rook_relocation: Option<(Coordinate, Coordinate)>,
    /// Squares whose pawn was turned into a queen after the move.
    pub promotions: Vec<Coordinate>,
    pub castling_rights_changed: bool,
}

/// Commits `from -> to` for the side to move.
///
/// The move is checked against the piece's legal targets first; a rejected
/// move leaves `board` untouched.
pub fn apply_move(
    board: &mut BoardState,
    from: Coordinate,
    to: Coordinate,
) -> Result<MoveOutcome, MoveError> {
    let piece = match board.piece_at(from) {
        Some(piece) if piece.color == board.side_to_move() => piece,
        _ => {
            debug!("rejected {}{}: nothing to move on {}", from, to, from);
            return Err(MoveError::EmptySelection(from));
        }
    };

    if !legal_targets(piece, from, board).contains(&to) {
        debug!("rejected {}{}: illegal for {:?}", from, to, piece.piece_type);
        return Err(MoveError::IllegalMove { from, to });
    }

    let occupant = board.piece_at(to);
    let rights_before = board.castling_rights();

    let rook_relocation = handle_castling(board, piece, from, to);
    let en_passant_capture = handle_en_passant(board, piece, from, to, occupant.is_none());

    board.set_side_to_move(piece.color.opposite());
    board.set(to, Some(piece));
    board.set(from, None);

    let promotions = promote_any_pawns(board);

    let capture = match (occupant, en_passant_capture) {
        (Some(captured), _) => Some(Capture {
            square: to,
            piece: captured,
        }),
        (None, capture) => capture,
    };

    let outcome = MoveOutcome {
        piece,
        from,
        to,
        capture,
        en_passant: en_passant_capture.is_some(),
        rook_relocation,
        promotions,
        castling_rights_changed: board.castling_rights() != rights_before,
    };
    debug!(
        "{:?} {:?} {}{}{}",
        piece.color,
        piece.piece_type,
        from,
        to,
        if outcome.capture.is_some() { " (capture)" } else { "" }
    );

    Ok(outcome)
}

/// Updates moved flags and, for a two-file king move, relocates the rook.
fn handle_castling(
    board: &mut BoardState,
    piece: Piece,
    from: Coordinate,
    to: Coordinate,
) -> Option<(Coordinate, Coordinate)> {
    let color = piece.color;
    let rank = color.home_rank();

    match piece.piece_type {
        PieceType::King => {
            board.castling_rights_mut().mark_king_moved(color);

            let castles = Some(from) == Coordinate::new(KING_HOME_FILE, rank)
                && (to.file() as i8 - from.file() as i8).abs() == 2;
            if !castles {
                return None;
            }

            let side = CASTLE_SIDES.iter().find(|side| side.king_to_file == to.file())?;
            let rook_from = Coordinate::new(side.rook_file, rank)?;
            let rook_to = Coordinate::new(side.rook_to_file, rank)?;

            let rook = board.piece_at(rook_from);
            board.set(rook_from, None);
            board.set(rook_to, rook);
            board.castling_rights_mut().mark_rook_moved(color, side.kingside);
            debug!("castled: rook {} -> {}", rook_from, rook_to);

            Some((rook_from, rook_to))
        }
        PieceType::Rook => {
            let corner = CASTLE_SIDES
                .iter()
                .find(|side| Coordinate::new(side.rook_file, rank) == Some(from));
            if let Some(side) = corner {
                board.castling_rights_mut().mark_rook_moved(color, side.kingside);
            }
            None
        }
        _ => None,
    }
}

/// Removes a pawn taken en passant and records a new double-step target.
///
/// A pawn that changes file onto an empty square can only be capturing en
/// passant; the victim sits beside the origin, on the destination file.
fn handle_en_passant(
    board: &mut BoardState,
    piece: Piece,
    from: Coordinate,
    to: Coordinate,
    destination_was_empty: bool,
) -> Option<Capture> {
    if piece.piece_type != PieceType::Pawn {
        board.set_en_passant_target(None);
        return None;
    }

    let mut capture = None;
    if destination_was_empty && to.file() != from.file() {
        if let Some(victim_square) = Coordinate::new(to.file(), from.rank()) {
            if let Some(victim) = board.piece_at(victim_square) {
                board.set(victim_square, None);
                debug!("en passant: removed pawn on {}", victim_square);
                capture = Some(Capture {
                    square: victim_square,
                    piece: victim,
                });
            }
        }
    }

    let rank_delta = to.rank() as i8 - from.rank() as i8;
    let skipped = if rank_delta.abs() == 2 {
        from.offset(0, rank_delta / 2)
    } else {
        None
    };
    board.set_en_passant_target(skipped);

    capture
}

/// Turns every pawn standing on its far rank into a queen.
///
/// Both terminal ranks are scanned after every move, not only the square the
/// last move landed on.
fn promote_any_pawns(board: &mut BoardState) -> Vec<Coordinate> {
    let mut promoted = Vec::new();

    for (color, rank) in [(Color::White, 8), (Color::Black, 1)] {
        let pawn = Piece::new(PieceType::Pawn, color);
        for file in 0..8 {
            let Some(at) = Coordinate::new(file, rank) else {
                continue;
            };
            if board.piece_at(at) == Some(pawn) {
                board.set(at, Some(Piece::new(PieceType::Queen, color)));
                debug!("promoted {:?} pawn on {}", color, at);
                promoted.push(at);
            }
        }
    }

    promoted
}
