use std::collections::BTreeSet;

use chess_core::{BoardState, Color, Coordinate, Piece, PieceType};

use crate::attack::is_square_attacked;

/// Whether king steps are filtered for safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// King steps onto squares the opponent attacks are dropped.
    Legal,
    /// No safety filtering. Used by attack detection, and never calls back
    /// into it, so an attack query is exactly one level deep.
    Raw,
}

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(crate) const KING_HOME_FILE: u8 = 4;

/// File layout of one castling direction on the home rank.
pub(crate) struct CastleSide {
    pub kingside: bool,
    pub rook_file: u8,
    pub king_to_file: u8,
    pub rook_to_file: u8,
    between: &'static [u8],
}

pub(crate) const CASTLE_SIDES: [CastleSide; 2] = [
    CastleSide {
        kingside: true,
        rook_file: 7,
        king_to_file: 6,
        rook_to_file: 5,
        between: &[5, 6],
    },
    CastleSide {
        kingside: false,
        rook_file: 0,
        king_to_file: 2,
        rook_to_file: 3,
        between: &[1, 2, 3],
    },
];

/// What a piece of `color` finds on a square it is trying to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Empty,
    Capture,
    Friendly,
}

fn probe(board: &BoardState, at: Coordinate, color: Color) -> Probe {
    match board.piece_at(at) {
        None => Probe::Empty,
        Some(piece) if piece.color != color => Probe::Capture,
        Some(_) => Probe::Friendly,
    }
}

/// Destination squares for `piece` standing on `at`.
///
/// The piece does not have to be on the board; its colour decides what
/// counts as a capture. Non-king pieces are never checked for exposing their
/// own king.
pub fn targets(
    piece: Piece,
    at: Coordinate,
    board: &BoardState,
    mode: GenerationMode,
) -> BTreeSet<Coordinate> {
    let mut out = BTreeSet::new();
    let color = piece.color;

    match piece.piece_type {
        PieceType::Pawn => pawn_targets(color, at, board, &mut out),
        PieceType::Knight => step_targets(color, at, board, &KNIGHT_JUMPS, &mut out),
        PieceType::Bishop => slide_targets(color, at, board, &DIAGONAL, &mut out),
        PieceType::Rook => slide_targets(color, at, board, &ORTHOGONAL, &mut out),
        PieceType::Queen => {
            slide_targets(color, at, board, &ORTHOGONAL, &mut out);
            slide_targets(color, at, board, &DIAGONAL, &mut out);
        }
        PieceType::King => {
            king_targets(color, at, board, mode, &mut out);
            castling_targets(color, at, board, &mut out);
        }
    }

    out
}

pub fn legal_targets(piece: Piece, at: Coordinate, board: &BoardState) -> BTreeSet<Coordinate> {
    targets(piece, at, board, GenerationMode::Legal)
}

pub fn raw_targets(piece: Piece, at: Coordinate, board: &BoardState) -> BTreeSet<Coordinate> {
    targets(piece, at, board, GenerationMode::Raw)
}

fn pawn_targets(color: Color, at: Coordinate, board: &BoardState, out: &mut BTreeSet<Coordinate>) {
    let direction = color.forward();
    let (start_rank, en_passant_rank) = match color {
        Color::White => (2, 5),
        Color::Black => (7, 4),
    };

    // Forward pushes never capture
    if let Some(one) = at.offset(0, direction).filter(|&sq| board.is_empty(sq)) {
        out.insert(one);
        if at.rank() == start_rank {
            if let Some(two) = at.offset(0, 2 * direction).filter(|&sq| board.is_empty(sq)) {
                out.insert(two);
            }
        }
    }

    for df in [-1, 1] {
        if let Some(diagonal) = at.offset(df, direction) {
            if probe(board, diagonal, color) == Probe::Capture {
                out.insert(diagonal);
            }
        }
    }

    if let Some(target) = board.en_passant_target() {
        let file_distance = (target.file() as i8 - at.file() as i8).abs();
        let one_ahead = target.rank() as i8 == at.rank() as i8 + direction;
        if at.rank() == en_passant_rank && file_distance == 1 && one_ahead && board.is_empty(target) {
            out.insert(target);
        }
    }
}

fn slide_targets(
    color: Color,
    at: Coordinate,
    board: &BoardState,
    directions: &[(i8, i8)],
    out: &mut BTreeSet<Coordinate>,
) {
    for &(df, dr) in directions {
        let mut current = at;
        while let Some(next) = current.offset(df, dr) {
            match probe(board, next, color) {
                Probe::Empty => {
                    out.insert(next);
                    current = next;
                }
                Probe::Capture => {
                    out.insert(next);
                    break;
                }
                Probe::Friendly => break,
            }
        }
    }
}

fn step_targets(
    color: Color,
    at: Coordinate,
    board: &BoardState,
    offsets: &[(i8, i8)],
    out: &mut BTreeSet<Coordinate>,
) {
    out.extend(
        offsets
            .iter()
            .filter_map(|&(df, dr)| at.offset(df, dr))
            .filter(|&sq| probe(board, sq, color) != Probe::Friendly),
    );
}

fn king_targets(
    color: Color,
    at: Coordinate,
    board: &BoardState,
    mode: GenerationMode,
    out: &mut BTreeSet<Coordinate>,
) {
    let mut steps = BTreeSet::new();
    step_targets(color, at, board, &KING_STEPS, &mut steps);

    match mode {
        GenerationMode::Raw => out.extend(steps),
        GenerationMode::Legal => {
            let opponent = color.opposite();
            out.extend(
                steps
                    .into_iter()
                    .filter(|&sq| !is_square_attacked(board, sq, opponent)),
            );
        }
    }
}

// Only occupancy of the path is checked, not whether the king crosses or
// lands on an attacked square.
fn castling_targets(color: Color, at: Coordinate, board: &BoardState, out: &mut BTreeSet<Coordinate>) {
    let rank = color.home_rank();
    let rights = board.castling_rights();

    if Some(at) != Coordinate::new(KING_HOME_FILE, rank) || rights.king_moved(color) {
        return;
    }

    let rook = Piece::new(PieceType::Rook, color);
    for side in &CASTLE_SIDES {
        if rights.rook_moved(color, side.kingside) {
            continue;
        }
        let rook_in_place = Coordinate::new(side.rook_file, rank)
            .is_some_and(|corner| board.piece_at(corner) == Some(rook));
        let path_clear = side
            .between
            .iter()
            .filter_map(|&file| Coordinate::new(file, rank))
            .all(|sq| board.is_empty(sq));

        if rook_in_place && path_clear {
            out.extend(Coordinate::new(side.king_to_file, rank));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Coordinate {
        Coordinate::from_name(name).unwrap()
    }

    fn board_with(pieces: &[(&str, Color, PieceType)]) -> BoardState {
        let mut board = BoardState::empty();
        for &(name, color, piece_type) in pieces {
            board.set(sq(name), Some(Piece::new(piece_type, color)));
        }
        board
    }

    fn names(set: &BTreeSet<Coordinate>) -> Vec<String> {
        let mut names: Vec<String> = set.iter().map(|c| c.to_name()).collect();
        names.sort();
        names
    }

    fn targets_of(board: &BoardState, name: &str) -> Vec<String> {
        let at = sq(name);
        let piece = board.piece_at(at).unwrap();
        names(&legal_targets(piece, at, board))
    }

    #[test]
    fn pawn_double_step_only_from_start_rank() {
        let board = BoardState::new();
        assert_eq!(targets_of(&board, "e2"), ["e3", "e4"]);
        assert_eq!(targets_of(&board, "d7"), ["d5", "d6"]);

        let board = board_with(&[("e3", Color::White, PieceType::Pawn)]);
        assert_eq!(targets_of(&board, "e3"), ["e4"]);
    }

    #[test]
    fn pawn_blocked_directly_has_no_push() {
        let board = board_with(&[
            ("e2", Color::White, PieceType::Pawn),
            ("e3", Color::Black, PieceType::Knight),
            ("a2", Color::White, PieceType::Pawn),
            ("a4", Color::Black, PieceType::Knight),
        ]);
        assert!(targets_of(&board, "e2").is_empty());
        assert_eq!(targets_of(&board, "a2"), ["a3"]);
    }

    #[test]
    fn pawn_captures_only_opposing_pieces_diagonally() {
        let board = board_with(&[
            ("d4", Color::White, PieceType::Pawn),
            ("c5", Color::Black, PieceType::Rook),
            ("e5", Color::White, PieceType::Rook),
        ]);
        assert_eq!(targets_of(&board, "d4"), ["c5", "d5"]);
    }

    #[test]
    fn en_passant_target_needs_matching_rank_and_adjacent_file() {
        let mut board = board_with(&[
            ("e5", Color::White, PieceType::Pawn),
            ("d5", Color::Black, PieceType::Pawn),
            ("b5", Color::White, PieceType::Pawn),
            ("d4", Color::White, PieceType::Pawn),
        ]);
        board.set_en_passant_target(Some(sq("d6")));
        assert_eq!(targets_of(&board, "e5"), ["d6", "e6"]);
        assert_eq!(targets_of(&board, "b5"), ["b6"]);
        assert_eq!(targets_of(&board, "d4"), Vec::<String>::new());
    }

    #[test]
    fn rays_stop_at_first_occupied_square() {
        let board = board_with(&[
            ("d4", Color::White, PieceType::Rook),
            ("d6", Color::Black, PieceType::Pawn),
            ("f4", Color::White, PieceType::Pawn),
        ]);
        assert_eq!(
            targets_of(&board, "d4"),
            ["a4", "b4", "c4", "d1", "d2", "d3", "d5", "d6", "e4"]
        );
    }

    #[test]
    fn bishop_and_queen_rays() {
        let board = board_with(&[
            ("a1", Color::White, PieceType::Bishop),
            ("c3", Color::Black, PieceType::Pawn),
        ]);
        assert_eq!(targets_of(&board, "a1"), ["b2", "c3"]);

        let board = board_with(&[("d4", Color::Black, PieceType::Queen)]);
        assert_eq!(targets_of(&board, "d4").len(), 27);
    }

    #[test]
    fn knight_skips_friendly_and_off_board_squares() {
        let board = board_with(&[
            ("a1", Color::White, PieceType::Knight),
            ("b3", Color::White, PieceType::Pawn),
            ("c2", Color::Black, PieceType::Pawn),
        ]);
        assert_eq!(targets_of(&board, "a1"), ["c2"]);

        let board = BoardState::new();
        assert_eq!(targets_of(&board, "g1"), ["f3", "h3"]);
    }

    #[test]
    fn king_avoids_attacked_squares() {
        let board = board_with(&[
            ("e1", Color::White, PieceType::King),
            ("a2", Color::Black, PieceType::Rook),
        ]);
        assert_eq!(targets_of(&board, "e1"), ["d1", "f1"]);

        let king = Piece::new(PieceType::King, Color::White);
        assert_eq!(
            names(&raw_targets(king, sq("e1"), &board)),
            ["d1", "d2", "e2", "f1", "f2"]
        );
    }

    #[test]
    fn pawn_only_guards_squares_it_could_move_to() {
        let board = board_with(&[
            ("e1", Color::White, PieceType::King),
            ("e3", Color::Black, PieceType::Pawn),
        ]);
        assert_eq!(targets_of(&board, "e1"), ["d1", "d2", "f1", "f2"]);
    }

    #[test]
    fn defended_piece_is_not_seen_as_attacked() {
        let board = board_with(&[
            ("e1", Color::White, PieceType::King),
            ("e2", Color::Black, PieceType::Rook),
            ("e8", Color::Black, PieceType::Rook),
        ]);
        assert_eq!(targets_of(&board, "e1"), ["d1", "e2", "f1"]);
    }

    #[test]
    fn non_king_pieces_may_expose_their_king() {
        let board = board_with(&[
            ("e1", Color::White, PieceType::King),
            ("e2", Color::White, PieceType::Bishop),
            ("e8", Color::Black, PieceType::Rook),
        ]);
        let bishop_moves = targets_of(&board, "e2");
        assert!(bishop_moves.contains(&"d3".to_string()));
        assert!(bishop_moves.contains(&"a6".to_string()));
    }

    #[test]
    fn castling_needs_clear_path_and_unmoved_pieces() {
        let mut board = BoardState::new();
        for name in ["b1", "c1", "d1", "f1", "g1"] {
            board.set(sq(name), None);
        }
        assert_eq!(targets_of(&board, "e1"), ["c1", "d1", "f1", "g1"]);

        board.castling_rights_mut().mark_rook_moved(Color::White, true);
        assert_eq!(targets_of(&board, "e1"), ["c1", "d1", "f1"]);

        board.set(sq("b1"), Some(Piece::new(PieceType::Knight, Color::White)));
        assert_eq!(targets_of(&board, "e1"), ["d1", "f1"]);

        board.castling_rights_mut().mark_king_moved(Color::White);
        board.set(sq("b1"), None);
        assert_eq!(targets_of(&board, "e1"), ["d1", "f1"]);
    }

    #[test]
    fn castling_ignores_attacked_path() {
        let board = board_with(&[
            ("e8", Color::Black, PieceType::King),
            ("h8", Color::Black, PieceType::Rook),
            ("f1", Color::White, PieceType::Rook),
        ]);
        let moves = targets_of(&board, "e8");
        assert!(moves.contains(&"g8".to_string()));
        assert!(!moves.contains(&"f8".to_string()));
        assert!(!moves.contains(&"f7".to_string()));
    }

    #[test]
    fn castling_needs_rook_on_its_corner() {
        let board = board_with(&[
            ("e1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
        ]);
        let moves = targets_of(&board, "e1");
        assert!(moves.contains(&"c1".to_string()));
        assert!(!moves.contains(&"g1".to_string()));
    }
}
