use std::fmt;

use log::trace;

use crate::{Color, Coordinate, Piece, PieceType};

/// Which castling pieces have left their home squares.
///
/// A flag is set once and never cleared; castling needs the king's flag and
/// the matching rook's flag to both be clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white_king_moved: bool,
    pub white_kingside_rook_moved: bool,
    pub white_queenside_rook_moved: bool,
    pub black_king_moved: bool,
    pub black_kingside_rook_moved: bool,
    pub black_queenside_rook_moved: bool,
}

impl CastlingRights {
    pub fn king_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    pub fn rook_moved(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside_rook_moved,
            (Color::White, false) => self.white_queenside_rook_moved,
            (Color::Black, true) => self.black_kingside_rook_moved,
            (Color::Black, false) => self.black_queenside_rook_moved,
        }
    }

    pub fn mark_king_moved(&mut self, color: Color) {
        match color {
            Color::White => self.white_king_moved = true,
            Color::Black => self.black_king_moved = true,
        }
    }

    pub fn mark_rook_moved(&mut self, color: Color, kingside: bool) {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside_rook_moved = true,
            (Color::White, false) => self.white_queenside_rook_moved = true,
            (Color::Black, true) => self.black_kingside_rook_moved = true,
            (Color::Black, false) => self.black_queenside_rook_moved = true,
        }
    }
}

/// The authoritative game state: an 8x8 grid of optional pieces plus turn,
/// castling and en passant bookkeeping.
///
/// This is a plain store. Nothing here checks whether a change is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    // Indexed [rank - 1][file].
    squares: [[Option<Piece>; 8]; 8],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Coordinate>,
}

impl BoardState {
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    /// A board with no pieces and White to move.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::default(),
            en_passant_target: None,
        }
    }

    fn setup_initial_position(&mut self) {
        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in piece_order.iter().enumerate() {
            self.squares[0][file] = Some(Piece::new(piece_type, Color::White));
            self.squares[1][file] = Some(Piece::new(PieceType::Pawn, Color::White));
            self.squares[6][file] = Some(Piece::new(PieceType::Pawn, Color::Black));
            self.squares[7][file] = Some(Piece::new(piece_type, Color::Black));
        }
    }

    pub fn piece_at(&self, at: Coordinate) -> Option<Piece> {
        self.squares[(at.rank() - 1) as usize][at.file() as usize]
    }

    pub fn set(&mut self, at: Coordinate, piece: Option<Piece>) {
        trace!("set {} to {:?}", at, piece);
        self.squares[(at.rank() - 1) as usize][at.file() as usize] = piece;
    }

    pub fn is_empty(&self, at: Coordinate) -> bool {
        self.piece_at(at).is_none()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn castling_rights_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Coordinate> {
        self.en_passant_target
    }

    pub fn set_en_passant_target(&mut self, target: Option<Coordinate>) {
        self.en_passant_target = target;
    }

    /// Every occupied square with its piece, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinate, Piece)> + '_ {
        Coordinate::all().filter_map(move |at| self.piece_at(at).map(|piece| (at, piece)))
    }

    pub fn king_square(&self, color: Color) -> Option<Coordinate> {
        self.pieces()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
            .map(|(at, _)| at)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=8u8).rev() {
            write!(f, "{rank} ")?;
            for file in 0..8u8 {
                let symbol = Coordinate::new(file, rank)
                    .and_then(|at| self.piece_at(at))
                    .map_or('.', Piece::symbol);
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
