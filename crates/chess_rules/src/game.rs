use std::collections::{BTreeMap, BTreeSet};

use chess_core::{BoardState, Color, Coordinate, InvalidSquare, Piece};
use log::info;

use crate::apply::{apply_move, MoveOutcome};
use crate::error::MoveError;
use crate::movegen::legal_targets;

/// One game session. Square names are parsed here and nowhere else.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: BoardState,
    move_count: usize,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_board(board: BoardState) -> Self {
        Self {
            board,
            move_count: 0,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn reset(&mut self) {
        info!("resetting board after {} moves", self.move_count);
        *self = Self::new();
    }

    pub fn current_side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Names of the squares the piece on `square` may move to now.
    ///
    /// Empty when the square is empty or the piece is not the side to move.
    pub fn query_legal_targets(&self, square: &str) -> Result<BTreeSet<String>, InvalidSquare> {
        let at = Coordinate::from_name(square)?;
        Ok(self
            .targets_from(at)
            .into_iter()
            .map(Coordinate::to_name)
            .collect())
    }

    pub fn commit_move(&mut self, from: &str, to: &str) -> Result<MoveOutcome, MoveError> {
        let from = Coordinate::from_name(from)?;
        let to = Coordinate::from_name(to)?;
        let outcome = apply_move(&mut self.board, from, to)?;
        self.move_count += 1;
        Ok(outcome)
    }

    /// Every square name mapped to its content, for a full redraw.
    pub fn board_snapshot(&self) -> BTreeMap<String, Option<Piece>> {
        Coordinate::all()
            .map(|at| (at.to_name(), self.board.piece_at(at)))
            .collect()
    }

    /// All `(from, to)` pairs available to the side to move.
    pub fn legal_moves(&self) -> Vec<(Coordinate, Coordinate)> {
        Coordinate::all()
            .flat_map(|from| self.targets_from(from).into_iter().map(move |to| (from, to)))
            .collect()
    }

    fn targets_from(&self, at: Coordinate) -> BTreeSet<Coordinate> {
        match self.board.piece_at(at) {
            Some(piece) if piece.color == self.board.side_to_move() => {
                legal_targets(piece, at, &self.board)
            }
            _ => BTreeSet::new(),
        }
    }
}
