use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const FILE_LETTERS: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square name: {0:?}")]
pub struct InvalidSquare(pub String);

/// A square on the board. Files run 0..=7 (a-h), ranks 1..=8.
///
/// Fields are private so an out-of-range square can never exist; every
/// constructor checks bounds first. Ordering is rank-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    rank: u8, // 1-8
    file: u8, // a-h (0-7)
}

impl Coordinate {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file <= 7 && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// The square `df` files and `dr` ranks away, if it is on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file as i16 + df as i16;
        let rank = self.rank as i16 + dr as i16;
        if !(0..=7).contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Some(Self {
            file: file as u8,
            rank: rank as u8,
        })
    }

    pub fn from_name(name: &str) -> Result<Self, InvalidSquare> {
        let invalid = || InvalidSquare(name.to_string());

        let mut chars = name.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(invalid()),
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(invalid());
        }

        Ok(Self {
            file: (file as u8) - b'a',
            rank: (rank as u8) - b'0',
        })
    }

    pub fn to_name(self) -> String {
        self.to_string()
    }

    /// All 64 squares, a1 first, rank by rank.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (1..=8u8).flat_map(|rank| (0..8u8).map(move |file| Coordinate { file, rank }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FILE_LETTERS[self.file as usize], self.rank)
    }
}

impl FromStr for Coordinate {
    type Err = InvalidSquare;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
