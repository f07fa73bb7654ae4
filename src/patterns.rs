//! Pattern library (named 5x5 targets) and the board scan that looks for them.

use crate::board::{Board, EMPTY};
use rand::Rng;

/// Side length of every target mask.
pub const PATTERN_SIZE: usize = 5;

/// Kind that renders as a block but counts as empty when matching.
pub const VOID_KIND: u8 = 8;

/// Named occupancy target: true = cell must hold a block, false = must be empty or void.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMask {
    name: &'static str,
    cells: [[bool; PATTERN_SIZE]; PATTERN_SIZE],
}

impl PatternMask {
    pub const fn new(name: &'static str, cells: [[bool; PATTERN_SIZE]; PATTERN_SIZE]) -> Self {
        Self { name, cells }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> &[[bool; PATTERN_SIZE]; PATTERN_SIZE] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Uniform pick over the catalog. Repeats of the previous target are allowed.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        CATALOG[rng.gen_range(0..CATALOG.len())]
    }
}

/// `#` = occupied.
const fn mask(rows: [&[u8; PATTERN_SIZE]; PATTERN_SIZE]) -> [[bool; PATTERN_SIZE]; PATTERN_SIZE] {
    let mut out = [[false; PATTERN_SIZE]; PATTERN_SIZE];
    let mut r = 0;
    while r < PATTERN_SIZE {
        let mut c = 0;
        while c < PATTERN_SIZE {
            out[r][c] = rows[r][c] == b'#';
            c += 1;
        }
        r += 1;
    }
    out
}

pub const CATALOG: [PatternMask; 9] = [
    PatternMask::new(
        "Kernel Panic",
        mask([b"#####", b"#####", b"#####", b"#####", b"#####"]),
    ),
    PatternMask::new(
        "Null Pointer",
        mask([b"#####", b"#...#", b"#...#", b"#...#", b"#####"]),
    ),
    PatternMask::new(
        "Stack Overflow",
        mask([b"#....", b"##...", b"###..", b"####.", b"#####"]),
    ),
    PatternMask::new(
        "Segfault",
        mask([b"#...#", b".#.#.", b"..#..", b".#.#.", b"#...#"]),
    ),
    PatternMask::new(
        "Off By One",
        mask([b"....#", b"....#", b"....#", b"....#", b"....#"]),
    ),
    PatternMask::new(
        "Infinite Loop",
        mask([b"#####", b"#...#", b"#####", b"#...#", b"#####"]),
    ),
    PatternMask::new(
        "Race Condition",
        mask([b"##.##", b"##.##", b"##.##", b"##.##", b"##.##"]),
    ),
    PatternMask::new(
        "Memory Leak",
        mask([b".....", b"..#..", b".###.", b"#####", b"#####"]),
    ),
    PatternMask::new(
        "Syntax Error",
        mask([b"..#..", b"..#..", b"#####", b"..#..", b"..#.."]),
    ),
];

/// Whether a cell value counts as a block for matching. Void blocks do not.
#[inline]
pub fn occupied(value: u8) -> bool {
    value != EMPTY && value != VOID_KIND
}

/// True if the 5x5 window with top-left (start_row, start_col) has exactly the mask's occupancy.
/// Windows that would leave the board never match.
pub fn matches_at(board: &Board, mask: &PatternMask, start_row: usize, start_col: usize) -> bool {
    for r in 0..PATTERN_SIZE {
        for c in 0..PATTERN_SIZE {
            let Some(value) = board.get(start_row + r, start_col + c) else {
                return false;
            };
            if occupied(value) != mask.cell(r, c) {
                return false;
            }
        }
    }
    true
}

/// First matching anchor in row-major order (top to bottom, then left to right).
/// Returns (start_row, start_col).
pub fn find_match(board: &Board, mask: &PatternMask) -> Option<(usize, usize)> {
    if board.height() < PATTERN_SIZE || board.width() < PATTERN_SIZE {
        return None;
    }
    let last_row = board.height() - PATTERN_SIZE;
    let last_col = board.width() - PATTERN_SIZE;
    (0..=last_row)
        .flat_map(|row| (0..=last_col).map(move |col| (row, col)))
        .find(|&(row, col)| matches_at(board, mask, row, col))
}
