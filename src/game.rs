//! Game state: board, falling piece, target pattern, score, pause and game over.

use crate::GameConfig;
use crate::board::{Board, COLS, ROWS, collides};
use crate::patterns::{self, PatternMask};
use crate::scheduler::DropTimer;
use crate::shapes::{Shape, ShapeKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Points for clearing the board with a pattern match.
pub const MATCH_AWARD: u32 = 100;

/// Player commands. Anything that cannot be applied is silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
}

/// What a renderer needs to know about the session right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    Paused,
    GameOver,
}

/// The falling shape and the board position of its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Centred horizontally on the top row.
    pub fn spawn(shape: Shape, board_width: usize) -> Self {
        let x = (board_width / 2) as i32 - (shape.width() / 2) as i32;
        Self { shape, x, y: 0 }
    }

    /// (row, col, kind) of every filled cell in board coordinates; rows may be negative.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.shape
            .filled_cells()
            .map(|(r, c, k)| (self.y + r as i32, self.x + c as i32, k))
    }
}

/// One game session. Owns everything it mutates; build a new one to restart.
#[derive(Debug)]
pub struct GameState {
    board: Board,
    piece: Piece,
    target: PatternMask,
    score: u32,
    matches: u32,
    game_over: bool,
    paused: bool,
    drop_timer: DropTimer,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let target = PatternMask::random(&mut rng);
        log::debug!("initial target: {}", target.name());
        let board = Board::new(COLS, ROWS);
        let piece = Piece::spawn(ShapeKind::random(&mut rng).shape(), board.width());
        let mut state = Self {
            board,
            piece,
            target,
            score: 0,
            matches: 0,
            game_over: false,
            paused: false,
            drop_timer: DropTimer::new(config.drop_interval_ms),
            rng,
        };
        state.check_spawn();
        state
    }

    // --- queries ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<u8> {
        self.board.get(row, col)
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Falling-piece cells that are on the board. Cells above row 0 are not reported.
    pub fn active_piece_cells(&self) -> Vec<(usize, usize, u8)> {
        self.piece
            .cells()
            .filter(|&(r, c, _)| r >= 0 && c >= 0)
            .map(|(r, c, k)| (r as usize, c as usize, k))
            .collect()
    }

    pub fn active_target(&self) -> &PatternMask {
        &self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of pattern matches this session.
    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Falling
        }
    }

    // --- drivers ---

    /// Applies one player command. Game over swallows everything; pause swallows all but
    /// the pause toggle.
    pub fn apply(&mut self, command: Command) {
        if self.game_over {
            return;
        }
        if command == Command::TogglePause {
            self.paused = !self.paused;
            log::debug!("paused: {}", self.paused);
            return;
        }
        if self.paused {
            return;
        }
        match command {
            Command::MoveLeft => self.shift(-1),
            Command::MoveRight => self.shift(1),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::TogglePause => {}
        }
    }

    /// Feeds elapsed time to the gravity timer. Paused or finished sessions accumulate nothing.
    pub fn advance(&mut self, delta_ms: u64) {
        if self.game_over || self.paused {
            return;
        }
        if self.drop_timer.tick(delta_ms) {
            self.soft_drop();
        }
    }

    // --- motion ---

    fn fits(&self, shape: &Shape, x: i32, y: i32) -> bool {
        !collides(shape, x, y, &self.board)
    }

    fn shift(&mut self, dx: i32) {
        let x = self.piece.x + dx;
        if self.fits(&self.piece.shape, x, self.piece.y) {
            self.piece.x = x;
        }
    }

    /// No wall kicks: a rotation that would collide is dropped.
    fn rotate(&mut self) {
        let rotated = self.piece.shape.rotated();
        if self.fits(&rotated, self.piece.x, self.piece.y) {
            self.piece.shape = rotated;
        }
    }

    /// One row down, or lock when blocked.
    fn soft_drop(&mut self) {
        let y = self.piece.y + 1;
        if self.fits(&self.piece.shape, self.piece.x, y) {
            self.piece.y = y;
        } else {
            self.settle();
        }
    }

    fn hard_drop(&mut self) {
        while self.fits(&self.piece.shape, self.piece.x, self.piece.y + 1) {
            self.piece.y += 1;
        }
        self.settle();
    }

    /// Lock, look for the target, bring in the next piece.
    fn settle(&mut self) {
        self.lock_piece();
        self.check_pattern_match();
        self.spawn_next();
    }

    // --- lock / match / spawn ---

    /// Writes the piece into the board. Cells still above row 0 are discarded.
    fn lock_piece(&mut self) {
        log::debug!("lock at ({}, {})", self.piece.x, self.piece.y);
        for (r, c, kind) in self.piece.cells().filter(|&(r, _, _)| r >= 0) {
            let Ok(col) = usize::try_from(c) else {
                log::error!("lock: column {c} is off the board");
                continue;
            };
            if let Err(e) = self.board.set(r as usize, col, kind) {
                log::error!("lock: {e}");
            }
        }
    }

    /// First window matching the target clears the whole board and picks a new target.
    fn check_pattern_match(&mut self) {
        let Some((row, col)) = patterns::find_match(&self.board, &self.target) else {
            return;
        };
        self.board.clear_all();
        self.score = self.score.saturating_add(MATCH_AWARD);
        self.matches += 1;
        log::info!(
            "matched {} at ({row}, {col}); score {}",
            self.target.name(),
            self.score
        );
        self.target = PatternMask::random(&mut self.rng);
        log::debug!("new target: {}", self.target.name());
    }

    fn spawn_next(&mut self) {
        let kind = ShapeKind::random(&mut self.rng);
        self.spawn_shape(kind.shape());
    }

    fn spawn_shape(&mut self, shape: Shape) {
        self.piece = Piece::spawn(shape, self.board.width());
        self.check_spawn();
    }

    fn check_spawn(&mut self) {
        if !self.fits(&self.piece.shape, self.piece.x, self.piece.y) {
            self.game_over = true;
            log::info!("game over; final score {}", self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{CATALOG, VOID_KIND};

    fn seeded(seed: u64) -> GameState {
        GameState::new(&GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        })
    }

    /// Fresh session with a chosen piece on an empty board.
    fn with_shape(kind: ShapeKind) -> GameState {
        let mut g = seeded(1);
        g.spawn_shape(kind.shape());
        g
    }

    fn filled_count(board: &Board) -> usize {
        (0..board.height())
            .flat_map(|r| (0..board.width()).map(move |c| (r, c)))
            .filter(|&(r, c)| board.get(r, c) != Some(0))
            .count()
    }

    #[test]
    fn test_new_session() {
        let g = seeded(3);
        assert_eq!(g.score(), 0);
        assert_eq!(g.phase(), Phase::Falling);
        assert!(g.board().is_empty());
        assert_eq!(g.piece().y, 0);
        assert!(CATALOG.contains(g.active_target()));
        assert!(!g.active_piece_cells().is_empty());
    }

    #[test]
    fn test_spawn_is_centred() {
        assert_eq!(with_shape(ShapeKind::Single).piece().x, 5);
        assert_eq!(with_shape(ShapeKind::HorizontalPair).piece().x, 4);
        assert_eq!(with_shape(ShapeKind::HorizontalLine).piece().x, 4);
    }

    #[test]
    fn test_move_left_blocked_by_wall() {
        let mut g = with_shape(ShapeKind::Square);
        for _ in 0..10 {
            g.apply(Command::MoveLeft);
        }
        assert_eq!(g.piece().x, 0);
        g.apply(Command::MoveLeft);
        assert_eq!((g.piece().x, g.piece().y), (0, 0));
    }

    #[test]
    fn test_move_right_blocked_by_wall_and_blocks() {
        let mut g = with_shape(ShapeKind::Single);
        g.board.set(0, 7, 1).unwrap();
        g.apply(Command::MoveRight);
        assert_eq!(g.piece().x, 6);
        g.apply(Command::MoveRight);
        assert_eq!(g.piece().x, 6);
    }

    #[test]
    fn test_rotate_commits_new_orientation() {
        let mut g = with_shape(ShapeKind::HorizontalLine);
        g.apply(Command::Rotate);
        assert_eq!((g.piece().shape.width(), g.piece().shape.height()), (1, 3));
        assert_eq!(g.piece().x, 4);
    }

    #[test]
    fn test_rotate_rejected_on_collision() {
        let mut g = with_shape(ShapeKind::HorizontalLine);
        // Standing up two rows above the floor would poke through it.
        g.piece.y = ROWS as i32 - 2;
        g.apply(Command::Rotate);
        assert_eq!(g.piece().shape, ShapeKind::HorizontalLine.shape());
    }

    #[test]
    fn test_hard_drop_reaches_floor() {
        let mut g = with_shape(ShapeKind::Square);
        g.apply(Command::HardDrop);
        for (r, c) in [(18, 4), (18, 5), (19, 4), (19, 5)] {
            assert_eq!(g.cell_at(r, c), Some(4));
        }
        assert_eq!(filled_count(g.board()), 4);
        // The next piece is already in play at the top.
        assert_eq!(g.piece().y, 0);
    }

    #[test]
    fn test_hard_drop_stacks() {
        let mut g = with_shape(ShapeKind::VerticalPair);
        g.apply(Command::HardDrop);
        g.spawn_shape(ShapeKind::VerticalPair.shape());
        g.apply(Command::HardDrop);
        for r in 16..20 {
            assert_eq!(g.cell_at(r, 5), Some(3));
        }
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut g = with_shape(ShapeKind::Single);
        g.apply(Command::SoftDrop);
        assert_eq!(g.piece().y, 1);
        g.piece.y = ROWS as i32 - 1;
        g.apply(Command::SoftDrop);
        assert_eq!(g.cell_at(ROWS - 1, 5), Some(1));
        assert_eq!(g.piece().y, 0);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_gravity_cadence() {
        let mut g = with_shape(ShapeKind::Single);
        g.advance(1000);
        assert_eq!(g.piece().y, 0);
        g.advance(1);
        assert_eq!(g.piece().y, 1);
        g.advance(999);
        assert_eq!(g.piece().y, 1);
        g.advance(2);
        assert_eq!(g.piece().y, 2);
    }

    #[test]
    fn test_pause_freezes_gravity_and_moves() {
        let mut g = with_shape(ShapeKind::Single);
        g.apply(Command::TogglePause);
        assert_eq!(g.phase(), Phase::Paused);
        g.advance(10_000);
        g.apply(Command::MoveLeft);
        g.apply(Command::HardDrop);
        assert_eq!((g.piece().x, g.piece().y), (5, 0));
        assert!(g.board().is_empty());
        g.apply(Command::TogglePause);
        assert!(!g.is_paused());
        // Time spent paused is not owed.
        g.advance(500);
        assert_eq!(g.piece().y, 0);
        g.advance(501);
        assert_eq!(g.piece().y, 1);
    }

    #[test]
    fn test_cells_above_top_are_not_locked() {
        let mut g = with_shape(ShapeKind::VerticalPair);
        g.board.set(1, 0, 1).unwrap();
        g.piece.x = 0;
        g.piece.y = -1;
        g.apply(Command::SoftDrop);
        assert_eq!(g.cell_at(0, 0), Some(3));
        assert_eq!(filled_count(g.board()), 2);
        assert!(!g.is_game_over());
    }

    #[test]
    fn test_active_piece_cells_skip_hidden_rows() {
        let mut g = with_shape(ShapeKind::VerticalPair);
        g.piece.y = -1;
        assert_eq!(g.active_piece_cells(), vec![(0, 5, 3)]);
    }

    #[test]
    fn test_pattern_match_clears_and_scores() {
        let mut g = with_shape(ShapeKind::Single);
        g.target = CATALOG[0]; // solid 5x5
        for r in 15..20 {
            for c in 5..10 {
                if (r, c) != (15, 5) {
                    g.board.set(r, c, 2).unwrap();
                }
            }
        }
        g.apply(Command::HardDrop);
        assert!(g.board().is_empty());
        assert_eq!(g.score(), MATCH_AWARD);
        assert_eq!(g.matches(), 1);
        assert!(CATALOG.contains(g.active_target()));
        assert!(!g.is_game_over());
    }

    #[test]
    fn test_no_match_keeps_board_and_score() {
        let mut g = with_shape(ShapeKind::Single);
        g.target = CATALOG[0];
        for r in 15..20 {
            for c in 5..10 {
                if (r, c) != (15, 5) {
                    g.board.set(r, c, VOID_KIND).unwrap();
                }
            }
        }
        g.apply(Command::HardDrop);
        assert_eq!(g.score(), 0);
        assert_eq!(filled_count(g.board()), 25);
        assert_eq!(g.active_target(), &CATALOG[0]);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut g = with_shape(ShapeKind::Single);
        for r in 0..2 {
            for c in 0..COLS {
                g.board.set(r, c, 1).unwrap();
            }
        }
        g.spawn_next();
        assert!(g.is_game_over());
        assert_eq!(g.phase(), Phase::GameOver);

        let before = (g.piece().clone(), g.board().clone());
        g.apply(Command::TogglePause);
        g.apply(Command::MoveLeft);
        g.apply(Command::HardDrop);
        g.advance(60_000);
        assert!(!g.is_paused());
        assert_eq!((g.piece().clone(), g.board().clone()), before);
    }

    #[test]
    fn test_stacking_to_the_top_ends_game() {
        let mut g = with_shape(ShapeKind::Single);
        g.target = CATALOG[0]; // a single column can never fill it
        for _ in 0..ROWS {
            g.spawn_shape(ShapeKind::Single.shape());
            g.apply(Command::HardDrop);
            if g.is_game_over() {
                break;
            }
        }
        assert!(g.is_game_over());
        let score = g.score();
        g.apply(Command::HardDrop);
        assert_eq!(g.score(), score);
    }

    #[test]
    fn test_same_seed_same_game() {
        let script = [
            Command::MoveLeft,
            Command::Rotate,
            Command::HardDrop,
            Command::MoveRight,
            Command::MoveRight,
            Command::HardDrop,
            Command::SoftDrop,
            Command::HardDrop,
        ];
        let mut a = seeded(99);
        let mut b = seeded(99);
        for cmd in script {
            a.apply(cmd);
            b.apply(cmd);
            a.advance(400);
            b.advance(400);
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.piece(), b.piece());
        assert_eq!(a.active_target(), b.active_target());
    }
}
