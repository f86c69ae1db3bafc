//! grid-2048: a deterministic 2048 game engine
//!
//! This crate provides:
//! - A validated 4x4 `Board` type with value semantics (`shift`, `resolve`, `with_random_tile`, ...)
//! - Move resolution through one canonical "slide left" pass plus orientation transforms
//! - Tile spawning driven by a caller-supplied RNG, and win/loss detection (`engine` module)
//! - Game orchestration over the caller's `(board, score, status)` triple (`game` module)
//! - A checksummed snapshot format for sessions (`serialization` module)
//!
//! Quick start:
//! ```
//! use grid_2048::engine::{GameStatus, Move, Target};
//! use grid_2048::game::{apply_move, new_game};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g = new_game(Target::DEFAULT, &mut rng);
//! let (board, score, status) = apply_move(g.board, g.score, Move::Left, Target::DEFAULT, &mut rng);
//! assert!(board.count_empty() >= 13);
//! assert_eq!(status, GameStatus::InProgress);
//! assert!(score % 4 == 0);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use grid_2048::engine::Target;
//! use grid_2048::game::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let target = Target::new(64).unwrap();
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut state = GameState::new(target, &mut rng);
//! let mut moves = 0u32;
//! while !state.status.is_terminal() && moves < 1000 {
//!     let Some(&dir) = state.board.legal_moves().first() else { break };
//!     state = state.step(dir, target, &mut rng).state;
//!     moves += 1;
//! }
//! assert!(moves > 0);
//! ```
//!
pub mod config;
pub mod engine;
pub mod game;
pub mod serialization;
