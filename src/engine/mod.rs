pub mod board;
pub mod game;
pub mod movegen;
pub mod steps;
pub mod types;
pub mod zobrist;

pub use board::Position;
pub use game::Game;
pub use movegen::{legal_moves, legal_moves_from};
pub use types::*;
