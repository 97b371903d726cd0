pub mod clock;
pub mod engine;
pub mod evaluation;
pub mod search;
pub mod tt;

pub use engine::{AiEngine, RandomAi, SearchAi, default_engine};
pub use evaluation::evaluate;
pub use search::{SearchInfo, SearchOutcome, iterative_deepening};
pub use tt::TranspositionTable;
