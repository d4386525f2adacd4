pub mod engine;
pub mod ladder;
pub mod memory;
pub mod outcome;
pub mod store;
pub mod types;

pub use engine::{RankingEngine, promotion_distance};
pub use ladder::{Ladder, LadderReport, check_permutation};
pub use memory::MemoryRankStore;
pub use outcome::{Classification, classify};
pub use store::RankStore;
pub use types::{MatchResult, MemberId, Rank, RankAdjustment, RankChange, Ranked, Seat, Standing};
