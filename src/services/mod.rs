pub mod ladder;

pub use ladder::LadderService;
