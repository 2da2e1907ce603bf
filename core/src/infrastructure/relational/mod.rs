pub mod accumulator;
pub mod mapper;
pub mod queries;

pub use accumulator::{ConditionList, SeaQueryAccumulator};
pub use mapper::RelationalQueryMapper;
