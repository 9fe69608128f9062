mod job;
pub mod partition;
pub mod scheduler;
pub mod task;
pub mod taskset;

pub use job::{Job, Priority};
pub use partition::{partition, Partition};
pub use task::Task;
pub use taskset::TaskSet;

pub type TimeStep = usize;

pub type ID = u32;
