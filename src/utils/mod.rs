pub mod constants;
pub mod errors;
pub mod lcm;

pub use constants::SchedulingCode;
pub use errors::{ParseError, SchedulingError, TaskSetError};
pub use lcm::multiple_lcm;
