pub mod analysis;
pub mod core;
pub mod edf_k;
pub mod policy;
pub mod scheduler;
pub mod simulator;

pub use self::core::Core;
pub use edf_k::edf_k_boost;
pub use policy::{edf_priority, global_edf, EarliestDeadlineFirst, GlobalEdf, Policy};
pub use scheduler::Scheduler;
pub use simulator::{SimulationStats, Simulator};
