//! Schedulability of sporadic and periodic task sets on identical
//! multiprocessors under partitioned EDF, global EDF and EDF(k).

pub mod models;
pub mod utils;

pub use models::*;
pub use utils::*;
