//! Service layer: read-path queries and the refresh write path.

pub mod refresh;
pub mod scheduler;
pub mod stats_service;

pub use refresh::{RefreshJob, RefreshReport};
pub use scheduler::{RefreshScheduler, SchedulerHandle};
pub use stats_service::StatsService;
