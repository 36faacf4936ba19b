pub mod expire_sweep_job;
pub mod jail_engine_job;
pub mod runner;
pub mod scheduler_job;

pub use expire_sweep_job::ExpireSweepJob;
pub use jail_engine_job::JailEngineJob;
pub use runner::JobRunner;
pub use scheduler_job::SchedulerJob;
