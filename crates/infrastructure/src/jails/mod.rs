mod sqlite_repository;
mod supervisor;
mod tailer;

pub use sqlite_repository::SqliteJailRepository;
pub use supervisor::JailSupervisor;
pub use tailer::TailerConfig;
