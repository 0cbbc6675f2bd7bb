pub mod catalog;
pub mod config;
pub mod models;
pub mod scheduler;
pub mod session;
pub mod simulate;
pub mod stats;

pub use models::{MasteryLevel, ReviewOutcome, Timestamp, WordRecord};
pub use scheduler::ReviewScheduler;
pub use session::{Session, SessionConfig};
