pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod skill;
pub mod speech;
pub mod store;

pub use self::config::CatFactsConfig;
pub use error::CatFactsError;
pub use models::{FactCommand, FactRecord, IntentCommand, ResponseSegment};
pub use skill::{RequestBody, SkillRequest, SkillResponse};
pub use store::{FactStore, MemoryFactStore, PgFactStore};
