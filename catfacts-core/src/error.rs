use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatFactsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid fact table name: {0:?}")]
    InvalidTableName(String),

    #[error("Other error: {0}")]
    Other(String),
}
