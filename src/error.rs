use thiserror::Error;

/// Errors produced while configuring, persisting, or building environments
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value {value} for `{name}`. Must be in the interval [{min}, {max}].")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid maze: {0}")]
    InvalidMaze(String),
}

pub type Result<T> = std::result::Result<T, Error>;
