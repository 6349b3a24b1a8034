use thiserror::Error;

pub type Result<T> = std::result::Result<T, GaraponError>;

#[derive(Error, Debug)]
pub enum GaraponError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Display surface error: {0}")]
    Surface(String),

    #[error("Clock error: {0}")]
    Clock(String),

    #[error("Value {value} is outside the sortable range 0..={max}")]
    OutOfDomain { value: u32, max: u32 },

    #[error("Machine has no balls left to draw")]
    Exhausted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GaraponError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn clock(msg: impl Into<String>) -> Self {
        Self::Clock(msg.into())
    }

    /// Configuration problems only spoil the current playthrough; the rest
    /// mean the environment itself is broken.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::OutOfDomain { .. })
    }
}
