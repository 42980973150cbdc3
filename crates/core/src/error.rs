use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Empty batch: at least one record is required")]
    EmptyBatch,

    #[error("Mixed dates in one batch: expected {expected}, found {found}")]
    MixedDates { expected: String, found: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Structural invariant violated: {0}")]
    StructuralInvariant(String),
}

impl CoreError {
    /// True for errors caused by the input batch rather than the grid.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyBatch | Self::MixedDates { .. } | Self::InvalidRecord(_)
        )
    }
}
