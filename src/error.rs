use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoutError {
    #[error("dataset is missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("unknown or non-numeric attribute `{column}`")]
    InvalidAttribute { column: String },

    #[error("invalid range for `{column}`: {lo} > {hi}")]
    InvalidRange { column: String, lo: f64, hi: f64 },
}

impl ScoutError {
    pub fn invalid_attribute(column: impl Into<String>) -> Self {
        ScoutError::InvalidAttribute {
            column: column.into(),
        }
    }
}
