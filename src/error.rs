use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load map image {path}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("known distance must be a positive number, got {0}")]
    InvalidDistance(f64),

    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
