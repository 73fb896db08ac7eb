use std::path::PathBuf;

pub use anyhow::Result;

use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum Error {
    #[error("InvalidPath: {0:?}")]
    InvalidPath(PathBuf),
    #[error("NotADirectory: {0:?}")]
    NotADirectory(PathBuf),
}
