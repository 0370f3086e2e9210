/// Errors surfaced by the terminal harness
use thiserror::Error;

use edu3d_core::GeometryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model parameters: {0}")]
    Geometry(#[from] GeometryError),
}

pub type Result<T> = std::result::Result<T, AppError>;
