//! CLI errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("unknown command {0:?} (try <n>, c <n>, r or q)")]
    BadCommand(String),

    #[error("no row {0}")]
    NoSuchRow(usize),

    #[error(transparent)]
    Tree(#[from] hubtree_lib::error::TreeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
