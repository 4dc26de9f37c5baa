//! Machine-level errors.

use std::io;
use std::path::PathBuf;

use sharp_sm83::StepError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The ROM image could not be read.
    #[error("failed to load ROM {}: {source}", .path.display())]
    RomLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Step(#[from] StepError),
}
