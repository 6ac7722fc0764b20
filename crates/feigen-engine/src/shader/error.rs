use std::fmt;
use std::path::PathBuf;

use super::stage::ShaderStage;

/// Error returned while building a [`Shader`](super::Shader).
///
/// `Compile` and `Link` carry a human-readable info log; the log is never
/// empty and names the stage (compile) or the program (link).
#[derive(Debug)]
pub enum BuildError {
    /// A stage source file could not be read.
    Read { path: PathBuf, error: std::io::Error },
    /// A stage failed to parse or validate.
    Compile { stage: ShaderStage, log: String },
    /// The stages compiled but the program did not come together.
    Link { log: String },
    /// The stage set lacks a required stage.
    MissingStage(ShaderStage),
    /// The stage set names the same stage twice.
    DuplicateStage(ShaderStage),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Read { path, error } => {
                write!(f, "failed to read shader source {}: {error}", path.display())
            }
            BuildError::Compile { stage, log } => {
                write!(f, "{stage} shader failed to compile:\n{log}")
            }
            BuildError::Link { log } => {
                write!(f, "shader program failed to link:\n{log}")
            }
            BuildError::MissingStage(stage) => write!(f, "missing {stage} stage"),
            BuildError::DuplicateStage(stage) => write!(f, "duplicate {stage} stage"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Read { error, .. } => Some(error),
            _ => None,
        }
    }
}
