use std::io;
use thiserror::Error;
use nix::errno::Errno;

/// Failure to get a child process started or reaped.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("executable {0} not found")]
    NotExecutable(String),
    #[error("invalid argument for {0}: contains a NUL byte")]
    InvalidArgument(String),
    #[error("could not spawn {path}: {errno}")]
    Spawn { path: String, errno: Errno },
    #[error("could not wait for child {pid}: {errno}")]
    Wait { pid: i32, errno: Errno },
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Something went wrong there: {0}")]
    Launch(#[from] LaunchError),
    #[error("{name}: {source}")]
    Builtin {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ExecError {
    pub fn builtin(name: &str, source: io::Error) -> Self {
        ExecError::Builtin { name: name.to_string(), source }
    }
}
