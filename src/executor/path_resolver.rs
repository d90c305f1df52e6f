use std::path::Path;
use nix::unistd::{access, AccessFlags};
use tracing::{debug, trace};
use crate::config::SearchPathList;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedExecutable {
    Found(String),
    NotFound,
}

impl ResolvedExecutable {
    pub fn found(self) -> Option<String> {
        match self {
            ResolvedExecutable::Found(path) => Some(path),
            ResolvedExecutable::NotFound => None,
        }
    }
}

pub struct PathResolver {
    search_path: SearchPathList,
}

impl PathResolver {
    pub fn new(search_path: SearchPathList) -> Self {
        PathResolver { search_path }
    }

    /// Names starting with `/` or `.` are already paths and are returned
    /// unchecked; the launcher validates them.
    pub fn resolve(&self, command: &str) -> ResolvedExecutable {
        if command.is_empty() {
            return ResolvedExecutable::NotFound;
        }
        if command.starts_with('/') || command.starts_with('.') {
            return ResolvedExecutable::Found(command.to_string());
        }

        for dir in self.search_path.iter() {
            let candidate = format!("{}{}", dir, command);
            if is_executable_file(Path::new(&candidate)) {
                debug!(command, path = %candidate, "resolved command");
                return ResolvedExecutable::Found(candidate);
            }
            trace!(command, dir, "no match");
        }

        debug!(command, "command not found in search path");
        ResolvedExecutable::NotFound
    }
}

/// A regular file (after following symlinks) that the current user may execute.
/// Missing or unreadable paths are simply not executable.
pub fn is_executable_file(path: &Path) -> bool {
    let is_file = path.metadata().map(|m| m.is_file()).unwrap_or(false);
    is_file && access(path, AccessFlags::X_OK).is_ok()
}
