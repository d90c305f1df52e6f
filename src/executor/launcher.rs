use std::ffi::CString;
use std::path::Path;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::{fork, ForkResult, Pid};
use tracing::{debug, trace, warn};
use crate::error::LaunchError;
use super::path_resolver::is_executable_file;

/// How a child process ended. `signal` is the raw signal number, which may be
/// a real-time signal with no named constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildProcessResult {
    Exited(i32),
    TerminatedAbnormally { pid: i32, signal: i32 },
}

/// Runs one external program to completion with fork + execv.
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        ProcessLauncher
    }

    /// `argv[0]` should be the command name as the user typed it. The child
    /// inherits the environment and standard streams, and is always reaped
    /// before this returns.
    pub fn launch(
        &self,
        path: &str,
        argv: &[String],
    ) -> Result<ChildProcessResult, LaunchError> {
        if !is_executable_file(Path::new(path)) {
            return Err(LaunchError::NotExecutable(path.to_string()));
        }

        // Everything the child needs is allocated before fork: the child may
        // only make async-signal-safe calls until exec.
        let c_path = to_cstring(path)?;
        let mut c_args = argv
            .iter()
            .map(|a| to_cstring(a))
            .collect::<Result<Vec<_>, _>>()?;
        if c_args.is_empty() {
            c_args.push(c_path.clone());
        }
        let mut arg_ptrs: Vec<*const libc::c_char> =
            c_args.iter().map(|a| a.as_ptr()).collect();
        arg_ptrs.push(std::ptr::null());

        match unsafe { fork() } {
            Ok(ForkResult::Child) => unsafe {
                libc::execv(c_path.as_ptr(), arg_ptrs.as_ptr());
                libc::_exit(127)
            },
            Ok(ForkResult::Parent { child }) => {
                debug!(pid = child.as_raw(), path, "spawned child");
                self.wait_for(child)
            }
            Err(errno) => {
                warn!(path, %errno, "fork failed");
                Err(LaunchError::Spawn { path: path.to_string(), errno })
            }
        }
    }

    /// Raw `waitpid` rather than nix's `WaitStatus`, which cannot represent
    /// real-time signals and would lose an already reaped child.
    fn wait_for(&self, child: Pid) -> Result<ChildProcessResult, LaunchError> {
        let pid = child.as_raw();
        let mut status: libc::c_int = 0;
        loop {
            if unsafe { libc::waitpid(pid, &mut status, 0) } == -1 {
                match Errno::last() {
                    Errno::EINTR => continue,
                    errno => {
                        warn!(pid, %errno, "waitpid failed");
                        return Err(LaunchError::Wait { pid, errno });
                    }
                }
            }

            if libc::WIFEXITED(status) {
                let code = libc::WEXITSTATUS(status);
                debug!(pid, code, "child exited");
                return Ok(ChildProcessResult::Exited(code));
            }
            if libc::WIFSIGNALED(status) {
                let signal = libc::WTERMSIG(status);
                debug!(pid, signal, name = signal_name(signal), "child killed");
                return Ok(ChildProcessResult::TerminatedAbnormally { pid, signal });
            }
            // Not terminated yet; keep waiting so the child is reaped.
            trace!(pid, status, "child state changed");
        }
    }
}

fn signal_name(signal: i32) -> &'static str {
    Signal::try_from(signal).map(Signal::as_str).unwrap_or("SIGRT")
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

fn to_cstring(s: &str) -> Result<CString, LaunchError> {
    CString::new(s).map_err(|_| LaunchError::InvalidArgument(s.to_string()))
}
