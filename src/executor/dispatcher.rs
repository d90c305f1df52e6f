use std::io::Write;
use std::path::Path;
use tracing::debug;
use crate::config::SearchPathList;
use crate::error::{ExecError, LaunchError};
use crate::parser::CommandLine;
use super::builtin::BuiltinManager;
use super::launcher::{ChildProcessResult, ProcessLauncher};
use super::path_resolver::{is_executable_file, PathResolver, ResolvedExecutable};

pub const EXIT_DIRECTIVE: &str = "exit";

/// What a single dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    Builtin,
    External(ChildProcessResult),
    NotFound,
    Exit,
}

pub type ExecStatus = Result<ExecOutcome, ExecError>;

pub struct CommandDispatcher {
    builtins: BuiltinManager,
    resolver: PathResolver,
    launcher: ProcessLauncher,
}

impl CommandDispatcher {
    pub fn new(search_path: SearchPathList) -> Self {
        CommandDispatcher {
            builtins: BuiltinManager::new(),
            resolver: PathResolver::new(search_path),
            launcher: ProcessLauncher::new(),
        }
    }

    pub fn dispatch(&self, line: &CommandLine, out: &mut dyn Write) -> ExecStatus {
        if self.builtins.execute(line.fields(), out)? {
            return Ok(ExecOutcome::Builtin);
        }
        if line.name() == EXIT_DIRECTIVE {
            return Ok(ExecOutcome::Exit);
        }
        self.run_external(line, out)
    }

    fn run_external(&self, line: &CommandLine, out: &mut dyn Write) -> ExecStatus {
        let command = line.name();
        let target = match self.resolver.resolve(command) {
            ResolvedExecutable::Found(path) => path,
            // e.g. `tool` typed for `./tool` in the working directory
            ResolvedExecutable::NotFound if is_executable_file(Path::new(command)) => {
                command.to_string()
            }
            ResolvedExecutable::NotFound => {
                writeln!(out, "Executable file {} not found", command)?;
                return Ok(ExecOutcome::NotFound);
            }
        };

        // Earlier shell output must land before anything the child writes.
        out.flush()?;
        match self.launcher.launch(&target, line.fields()) {
            Ok(result) => {
                match result {
                    ChildProcessResult::Exited(code) => debug!(command, code, "command finished"),
                    ChildProcessResult::TerminatedAbnormally { pid, .. } => {
                        writeln!(out, "Child process {} terminated abnormally", pid)?;
                    }
                }
                Ok(ExecOutcome::External(result))
            }
            Err(LaunchError::NotExecutable(_)) => {
                writeln!(out, "Executable file {} not found", command)?;
                Ok(ExecOutcome::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{output, write_file, CwdGuard, TempDir};

    fn system_dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(SearchPathList::new(["/bin/", "/usr/bin/"]))
    }

    fn dispatch(d: &CommandDispatcher, line: &str) -> (ExecStatus, String) {
        let mut out = Vec::new();
        let status = d.dispatch(&CommandLine::parse(line).unwrap(), &mut out);
        (status, output(out))
    }

    #[test]
    fn test_exit_directive() {
        let (status, out) = dispatch(&system_dispatcher(), "exit");
        assert_eq!(status.unwrap(), ExecOutcome::Exit);
        assert!(out.is_empty());
    }

    #[test]
    fn test_builtin_is_routed() {
        let (status, out) = dispatch(&system_dispatcher(), "where now");
        assert_eq!(status.unwrap(), ExecOutcome::Builtin);
        assert_eq!(out, "Unexpected argument now for command where\n");
    }

    #[test]
    fn test_external_command_exits_normally() {
        let (status, out) = dispatch(&system_dispatcher(), "true");
        assert_eq!(status.unwrap(), ExecOutcome::External(ChildProcessResult::Exited(0)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_nonzero_exit_is_not_reported() {
        let (status, out) = dispatch(&system_dispatcher(), "false");
        assert!(matches!(
            status.unwrap(),
            ExecOutcome::External(ChildProcessResult::Exited(code)) if code != 0
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let (status, out) = dispatch(&system_dispatcher(), "no-such-command-pshell");
        assert_eq!(status.unwrap(), ExecOutcome::NotFound);
        assert_eq!(out, "Executable file no-such-command-pshell not found\n");
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = TempDir::new("dispatch-missing");
        let missing = format!("{}gone", dir.prefix());
        let (status, out) = dispatch(&system_dispatcher(), &missing);
        assert_eq!(status.unwrap(), ExecOutcome::NotFound);
        assert_eq!(out, format!("Executable file {} not found\n", missing));
    }

    fn kill_self(signal: &str) -> (ExecStatus, String) {
        let dir = TempDir::new("dispatch-kill");
        let script = dir.path().join("suicide.sh");
        write_file(&script, &format!("kill -s {} $$\n", signal), 0o644);
        let line = format!("/bin/sh {}", script.display());
        dispatch(&system_dispatcher(), &line)
    }

    #[test]
    fn test_abnormal_termination_reports_pid() {
        let (status, out) = kill_self("KILL");
        let ExecOutcome::External(ChildProcessResult::TerminatedAbnormally { pid, signal }) =
            status.unwrap()
        else {
            panic!("expected abnormal termination");
        };
        assert_eq!(signal, libc::SIGKILL);
        assert_eq!(out, format!("Child process {} terminated abnormally\n", pid));
    }

    #[test]
    fn test_realtime_signal_reports_pid() {
        let (status, out) = kill_self("40");
        let ExecOutcome::External(ChildProcessResult::TerminatedAbnormally { pid, signal }) =
            status.unwrap()
        else {
            panic!("expected abnormal termination");
        };
        assert_eq!(signal, 40);
        assert_eq!(out, format!("Child process {} terminated abnormally\n", pid));
    }

    #[test]
    fn test_launch_failure_is_an_error_not_an_outcome() {
        let (status, out) = dispatch(&system_dispatcher(), "/bin/sh a\0b");
        let err = status.unwrap_err();
        assert!(matches!(
            err,
            ExecError::Launch(LaunchError::InvalidArgument(ref arg)) if arg == "a\0b"
        ));
        assert!(err.to_string().starts_with("Something went wrong there: invalid argument"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_literal_executable_in_working_directory() {
        let dir = TempDir::new("dispatch-literal");
        std::os::unix::fs::symlink("/bin/sh", dir.path().join("tool")).unwrap();
        let _cwd = CwdGuard::enter(dir.path());

        let d = CommandDispatcher::new(SearchPathList::new(Vec::<String>::new()));
        let (status, out) = dispatch(&d, "tool -c exit");
        assert_eq!(status.unwrap(), ExecOutcome::External(ChildProcessResult::Exited(0)));
        assert!(out.is_empty());
    }
}
