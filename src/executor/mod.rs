mod builtin;
mod dispatcher;
mod launcher;
mod path_resolver;

pub use builtin::{check_args, BuiltinCommand, BuiltinManager, BuiltinStatus};
pub use dispatcher::{CommandDispatcher, ExecOutcome, ExecStatus, EXIT_DIRECTIVE};
pub use launcher::{ChildProcessResult, ProcessLauncher};
pub use path_resolver::{is_executable_file, PathResolver, ResolvedExecutable};
