use std::collections::HashMap;
use std::io::{self, Write};
use tracing::debug;
use crate::error::ExecError;
use super::commands::{
    CopyCommand,
    DeleteCommand,
    DownCommand,
    FilesCommand,
    InfoCommand,
    UpCommand,
    WhereCommand,
};

pub type BuiltinStatus = Result<(), ExecError>;

/// A command run inside the shell process. `fields[0]` is the command name.
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus;
}

pub struct BuiltinManager {
    commands: HashMap<String, Box<dyn BuiltinCommand>>,
}

impl BuiltinManager {
    pub fn new() -> Self {
        let mut mgr = BuiltinManager {
            commands: HashMap::new(),
        };
        mgr.register(Box::new(FilesCommand));
        mgr.register(Box::new(InfoCommand));
        mgr.register(Box::new(DeleteCommand));
        mgr.register(Box::new(CopyCommand));
        mgr.register(Box::new(WhereCommand));
        mgr.register(Box::new(DownCommand));
        mgr.register(Box::new(UpCommand));
        mgr
    }

    pub fn register(&mut self, cmd: Box<dyn BuiltinCommand>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs the built-in named by `fields[0]`. Unknown names are a no-op
    /// returning `false`.
    pub fn execute(&self, fields: &[String], out: &mut dyn Write) -> Result<bool, ExecError> {
        let Some(cmd) = fields.first().and_then(|name| self.commands.get(name)) else {
            return Ok(false);
        };
        debug!(builtin = cmd.name(), args = fields.len() - 1, "running builtin");
        cmd.run(fields, out)?;
        Ok(true)
    }
}

impl Default for BuiltinManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that exactly `expected` arguments follow the command name, printing
/// the mismatch otherwise.
pub fn check_args(fields: &[String], expected: usize, out: &mut dyn Write) -> io::Result<bool> {
    let name = fields.first().map(String::as_str).unwrap_or_default();
    let given = fields.len().saturating_sub(1);
    if given == expected {
        return Ok(true);
    }
    if given > expected {
        writeln!(out, "Unexpected argument {} for command {}", fields[expected + 1], name)?;
    } else {
        writeln!(out, "Missing argument for command {}", name)?;
    }
    Ok(false)
}
