use std::env;
use std::fs::{self, FileTimes, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use nix::unistd::{Uid, User};
use tracing::debug;
use crate::error::ExecError;
use super::manager::{check_args, BuiltinCommand, BuiltinStatus};
use crate::executor::is_executable_file;

/// `files`: lists the current directory.
pub struct FilesCommand;

impl BuiltinCommand for FilesCommand {
    fn name(&self) -> &'static str {
        "files"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if !check_args(fields, 0, out)? {
            return Ok(());
        }
        let mut entries = fs::read_dir(".")
            .and_then(|dir| dir.collect::<io::Result<Vec<_>>>())
            .map_err(|e| ExecError::builtin(self.name(), e))?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            // Symlinks to directories count as directories.
            let is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
            let kind = if is_dir { "dir" } else { "file" };
            writeln!(out, "{}: {}", kind, entry.file_name().to_string_lossy())?;
        }
        Ok(())
    }
}

/// `info <path>`: prints type, size and ownership details.
///
/// Anything that is not a regular file is reported as a directory, including
/// paths that do not exist; the stat that follows then fails and is reported.
pub struct InfoCommand;

impl BuiltinCommand for InfoCommand {
    fn name(&self) -> &'static str {
        "info"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if !check_args(fields, 1, out)? {
            return Ok(());
        }
        let target = &fields[1];
        let meta = fs::metadata(target);

        match &meta {
            Ok(m) if m.is_file() => {
                writeln!(out, "File Name: {}", target)?;
                writeln!(out, "Directory/File: file")?;
                writeln!(out, "Size: {}", m.len())?;
                let executable = is_executable_file(Path::new(target));
                writeln!(out, "Executable?: {}", if executable { "True" } else { "False" })?;
            }
            _ => writeln!(out, "Directory/File: directory")?,
        }

        let meta = match meta {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %target, error = %e, "stat failed");
                writeln!(out, "Cannot stat {}: {}", target, e)?;
                return Ok(());
            }
        };
        writeln!(out, "Owner: {}", owner_name(meta.uid()))?;
        writeln!(out, "Last Edited: {}", format_local_time(meta.mtime()))?;
        Ok(())
    }
}

fn owner_name(uid: u32) -> String {
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}

/// Formats seconds since the epoch as local time, e.g. `Mar 04 2024 17:05:09`.
fn format_local_time(secs: i64) -> String {
    let t = secs as libc::time_t;
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    if unsafe { libc::localtime_r(&t, &mut tm) }.is_null() {
        return secs.to_string();
    }
    let mut buf = [0u8; 64];
    let n = unsafe {
        libc::strftime(
            buf.as_mut_ptr().cast::<libc::c_char>(),
            buf.len(),
            c"%b %d %Y %H:%M:%S".as_ptr(),
            &tm,
        )
    };
    if n == 0 {
        return secs.to_string();
    }
    String::from_utf8_lossy(&buf[..n]).into_owned()
}

pub struct DeleteCommand;

impl BuiltinCommand for DeleteCommand {
    fn name(&self) -> &'static str {
        "delete"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if !check_args(fields, 1, out)? {
            return Ok(());
        }
        let target = &fields[1];
        if !Path::new(target).exists() {
            writeln!(out, "File does not exist")?;
            return Ok(());
        }
        fs::remove_file(target).map_err(|e| ExecError::builtin(self.name(), e))?;
        writeln!(out, "Successfully deleted")?;
        Ok(())
    }
}

/// `copy <from> <to>`: never overwrites. Permissions and timestamps are kept.
pub struct CopyCommand;

impl BuiltinCommand for CopyCommand {
    fn name(&self) -> &'static str {
        "copy"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if !check_args(fields, 2, out)? {
            return Ok(());
        }
        let (from, to) = (Path::new(&fields[1]), Path::new(&fields[2]));
        if !from.exists() {
            writeln!(out, "From file does not exist")?;
        } else if to.exists() {
            writeln!(out, "To file already exists")?;
        } else {
            copy_preserving_times(from, to).map_err(|e| ExecError::builtin(self.name(), e))?;
        }
        Ok(())
    }
}

fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    let meta = fs::metadata(from)?;
    let times = FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);
    OpenOptions::new().write(true).open(to)?.set_times(times)
}

/// `where`: prints the working directory.
pub struct WhereCommand;

impl BuiltinCommand for WhereCommand {
    fn name(&self) -> &'static str {
        "where"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if !check_args(fields, 0, out)? {
            return Ok(());
        }
        let cwd = env::current_dir().map_err(|e| ExecError::builtin(self.name(), e))?;
        writeln!(out, "{}", cwd.display())?;
        Ok(())
    }
}

/// `down <dir...>`: the arguments are joined with single spaces, so a
/// directory name containing spaces can be typed without quoting.
pub struct DownCommand;

impl BuiltinCommand for DownCommand {
    fn name(&self) -> &'static str {
        "down"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if fields.len() < 2 {
            check_args(fields, 1, out)?;
            return Ok(());
        }
        let directory = fields[1..].join(" ");
        if !Path::new(&directory).is_dir() {
            writeln!(out, "Error directory does not exist")?;
            return Ok(());
        }
        env::set_current_dir(&directory).map_err(|e| ExecError::builtin(self.name(), e))?;
        debug!(directory = %directory, "changed directory");
        Ok(())
    }
}

pub struct UpCommand;

impl BuiltinCommand for UpCommand {
    fn name(&self) -> &'static str {
        "up"
    }
    fn run(&self, fields: &[String], out: &mut dyn Write) -> BuiltinStatus {
        if !check_args(fields, 0, out)? {
            return Ok(());
        }
        env::set_current_dir("..").map_err(|e| ExecError::builtin(self.name(), e))?;
        Ok(())
    }
}
