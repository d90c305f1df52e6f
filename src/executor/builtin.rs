mod commands;
mod manager;

pub use manager::{check_args, BuiltinCommand, BuiltinManager, BuiltinStatus};
