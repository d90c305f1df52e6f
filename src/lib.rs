pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod parser;
pub mod repl;

#[cfg(test)]
mod test_support;
