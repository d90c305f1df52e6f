use std::io::{self, BufRead, Write};
use tracing::{debug, warn};
use crate::config::Config;
use crate::executor::{CommandDispatcher, ExecOutcome};
use crate::parser::CommandLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    Running,
    Terminated,
}

/// Prompt, read, dispatch, repeat. Ends on `exit` or end of input.
pub struct Repl<R, W> {
    prompt: String,
    dispatcher: CommandDispatcher,
    input: R,
    output: W,
    state: ReplState,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        Repl {
            prompt: config.prompt,
            dispatcher: CommandDispatcher::new(config.search_path),
            input,
            output,
            state: ReplState::Running,
        }
    }

    pub fn state(&self) -> ReplState {
        self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Only a failure to write to the output is returned as an error.
    pub fn run(&mut self) -> io::Result<()> {
        while self.state == ReplState::Running {
            self.step()?;
        }
        Ok(())
    }

    pub fn step(&mut self) -> io::Result<ReplState> {
        if self.state == ReplState::Terminated {
            return Ok(self.state);
        }

        write!(self.output, "{}", self.prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        match self.input.read_line(&mut buf) {
            Ok(0) => {
                // EOF (e.g., Ctrl-D)
                writeln!(self.output)?;
                self.state = ReplState::Terminated;
            }
            Ok(_) => {
                if let Some(line) = CommandLine::parse(&buf) {
                    self.dispatch(&line)?;
                }
            }
            // The offending bytes have been consumed; keep going.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                writeln!(self.output, "Error reading input: {}", e)?;
            }
            Err(e) => {
                warn!(error = %e, "reading input failed");
                writeln!(self.output, "Error reading input: {}", e)?;
                self.state = ReplState::Terminated;
            }
        }
        Ok(self.state)
    }

    fn dispatch(&mut self, line: &CommandLine) -> io::Result<()> {
        match self.dispatcher.dispatch(line, &mut self.output) {
            Ok(ExecOutcome::Exit) => {
                debug!("exit requested");
                self.state = ReplState::Terminated;
            }
            Ok(outcome) => debug!(?outcome, "dispatched"),
            Err(e) => {
                debug!(error = %e, command = line.name(), "command failed");
                writeln!(self.output, "{}", e)?;
            }
        }
        Ok(())
    }
}
