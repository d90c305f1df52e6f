/// One input line split on whitespace. Field 0 is the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
	fields: Vec<String>,
}

impl CommandLine {
	/// Returns `None` for a blank line. No quoting or escapes are recognized.
	pub fn parse(line: &str) -> Option<CommandLine> {
		let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
		if fields.is_empty() {
			None
		} else {
			Some(CommandLine { fields })
		}
	}

	pub fn name(&self) -> &str {
		&self.fields[0]
	}

	pub fn args(&self) -> &[String] {
		&self.fields[1..]
	}

	pub fn fields(&self) -> &[String] {
		&self.fields
	}
}
