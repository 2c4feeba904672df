use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Asks the console for values the command line left out.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns `given` untouched, otherwise prints `question` and reads one line.
    /// A closed input yields an empty answer.
    pub(crate) fn value(&mut self, given: Option<String>, question: &str) -> io::Result<String> {
        if let Some(value) = given {
            return Ok(value);
        }

        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
