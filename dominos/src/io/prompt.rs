//! Line-oriented interactive prompting.
//!
//! [`Prompter`] owns an input source and an output sink so commands can be
//! driven from a real terminal or from in-memory buffers in tests. All
//! user-facing command output goes through [`Prompter::say`].

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::error::CliError;

/// Prompt/validate/retry loop over a line-based input.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process terminal.
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line of output.
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<(), CliError> {
        writeln!(self.output, "{}", line.as_ref())
            .context("write output")
            .map_err(CliError::Input)
    }

    /// Ask `question` until `validator` accepts the answer.
    ///
    /// Rejections print `✗ <reason>` and re-ask with no retry limit. Closed
    /// input is an error since no further answer can ever arrive.
    pub fn ask<F>(&mut self, question: &str, validator: F) -> Result<String, CliError>
    where
        F: Fn(&str) -> Result<(), String>,
    {
        loop {
            let answer = self.read_answer(question)?;
            match validator(&answer) {
                Ok(()) => return Ok(answer),
                Err(reason) => {
                    debug!(question, %reason, "answer rejected");
                    self.say(format!("✗ {reason}"))?;
                }
            }
        }
    }

    /// Ask `question` once and accept any answer.
    pub fn ask_free(&mut self, question: &str) -> Result<String, CliError> {
        self.read_answer(question)
    }

    /// Output sink, for callers that render multi-line blocks.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Split back into input and output (tests inspect the output).
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_answer(&mut self, question: &str) -> Result<String, CliError> {
        self.write_question(question).map_err(CliError::Input)?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("read answer")
            .map_err(CliError::Input)?;
        if read == 0 {
            return Err(CliError::Input(anyhow!("input closed while waiting for an answer")));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn write_question(&mut self, question: &str) -> Result<()> {
        write!(self.output, "{question}").context("write prompt")?;
        self.output.flush().context("flush prompt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_rules::validate_phone;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        let (_, output) = prompter.into_parts();
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn ask_reprompts_until_valid() {
        let mut prompter = prompter("abc\n555\n555-123-4567\n");
        let answer = prompter.ask("Phone: ", validate_phone).expect("answer");
        assert_eq!(answer, "555-123-4567");

        let output = output_of(prompter);
        assert_eq!(output.matches("Phone: ").count(), 3);
        assert_eq!(output.matches("✗ Invalid phone number").count(), 2);
    }

    #[test]
    fn ask_free_accepts_empty_answer() {
        let mut prompter = prompter("\r\n");
        assert_eq!(prompter.ask_free("Last Name: ").expect("answer"), "");
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut prompter = prompter("abc\n");
        let err = prompter
            .ask("Phone: ", validate_phone)
            .expect_err("input closed");
        assert!(matches!(err, CliError::Input(_)));
    }

    #[test]
    fn answer_without_trailing_newline_is_read() {
        let mut prompter = prompter("y");
        assert_eq!(prompter.ask_free("Continue? ").expect("answer"), "y");
    }
}
