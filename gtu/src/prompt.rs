//! Yes/no confirmation before applying updates

use std::io::{self, BufRead, Write};

use tracing::debug;

/// Asks the user a yes/no question
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Prompt on a writer and read the answer from a reader (stdout/stdin by default)
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        debug!(%question, "Prompt::confirm: called");
        write!(self.writer, "{} (y/n): ", question)?;
        self.writer.flush()?;

        let mut answer = String::new();
        let read = self.reader.read_line(&mut answer)?;
        if read == 0 {
            debug!("Prompt::confirm: EOF, treating as no");
            writeln!(self.writer)?;
            return Ok(false);
        }

        Ok(is_yes(&answer))
    }
}

/// Answers yes without asking (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        debug!(%question, "AssumeYes::confirm: called");
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
