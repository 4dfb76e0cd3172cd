use std::io::Write;
use std::rc::Rc;

use monkey_lang_interpreter::{EvaluationError, Object};

/// Renders session output. Generic over the sink so the exact text can be
/// checked against a buffer.
pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn greeting(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "Hello! This is the Monkey programming language!")?;
        writeln!(self.out, "Feel free to type in commands")?;
        self.out.flush()
    }

    pub fn parser_errors(&mut self, diagnostics: &[String]) -> std::io::Result<()> {
        write!(self.out, "Ran into some parser errors\nparser errors:\n")?;
        for diagnostic in diagnostics {
            writeln!(self.out, "\t{}", diagnostic)?;
        }
        self.out.flush()
    }

    pub fn result(&mut self, result: &Result<Rc<Object>, EvaluationError>) -> std::io::Result<()> {
        match result {
            Ok(object) => writeln!(self.out, "{}", object)?,
            Err(err) => writeln!(self.out, "ERROR: {}", err)?,
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
