mod printer;
mod reader;

use std::io::Write;

use log::debug;
use monkey_lang_interpreter::Environment;

pub use printer::Printer;
use reader::{ReadOutput, Reader};

use crate::error::RunnerError;

/// One interactive session. Bindings persist from line to line.
struct Repl<W: Write> {
    reader: Reader,
    environment: Environment,
    printer: Printer<W>,
}

impl<W: Write> Repl<W> {
    fn run(mut self) -> Result<(), RunnerError> {
        self.printer.greeting()?;
        loop {
            let line = match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Line(line) => line,
            };
            eval_line(&line, &mut self.environment, &mut self.printer)?;
        }
        Ok(())
    }
}

/// Parses and evaluates one line of input, printing diagnostics, the value
/// or the error. A line without statements prints nothing.
pub fn eval_line<W: Write>(
    line: &str,
    environment: &mut Environment,
    printer: &mut Printer<W>,
) -> std::io::Result<()> {
    let (program, diagnostics) = monkey_lang_core::parse(line);
    if !diagnostics.is_empty() {
        debug!("skipping evaluation, {} parser errors", diagnostics.len());
        return printer.parser_errors(&diagnostics);
    }
    if program.statements.is_empty() {
        return Ok(());
    }
    let result = monkey_lang_interpreter::evaluate(&program, environment);
    printer.result(&result)
}

pub fn start() -> Result<(), RunnerError> {
    Repl {
        reader: Reader::new()?,
        environment: Environment::new(),
        printer: Printer::new(std::io::stdout()),
    }
    .run()
}
