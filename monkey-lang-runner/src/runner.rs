use std::io::Write;
use std::path::Path;

use log::{debug, info};
use monkey_lang_interpreter::Environment;

use crate::error::RunnerError;
use crate::repl::Printer;

/// Parses and evaluates `source` once. Returns whether it ran without parser
/// or evaluation errors.
pub fn execute<W: Write>(source: &str, printer: &mut Printer<W>) -> std::io::Result<bool> {
    let (program, diagnostics) = monkey_lang_core::parse(source);
    if !diagnostics.is_empty() {
        printer.parser_errors(&diagnostics)?;
        return Ok(false);
    }
    debug!("parsed {} statements", program.statements.len());
    if program.statements.is_empty() {
        return Ok(true);
    }

    let result = monkey_lang_interpreter::evaluate(&program, &mut Environment::new());
    printer.result(&result)?;
    Ok(result.is_ok())
}

pub fn execute_file(path: &Path) -> Result<bool, RunnerError> {
    info!("running {}", path.display());
    let source = std::fs::read_to_string(path).map_err(|source| RunnerError::ReadScript {
        path: path.to_owned(),
        source,
    })?;
    Ok(execute(&source, &mut Printer::new(std::io::stdout()))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_execution(inputs: Vec<(&str, bool, &str)>) {
        for (input, succeeded, expected) in inputs {
            let mut printer = Printer::new(Vec::new());
            let result = execute(input, &mut printer).expect("writing to a buffer");
            let output = String::from_utf8(printer.into_inner()).expect("utf-8 output");

            assert_eq!((result, output.as_str()), (succeeded, expected), "{}", input);
        }
    }

    #[test]
    fn test_execute() {
        let inputs = vec![
            ("let a = 2; a * 21", true, "42\n"),
            ("", true, ""),
            ("\"a\" + \"b\"", true, "ab\n"),
            ("1 + true", false, "ERROR: type mismatch: INTEGER + BOOLEAN\n"),
            (
                "let 5;",
                false,
                "Ran into some parser errors\nparser errors:\n\
                 \texpected next token to be IDENT, got INT instead\n",
            ),
        ];

        test_execution(inputs);
    }

    #[test]
    fn test_missing_file() {
        let result = execute_file(Path::new("does/not/exist.monkey"));
        assert!(matches!(result, Err(RunnerError::ReadScript { .. })));
    }
}
