pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod object;

use std::rc::Rc;

use monkey_lang_core::ast::Program;

pub use environment::Environment;
pub use object::{EvaluationError, Object};

/// Evaluates `program` against `environment`. Bindings made by the program
/// stay in `environment`, including those made before an error.
pub fn evaluate(
    program: &Program,
    environment: &mut Environment,
) -> Result<Rc<Object>, EvaluationError> {
    evaluator::eval_program(program, environment)
}
