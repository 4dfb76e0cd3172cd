use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use crate::builtins;
use crate::environment::Environment;
use crate::object::{object_to_key, EvaluationError, HashPair, Object, QuickReturn};
use monkey_lang_core::ast;
use monkey_lang_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};

type EvalResult = Result<Rc<Object>, QuickReturn>;

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Evaluates every statement of `program` in order and returns the value of
/// the last one. A `return` at the top level ends the program with its value;
/// an error ends it with that error. Bindings made before an error are kept.
pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Rc<Object>, EvaluationError> {
    let mut output = Object::null();
    for statement in &program.statements {
        let result = eval_statement(statement, environment);

        match result {
            Err(QuickReturn::Return(value)) => return Ok(value),
            Err(QuickReturn::Error(error)) => return Err(error),
            Ok(object) => output = object,
        };
    }
    Ok(output)
}

fn eval_statement(statement: &ast::Statement, environment: &mut Environment) -> EvalResult {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(statement: &ast::LetStatement, environment: &mut Environment) -> EvalResult {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(statement.identifier.name.clone(), value.clone());
    Ok(value)
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> EvalResult {
    let value = match &statement.value {
        Some(value) => eval_expression(value, environment)?,
        None => Object::null(),
    };
    Err(QuickReturn::Return(value))
}

// A `return` inside the block is passed up unchanged so that it also leaves
// any enclosing blocks; only function application unwraps it.
fn eval_block_statement(block: &ast::BlockStatement, environment: &mut Environment) -> EvalResult {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

// Function calls and blocks all come back through here, so deep Monkey
// recursion grows the stack instead of overflowing it.
fn eval_expression(expression: &Expression, environment: &mut Environment) -> EvalResult {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        eval_expression_inner(expression, environment)
    })
}

fn eval_expression_inner(expression: &Expression, environment: &mut Environment) -> EvalResult {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
        Expression::ArrayLiteral(array) => Ok(Object::array(eval_expressions(array, environment)?)),
        Expression::HashLiteral(literal) => eval_hash_literal(literal, environment),
        Expression::Identifier(identifier) => eval_identifier(identifier, environment),
        Expression::PrefixOperation(kind, right) => {
            let right = eval_expression(right, environment)?;
            Ok(eval_prefix_operation(*kind, right)?)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            Ok(eval_infix_operation(*kind, left, right)?)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if condition.is_truthy() {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            Ok(apply_function(&function, arguments)?)
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            Ok(eval_index_expression(left, index)?)
        }
    }
}

fn eval_identifier(identifier: &ast::Identifier, environment: &Environment) -> EvalResult {
    if let Some(value) = environment.get(&identifier.name) {
        return Ok(value);
    }
    match builtins::lookup(&identifier.name) {
        Some(builtin) => Ok(Object::builtin_function(builtin)),
        None => Err(QuickReturn::Error(EvaluationError::UnknownIdentifier(
            identifier.name.clone(),
        ))),
    }
}

fn eval_expressions(
    expressions: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Rc<Object>>, QuickReturn> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        result.push(eval_expression(expression, environment)?);
    }
    Ok(result)
}

fn eval_hash_literal(
    literal: &[(Expression, Expression)],
    environment: &mut Environment,
) -> EvalResult {
    let mut hashmap = HashMap::with_capacity(literal.len());
    for (key, value) in literal {
        let key = eval_expression(key, environment)?;
        let hashed_key = object_to_key(&key)?;
        let value = eval_expression(value, environment)?;
        hashmap.insert(hashed_key, HashPair { key, value });
    }
    Ok(Object::hash(hashmap))
}

fn apply_function(
    function: &Rc<Object>,
    arguments: Vec<Rc<Object>>,
) -> Result<Rc<Object>, EvaluationError> {
    match function.as_ref() {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return Err(EvaluationError::WrongArgumentCount {
                    parameters: function
                        .parameters
                        .iter()
                        .map(|parameter| parameter.name.clone())
                        .collect(),
                    arguments: arguments.iter().map(|argument| argument.to_string()).collect(),
                });
            }
            trace!("applying {} with {} arguments", function, arguments.len());

            let mut new_environment = Environment::new_enclosed(&function.environment);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                new_environment.set(parameter.name.clone(), argument);
            }
            match eval_block_statement(&function.body, &mut new_environment) {
                Ok(value) => Ok(value),
                Err(QuickReturn::Return(value)) => Ok(value),
                Err(QuickReturn::Error(error)) => Err(error),
            }
        }
        Object::BuiltinFunction(builtin) => {
            trace!("calling builtin `{}`", builtin.name);
            (builtin.func)(&arguments)
        }
        other => Err(EvaluationError::CallNonFunction(other.object_type())),
    }
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (kind, right.as_ref()) {
        (PrefixOperationKind::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (PrefixOperationKind::Minus, other) => Err(EvaluationError::UnknownPrefixOperator {
            operation: kind,
            right: other.object_type(),
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: Rc<Object>,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_operation(kind, *l, *r),
        (Object::String(l), Object::String(r)) => match kind {
            InfixOperationKind::Plus => Ok(Object::string(format!("{}{}", l, r))),
            InfixOperationKind::Equal => Ok(Object::boolean(l == r)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(l != r)),
            _ => Err(unknown_infix_operator(kind, &left, &right)),
        },
        // Booleans are shared instances, so identity is equality.
        (Object::Boolean(_), Object::Boolean(_)) => match kind {
            InfixOperationKind::Equal => Ok(Object::boolean(Rc::ptr_eq(&left, &right))),
            InfixOperationKind::NotEqual => Ok(Object::boolean(!Rc::ptr_eq(&left, &right))),
            _ => Err(unknown_infix_operator(kind, &left, &right)),
        },
        (l, r) if l.object_type() != r.object_type() => Err(EvaluationError::TypeMismatch {
            left: l.object_type(),
            operation: kind,
            right: r.object_type(),
        }),
        _ => Err(unknown_infix_operator(kind, &left, &right)),
    }
}

fn unknown_infix_operator(
    kind: InfixOperationKind,
    left: &Rc<Object>,
    right: &Rc<Object>,
) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.object_type(),
        operation: kind,
        right: right.object_type(),
    }
}

fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Rc<Object>, EvaluationError> {
    let result = match kind {
        InfixOperationKind::Plus => Object::integer(left.wrapping_add(right)),
        InfixOperationKind::Minus => Object::integer(left.wrapping_sub(right)),
        InfixOperationKind::Multiply => Object::integer(left.wrapping_mul(right)),
        InfixOperationKind::Divide => {
            if right == 0 {
                return Err(EvaluationError::DivisionByZero(left));
            }
            Object::integer(left.wrapping_div(right))
        }
        InfixOperationKind::LessThan => Object::boolean(left < right),
        InfixOperationKind::GreaterThan => Object::boolean(left > right),
        InfixOperationKind::Equal => Object::boolean(left == right),
        InfixOperationKind::NotEqual => Object::boolean(left != right),
    };
    Ok(result)
}

fn eval_index_expression(
    left: Rc<Object>,
    index: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(array), Object::Integer(index)) => Ok(eval_array_index(array, *index)),
        (Object::Array(_), other) => Err(EvaluationError::IndexingWithNonInteger(
            other.object_type(),
        )),
        (Object::Hash(hash), _) => {
            let hashed_index = object_to_key(&index)?;
            Ok(hash
                .get(&hashed_index)
                .map(|pair| pair.value.clone())
                .unwrap_or_else(Object::null))
        }
        (other, _) => Err(EvaluationError::IndexNotSupported(other.object_type())),
    }
}

/// Negative indices count from the end. Anything still out of range is null.
fn eval_array_index(array: &[Rc<Object>], index: i64) -> Rc<Object> {
    let len = array.len() as i64;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        array[index as usize].clone()
    } else {
        Object::null()
    }
}
