use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::environment::Environment;
use monkey_lang_core::ast;

use thiserror::Error;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Rc<Object>>),
    Hash(HashMap<HashKey, HashPair>),
    Function(Function),
    BuiltinFunction(BuiltinFunction),
    Null,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    Null,
}

thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    /// Always one of the two shared boolean instances.
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Rc<Object> {
        Rc::new(Object::Integer(value))
    }
    pub fn string(value: String) -> Rc<Object> {
        Rc::new(Object::String(value))
    }
    pub fn array(array: Vec<Rc<Object>>) -> Rc<Object> {
        Rc::new(Object::Array(array))
    }
    pub fn hash(hash: HashMap<HashKey, HashPair>) -> Rc<Object> {
        Rc::new(Object::Hash(hash))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        environment: Environment,
    ) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            parameters,
            body,
            environment,
        }))
    }
    pub fn builtin_function(func: BuiltinFunction) -> Rc<Object> {
        Rc::new(Object::BuiltinFunction(func))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::BuiltinFunction(_) => ObjectType::Builtin,
            Object::Null => ObjectType::Null,
        }
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Null => "NULL",
        };
        write!(f, "{}", name)
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(arr) => {
                write!(f, "[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", obj)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, pair) in hash.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => write!(f, "{}", function),
            Object::BuiltinFunction(builtin) => write!(f, "builtin function: {}", builtin.name),
        }
    }
}

/// Comparable key of a hash entry. Only integers, booleans and strings can be
/// turned into one.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct HashPair {
    pub key: Rc<Object>,
    pub value: Rc<Object>,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64 bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

impl TryFrom<&Object> for HashKey {
    type Error = ObjectType;

    fn try_from(value: &Object) -> Result<Self, Self::Error> {
        match value {
            Object::Integer(int) => Ok(HashKey {
                object_type: ObjectType::Integer,
                value: *int as u64,
            }),
            Object::Boolean(bool) => Ok(HashKey {
                object_type: ObjectType::Boolean,
                value: u64::from(*bool),
            }),
            Object::String(str) => Ok(HashKey {
                object_type: ObjectType::String,
                value: fnv1a(str.as_bytes()),
            }),
            other => Err(other.object_type()),
        }
    }
}

pub fn object_to_key(object: &Rc<Object>) -> Result<HashKey, EvaluationError> {
    HashKey::try_from(object.as_ref()).map_err(EvaluationError::InvalidHashKey)
}

/// A user defined function together with the scope it was created in.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub environment: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && self.environment.ptr_eq(&other.environment)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fn({}) {}",
            self.parameters
                .iter()
                .map(|id| id.name.as_ref())
                .collect::<Box<[&str]>>()
                .join(", "),
            self.body
        )
    }
}

pub type BuiltinResult = Result<Rc<Object>, EvaluationError>;

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: fn(&[Rc<Object>]) -> BuiltinResult,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Early exits travelling up through `?`: a `return` statement or an error.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Rc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for QuickReturn {
    fn from(value: EvaluationError) -> Self {
        QuickReturn::Error(value)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("type mismatch: {left} {operation} {right}")]
    TypeMismatch {
        left: ObjectType,
        operation: ast::InfixOperationKind,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operation} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operation: ast::InfixOperationKind,
        right: ObjectType,
    },
    #[error("unknown operator: {operation}{right}")]
    UnknownPrefixOperator {
        operation: ast::PrefixOperationKind,
        right: ObjectType,
    },
    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("not a function: {0}")]
    CallNonFunction(ObjectType),
    #[error(
        "wrong number of arguments: expected ({}), got ({})",
        .parameters.join(", "),
        .arguments.join(", ")
    )]
    WrongArgumentCount {
        parameters: Vec<Rc<str>>,
        arguments: Vec<String>,
    },
    #[error("wrong number of arguments for {name}. got={got}, want={want}")]
    BuiltinArgumentCount {
        name: &'static str,
        got: usize,
        want: usize,
    },
    #[error("argument to `{name}` not supported, got={got}")]
    BuiltinArgumentType { name: &'static str, got: ObjectType },
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),
    #[error("array index must be INTEGER, got={0}")]
    IndexingWithNonInteger(ObjectType),
    #[error("{0} is not hashable")]
    InvalidHashKey(ObjectType),
}
