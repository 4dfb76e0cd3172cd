use std::rc::Rc;

use log::trace;

use crate::object::{BuiltinFunction, BuiltinResult, EvaluationError, Object};

fn check_argument_count(
    name: &'static str,
    want: usize,
    args: &[Rc<Object>],
) -> Result<(), EvaluationError> {
    if args.len() != want {
        return Err(EvaluationError::BuiltinArgumentCount {
            name,
            got: args.len(),
            want,
        });
    }
    Ok(())
}

fn unsupported_argument(name: &'static str, arg: &Object) -> EvaluationError {
    EvaluationError::BuiltinArgumentType {
        name,
        got: arg.object_type(),
    }
}

fn builtin_len(args: &[Rc<Object>]) -> BuiltinResult {
    check_argument_count("len", 1, args)?;
    match args[0].as_ref() {
        Object::String(s) => Ok(Object::integer(s.chars().count() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(unsupported_argument("len", other)),
    }
}

fn builtin_first(args: &[Rc<Object>]) -> BuiltinResult {
    check_argument_count("first", 1, args)?;
    match args[0].as_ref() {
        Object::Array(arr) => Ok(arr.first().cloned().unwrap_or_else(Object::null)),
        other => Err(unsupported_argument("first", other)),
    }
}

fn builtin_last(args: &[Rc<Object>]) -> BuiltinResult {
    check_argument_count("last", 1, args)?;
    match args[0].as_ref() {
        Object::Array(arr) => Ok(arr.last().cloned().unwrap_or_else(Object::null)),
        other => Err(unsupported_argument("last", other)),
    }
}

fn builtin_rest(args: &[Rc<Object>]) -> BuiltinResult {
    check_argument_count("rest", 1, args)?;
    match args[0].as_ref() {
        Object::Array(arr) => Ok(Object::array(arr.iter().skip(1).cloned().collect())),
        other => Err(unsupported_argument("rest", other)),
    }
}

fn builtin_push(args: &[Rc<Object>]) -> BuiltinResult {
    check_argument_count("push", 2, args)?;
    match args[0].as_ref() {
        Object::Array(arr) => {
            let mut new_arr = arr.clone();
            new_arr.push(args[1].clone());
            Ok(Object::array(new_arr))
        }
        other => Err(unsupported_argument("push", other)),
    }
}

/// One line per argument, in display form.
fn puts_output(args: &[Rc<Object>]) -> String {
    args.iter().map(|arg| format!("{}\n", arg)).collect()
}

fn builtin_puts(args: &[Rc<Object>]) -> BuiltinResult {
    print!("{}", puts_output(args));
    Ok(Object::null())
}

/// The fixed table of functions available in every program. User bindings
/// shadow these.
pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    let builtin = match name {
        "len" => BuiltinFunction {
            name: "len",
            func: builtin_len,
        },
        "first" => BuiltinFunction {
            name: "first",
            func: builtin_first,
        },
        "last" => BuiltinFunction {
            name: "last",
            func: builtin_last,
        },
        "rest" => BuiltinFunction {
            name: "rest",
            func: builtin_rest,
        },
        "push" => BuiltinFunction {
            name: "push",
            func: builtin_push,
        },
        "puts" => BuiltinFunction {
            name: "puts",
            func: builtin_puts,
        },
        _ => return None,
    };
    trace!("resolved builtin `{}`", builtin.name);
    Some(builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    fn call(name: &str, args: Vec<Rc<Object>>) -> BuiltinResult {
        let builtin = lookup(name).expect("known builtin");
        (builtin.func)(&args)
    }

    #[test]
    fn test_len() {
        assert_eq!(
            call("len", vec![]),
            Err(EvaluationError::BuiltinArgumentCount {
                name: "len",
                got: 0,
                want: 1
            })
        );

        let too_many_arguments = call(
            "len",
            vec![
                Object::string("hello".to_owned()),
                Object::string("world".to_owned()),
            ],
        );
        assert_eq!(
            too_many_arguments.map_err(|err| err.to_string()),
            Err("wrong number of arguments for len. got=2, want=1".to_owned())
        );

        assert_eq!(call("len", vec![Object::array(vec![])]), Ok(Object::integer(0)));
        assert_eq!(
            call(
                "len",
                vec![Object::array(vec![
                    Object::string("hello".to_owned()),
                    Object::string("world".to_owned()),
                ])]
            ),
            Ok(Object::integer(2))
        );
        assert_eq!(
            call("len", vec![Object::string("hello".to_owned())]),
            Ok(Object::integer(5))
        );
        assert_eq!(
            call("len", vec![Object::string("héllo".to_owned())]),
            Ok(Object::integer(5))
        );
        assert_eq!(
            call("len", vec![Object::integer(42)]).map_err(|err| err.to_string()),
            Err("argument to `len` not supported, got=INTEGER".to_owned())
        );
    }

    #[test]
    fn test_first_and_last() {
        let arr = Object::array(vec![Object::integer(1), Object::integer(2), Object::integer(3)]);

        assert_eq!(call("first", vec![arr.clone()]), Ok(Object::integer(1)));
        assert_eq!(call("last", vec![arr]), Ok(Object::integer(3)));
        assert_eq!(call("first", vec![Object::array(vec![])]), Ok(Object::null()));
        assert_eq!(call("last", vec![Object::array(vec![])]), Ok(Object::null()));
        assert_eq!(
            call("first", vec![Object::string("abc".to_owned())]),
            Err(EvaluationError::BuiltinArgumentType {
                name: "first",
                got: ObjectType::String
            })
        );
        assert_eq!(
            call("last", vec![]),
            Err(EvaluationError::BuiltinArgumentCount {
                name: "last",
                got: 0,
                want: 1
            })
        );
    }

    #[test]
    fn test_rest_does_not_mutate() {
        let arr = Object::array(vec![Object::integer(1), Object::integer(2), Object::integer(3)]);

        assert_eq!(
            call("rest", vec![arr.clone()]),
            Ok(Object::array(vec![Object::integer(2), Object::integer(3)]))
        );
        assert_eq!(arr.to_string(), "[1, 2, 3]");
        assert_eq!(
            call("rest", vec![Object::array(vec![])]),
            Ok(Object::array(vec![]))
        );
        assert_eq!(
            call("rest", vec![Object::integer(1)]).map_err(|err| err.to_string()),
            Err("argument to `rest` not supported, got=INTEGER".to_owned())
        );
    }

    #[test]
    fn test_push_does_not_mutate() {
        let empty = Object::array(vec![]);

        assert_eq!(
            call("push", vec![empty.clone(), Object::integer(1)]),
            Ok(Object::array(vec![Object::integer(1)]))
        );
        assert_eq!(empty, Object::array(vec![]));
        assert_eq!(
            call("push", vec![empty]).map_err(|err| err.to_string()),
            Err("wrong number of arguments for push. got=1, want=2".to_owned())
        );
        assert_eq!(
            call("push", vec![Object::null(), Object::integer(1)]).map_err(|err| err.to_string()),
            Err("argument to `push` not supported, got=NULL".to_owned())
        );
    }

    #[test]
    fn test_puts_returns_null() {
        assert_eq!(call("puts", vec![]), Ok(Object::null()));
        assert_eq!(
            call("puts", vec![Object::string("hello".to_owned()), Object::integer(1)]),
            Ok(Object::null())
        );
    }

    #[test]
    fn test_puts_output() {
        let inputs = vec![
            (vec![], ""),
            (vec![Object::string("hello".to_owned())], "hello\n"),
            (
                vec![
                    Object::integer(1),
                    Object::array(vec![Object::boolean(true), Object::string("a".to_owned())]),
                    Object::null(),
                ],
                "1\n[true, a]\nnull\n",
            ),
            (
                vec![Object::builtin_function(lookup("len").expect("known builtin"))],
                "builtin function: len\n",
            ),
        ];

        for (args, expected) in inputs {
            assert_eq!(puts_output(&args), expected);
        }
    }

    #[test]
    fn test_lookup() {
        for name in ["len", "first", "last", "rest", "push", "puts"] {
            assert_eq!(lookup(name).map(|builtin| builtin.name), Some(name));
        }
        assert!(lookup("map").is_none());
    }
}
