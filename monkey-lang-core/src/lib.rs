pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

/// Tokenizes and parses `source`. The program holds every statement that
/// parsed cleanly; the second element lists the diagnostics for the rest.
/// Callers must not evaluate the program while diagnostics are pending.
pub fn parse(source: &str) -> (ast::Program, Vec<String>) {
    let mut parser = parser::Parser::new(lexer::Tokenizer::new(source));
    let program = parser.parse_program();
    let diagnostics = parser.errors().iter().map(|err| err.to_string()).collect();
    (program, diagnostics)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_parse() {
        let (program, diagnostics) = super::parse("let x = 1 + 2; x");
        assert!(diagnostics.is_empty());
        assert_eq!(program.to_string(), "let x = (1 + 2);\nx;\n");

        let (program, diagnostics) = super::parse("let x 1; let y = 2;");
        assert_eq!(
            diagnostics,
            vec!["expected next token to be =, got INT instead".to_owned()]
        );
        assert_eq!(program.statements.len(), 1);
    }
}
