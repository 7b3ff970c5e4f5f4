//! Parser for class-declaration source files.
//!
//! Only declaration headers are interpreted. A file is a sequence of
//! `parcel Name;` directives and class declarations:
//!
//! ```text
//! public final class Zoo::Dog cnick Dog inherits Zoo::Animal { ... }
//! ```
//!
//! Class bodies are skipped as balanced braces.

use tracing::trace;

use crate::arena::MemArena;
use crate::error::CoreError;
use crate::lexer::{LexError, Token, TokenKind, lex};
use crate::naming::{NAMESPACE_SEPARATOR, class_name_to_path, last_segment};

/// One class declaration as written in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub is_final: bool,
    pub cnick: String,
    /// Parcel-qualified struct symbol, e.g. `zoo_Dog`.
    pub struct_sym: String,
    /// Generated header path used for includes, e.g. `Zoo/Dog.h`.
    pub include_h: String,
}

/// The declarations found in one source file, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub source_class: String,
    pub classes: Vec<ClassDecl>,
}

/// State threaded through every parse call.
///
/// The text of the file being parsed is copied into the context's arena and
/// lives there until the next call.
#[derive(Debug)]
pub struct ParseContext {
    arena: MemArena,
    output_extension: String,
    parcel: Option<String>,
    source_class: Option<String>,
}

impl ParseContext {
    pub fn new(arena_capacity: usize, output_extension: impl Into<String>) -> Self {
        Self {
            arena: MemArena::new(arena_capacity),
            output_extension: output_extension.into(),
            parcel: None,
            source_class: None,
        }
    }

    /// Parcel declared most recently in the current file, if any.
    pub fn parcel(&self) -> Option<&str> {
        self.parcel.as_deref()
    }

    /// Source class of the file currently (or most recently) parsed.
    pub fn source_class(&self) -> Option<&str> {
        self.source_class.as_deref()
    }

    pub fn parse_file(
        &mut self,
        content: &str,
        source_class: &str,
    ) -> Result<ParsedFile, CoreError> {
        self.arena.reset();
        self.parcel = None;
        self.source_class = Some(source_class.to_string());

        let parse_error = |message: String| CoreError::Parse {
            source_class: source_class.to_string(),
            message,
        };
        let source = self.arena.alloc_str(content)?;
        let tokens = lex(source).map_err(|LexError { position, message }| {
            parse_error(format!("{message} at byte {position}"))
        })?;

        let mut parser = Parser {
            source,
            tokens: &tokens,
            position: 0,
            source_class,
            output_extension: &self.output_extension,
            parcel: &mut self.parcel,
        };
        let classes = parser.parse_items().map_err(parse_error)?;
        trace!(source_class, classes = classes.len(), "parsed file");

        Ok(ParsedFile {
            source_class: source_class.to_string(),
            classes,
        })
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(0, "h")
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    position: usize,
    source_class: &'a str,
    output_extension: &'a str,
    parcel: &'a mut Option<String>,
}

impl<'a> Parser<'a> {
    fn parse_items(&mut self) -> Result<Vec<ClassDecl>, String> {
        let mut classes = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => return Ok(classes),
                TokenKind::Parcel => self.parse_parcel()?,
                TokenKind::Public
                | TokenKind::Private
                | TokenKind::Final
                | TokenKind::Abstract
                | TokenKind::Inert
                | TokenKind::Class => classes.push(self.parse_class()?),
                _ => return Err(self.error("expected class or parcel declaration")),
            }
        }
    }

    fn parse_parcel(&mut self) -> Result<(), String> {
        self.expect(TokenKind::Parcel, "'parcel'")?;
        let name = self.parse_qualified_name()?;
        self.expect(TokenKind::Semi, "';'")?;
        *self.parcel = Some(name);
        Ok(())
    }

    fn parse_class(&mut self) -> Result<ClassDecl, String> {
        let mut is_final = false;
        loop {
            match self.peek().kind {
                TokenKind::Final => is_final = true,
                TokenKind::Public | TokenKind::Private | TokenKind::Abstract | TokenKind::Inert => {}
                _ => break,
            }
            self.position += 1;
        }
        self.expect(TokenKind::Class, "'class'")?;
        let name = self.parse_qualified_name()?;

        let mut cnick = None;
        if self.eat(TokenKind::Cnick) {
            let token = self.expect(TokenKind::Ident, "class nickname")?;
            cnick = Some(token.text(self.source).to_string());
        }
        let parent = if self.eat(TokenKind::Inherits) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        self.skip_body()?;
        self.eat(TokenKind::Semi);

        let struct_name = last_segment(&name);
        let prefix = self
            .parcel
            .as_deref()
            .map(|parcel| format!("{}_", last_segment(parcel).to_lowercase()))
            .unwrap_or_default();
        Ok(ClassDecl {
            struct_sym: format!("{prefix}{struct_name}"),
            cnick: cnick.unwrap_or_else(|| struct_name.to_string()),
            include_h: format!(
                "{}.{}",
                class_name_to_path(self.source_class),
                self.output_extension
            ),
            name,
            parent,
            is_final,
        })
    }

    fn parse_qualified_name(&mut self) -> Result<String, String> {
        let first = self.expect(TokenKind::Ident, "identifier")?;
        let mut name = first.text(self.source).to_string();
        while self.eat(TokenKind::DoubleColon) {
            let segment = self.expect(TokenKind::Ident, "identifier after '::'")?;
            name.push_str(NAMESPACE_SEPARATOR);
            name.push_str(segment.text(self.source));
        }
        Ok(name)
    }

    fn skip_body(&mut self) -> Result<(), String> {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.peek();
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    return Err(format!(
                        "unterminated class body opened at byte {}",
                        open.start
                    ));
                }
                _ => {}
            }
            self.position += 1;
        }
        Ok(())
    }

    fn peek(&self) -> Token {
        // The token list always ends with Eof and parsing never moves past it.
        self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, String> {
        let token = self.peek();
        if token.kind == kind {
            self.position += 1;
            Ok(token)
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    fn error(&self, message: &str) -> String {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", token.text(self.source)),
        };
        format!("{message}, found {found} at byte {}", token.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str, source_class: &str) -> Result<ParsedFile, CoreError> {
        ParseContext::default().parse_file(content, source_class)
    }

    #[test]
    fn parses_root_class() {
        let file = parse("class Animal { }", "Animal").expect("parse");
        assert_eq!(file.source_class, "Animal");
        assert_eq!(
            file.classes,
            vec![ClassDecl {
                name: "Animal".to_string(),
                parent: None,
                is_final: false,
                cnick: "Animal".to_string(),
                struct_sym: "Animal".to_string(),
                include_h: "Animal.h".to_string(),
            }]
        );
    }

    #[test]
    fn parses_parcel_parent_and_modifiers() {
        let source = r#"
            parcel Zoo;

            /** A loyal animal. */
            public final class Zoo::Mammal::Dog cnick Dg
                inherits Zoo::Animal {

                int32_t legs;

                public void
                Bark(Dog *self, const char *sound = "woof");

                inert Dog*
                new() { }
            };
        "#;
        let file = parse(source, "Zoo::Mammal::Dog").expect("parse");
        let dog = &file.classes[0];
        assert_eq!(dog.name, "Zoo::Mammal::Dog");
        assert_eq!(dog.parent.as_deref(), Some("Zoo::Animal"));
        assert!(dog.is_final);
        assert_eq!(dog.cnick, "Dg");
        assert_eq!(dog.struct_sym, "zoo_Dog");
        assert_eq!(dog.include_h, "Zoo/Mammal/Dog.h");
    }

    #[test]
    fn parses_several_classes_per_file() {
        let source = "class Shape {} class Shape::Circle inherits Shape {}";
        let file = parse(source, "Shape").expect("parse");
        let names: Vec<_> = file.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Shape", "Shape::Circle"]);
        assert!(file.classes.iter().all(|c| c.include_h == "Shape.h"));
    }

    #[test]
    fn parcel_does_not_leak_between_files() {
        let mut context = ParseContext::default();
        context
            .parse_file("parcel Zoo; class Zoo::Animal {}", "Zoo::Animal")
            .expect("parse");
        assert_eq!(context.parcel(), Some("Zoo"));
        let file = context
            .parse_file("class Plant {}", "Plant")
            .expect("parse");
        assert_eq!(context.parcel(), None);
        assert_eq!(context.source_class(), Some("Plant"));
        assert_eq!(file.classes[0].struct_sym, "Plant");
    }

    #[test]
    fn empty_file_has_no_classes() {
        let file = parse("// nothing here\n", "Empty").expect("parse");
        assert!(file.classes.is_empty());
    }

    #[test]
    fn reports_unterminated_body() {
        let err = parse("class Animal { void eat();", "Animal").unwrap_err();
        match err {
            CoreError::Parse {
                source_class,
                message,
            } => {
                assert_eq!(source_class, "Animal");
                assert!(message.contains("unterminated class body"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_garbage_at_top_level() {
        let err = parse("int x;", "Broken").unwrap_err();
        match err {
            CoreError::Parse { message, .. } => {
                assert!(message.contains("expected class or parcel declaration"));
                assert!(message.contains("at byte 0"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_missing_parent_name() {
        let err = parse("class Dog inherits {}", "Dog").unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }

    #[test]
    fn file_larger_than_arena_fails() {
        let mut context = ParseContext::new(8, "h");
        let err = context
            .parse_file("class Animal {}", "Animal")
            .unwrap_err();
        assert!(matches!(err, CoreError::ArenaExhausted { .. }));
    }
}
