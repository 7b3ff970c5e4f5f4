//! Lexer for class-declaration source files.

/// Kind of a token produced by the lexer.
///
/// Only the declaration header needs real structure. Anything inside a
/// class body is lexed just well enough for the parser to skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Special
    Eof,

    // Identifiers and literals
    Ident,
    IntLiteral,
    StringLiteral,

    // Punctuation
    LBrace,      // {
    RBrace,      // }
    Semi,        // ;
    DoubleColon, // ::
    /// Any other single character, e.g. `(`, `*` or `,` in a method signature.
    Punct,

    // Keywords
    Parcel,
    Class,
    Inherits,
    Cnick,
    Public,
    Private,
    Final,
    Abstract,
    Inert,
}

/// A single token: its kind plus byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.start..self.end]
    }
}

/// Lexing failure with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub position: usize,
    pub message: &'static str,
}

/// Lex a source string into tokens, always ending with [`TokenKind::Eof`].
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        source,
        chars: source.as_bytes(),
        index: 0,
    };
    lexer.run()
}

struct Lexer<'src> {
    source: &'src str,
    chars: &'src [u8],
    index: usize,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) {
                self.consume_char();
                continue;
            }

            let start = self.index;
            let token = match ch {
                b'/' if self.peek_next() == Some(b'/') => {
                    self.skip_line_comment();
                    continue;
                }
                b'/' if self.peek_next() == Some(b'*') => {
                    self.skip_block_comment(start)?;
                    continue;
                }
                b'{' => {
                    self.consume_char();
                    self.simple_token(TokenKind::LBrace, start)
                }
                b'}' => {
                    self.consume_char();
                    self.simple_token(TokenKind::RBrace, start)
                }
                b';' => {
                    self.consume_char();
                    self.simple_token(TokenKind::Semi, start)
                }
                b':' => {
                    self.consume_char();
                    if self.peek_char() == Some(b':') {
                        self.consume_char();
                        self.simple_token(TokenKind::DoubleColon, start)
                    } else {
                        self.simple_token(TokenKind::Punct, start)
                    }
                }
                b'"' | b'\'' => self.lex_quoted(ch, start)?,
                b'0'..=b'9' => self.lex_number(start),
                _ if is_ident_start(ch) => self.lex_ident_or_keyword(start),
                _ if ch.is_ascii() => {
                    self.consume_char();
                    self.simple_token(TokenKind::Punct, start)
                }
                _ => {
                    return Err(LexError {
                        position: start,
                        message: "unexpected character",
                    });
                }
            };
            tokens.push(token);
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            start: self.chars.len(),
            end: self.chars.len(),
        });
        Ok(tokens)
    }

    fn simple_token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.index,
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == b'\n' {
                break;
            }
            self.consume_char();
        }
    }

    fn skip_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        self.consume_char(); // '/'
        self.consume_char(); // '*'
        while let Some(ch) = self.peek_char() {
            if ch == b'*' && self.peek_next() == Some(b'/') {
                self.consume_char();
                self.consume_char();
                return Ok(());
            }
            self.consume_char();
        }
        Err(LexError {
            position: start,
            message: "unterminated block comment",
        })
    }

    fn lex_quoted(&mut self, quote: u8, start: usize) -> Result<Token, LexError> {
        self.consume_char();
        while let Some(ch) = self.peek_char() {
            match ch {
                b'\\' => {
                    self.consume_char();
                    if self.peek_char().is_some() {
                        self.consume_char();
                    }
                }
                _ if ch == quote => {
                    self.consume_char();
                    return Ok(self.simple_token(TokenKind::StringLiteral, start));
                }
                _ => self.consume_char(),
            }
        }
        Err(LexError {
            position: start,
            message: "unterminated string literal",
        })
    }

    fn lex_number(&mut self, start: usize) -> Token {
        // Covers hex and suffixed literals such as 0x10 or 1.5f as well.
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'.' {
                self.consume_char();
            } else {
                break;
            }
        }
        self.simple_token(TokenKind::IntLiteral, start)
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.consume_char();
            } else {
                break;
            }
        }

        let kind = match &self.source[start..self.index] {
            "parcel" => TokenKind::Parcel,
            "class" => TokenKind::Class,
            "inherits" => TokenKind::Inherits,
            "cnick" => TokenKind::Cnick,
            "public" => TokenKind::Public,
            "private" => TokenKind::Private,
            "final" => TokenKind::Final,
            "abstract" => TokenKind::Abstract,
            "inert" => TokenKind::Inert,
            _ => TokenKind::Ident,
        };
        self.simple_token(kind, start)
    }

    fn peek_char(&self) -> Option<u8> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.chars.get(self.index + 1).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.chars.len() {
            self.index += 1;
        }
    }
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
