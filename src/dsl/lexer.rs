//! Lexer (tokenizer) for the circuit definition language.

use tracing::{debug, trace};

use crate::error::LexError;
use crate::names::{Name, Names};

use super::keywords::{Keyword, KEYWORDS};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column of the first character (1-indexed)
    pub column: usize,
    /// Length in characters
    pub len: usize,
}

impl Token {
    /// Interned id of a keyword or name token.
    pub fn id(&self) -> Option<Name> {
        match self.kind {
            TokenKind::Keyword(_, id) | TokenKind::Name(id) => Some(id),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(keyword, _) => Some(keyword),
            _ => None,
        }
    }

    pub fn is(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// Token types in the definition language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A reserved word, with its interned id
    Keyword(Keyword, Name),
    /// A user-defined name
    Name(Name),
    /// An unsigned integer literal
    Number(u64),
    /// A run of `_` and `-` characters
    Logic(String),
    /// `{`
    LeftCurly,
    /// `}`
    RightCurly,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `(`
    LeftBracket,
    /// `)`
    RightBracket,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// End of input
    Eof,
    /// A character no token can start with
    Error(char),
}

/// Lexer for tokenizing a definition file.
///
/// Keywords and names are interned into the shared [`Names`] table as they
/// are read. The keyword set itself is interned on construction so keywords
/// always hold the lowest ids.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    names: &'a mut Names,
    line: usize,
    column: usize,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str, names: &'a mut Names) -> Self {
        names.lookup(&KEYWORDS);
        Self {
            input,
            chars: input.char_indices().peekable(),
            names,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Get the next token. Once the input is exhausted every call returns
    /// [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;

        let Some(&(_, ch)) = self.chars.peek() else {
            return Token {
                kind: TokenKind::Eof,
                line,
                column,
                len: 0,
            };
        };

        let (kind, len) = match ch {
            _ if ch.is_alphabetic() => {
                let text = self.read_while(|c| c.is_alphanumeric() || c == '_');
                let id = self.names.lookup_one(text);
                let kind = match Keyword::from_name(text) {
                    Some(keyword) => TokenKind::Keyword(keyword, id),
                    None => TokenKind::Name(id),
                };
                (kind, text.chars().count())
            }
            '0'..='9' => {
                let text = self.read_while(|c| c.is_ascii_digit());
                // Out-of-range literals saturate and are rejected as properties.
                let value = text.parse::<u64>().unwrap_or(u64::MAX);
                (TokenKind::Number(value), text.len())
            }
            '-' | '_' => {
                let text = self.read_while(|c| c == '-' || c == '_');
                (TokenKind::Logic(text.to_string()), text.len())
            }
            _ => {
                self.advance();
                let kind = match ch {
                    '{' => TokenKind::LeftCurly,
                    '}' => TokenKind::RightCurly,
                    '=' => TokenKind::Equals,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    '(' => TokenKind::LeftBracket,
                    ')' => TokenKind::RightBracket,
                    ';' => TokenKind::Semicolon,
                    '.' => TokenKind::Dot,
                    _ => {
                        let error = LexError::InvalidCharacter { ch, line, column };
                        debug!(%error, "lexical error");
                        self.errors.push(error);
                        TokenKind::Error(ch)
                    }
                };
                (kind, 1)
            }
        };

        let token = Token {
            kind,
            line,
            column,
            len,
        };
        trace!(?token, "token");
        token
    }

    /// Lexical errors seen so far, in input order.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// The text of source line `line` (1-indexed), without its line ending.
    pub fn source_line(&self, line: usize) -> &'a str {
        self.input
            .lines()
            .nth(line.saturating_sub(1))
            .map(str::trim_end)
            .unwrap_or("")
    }

    /// A line with a single `^` marking `token`.
    ///
    /// The marker sits under the middle of a multi-character token, or one
    /// column past its end when `after` is set.
    pub fn caret_line(token: &Token, after: bool) -> String {
        let column = if after {
            token.column + token.len
        } else {
            token.column + token.len.saturating_sub(1) - token.len / 2
        };
        format!("{}^", " ".repeat(column.saturating_sub(1)))
    }

    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.chars.peek().map_or(input.len(), |&(pos, _)| pos);
        while let Some(&(_, ch)) = self.chars.peek() {
            if !keep(ch) {
                break;
            }
            self.advance();
        }
        let end = self.chars.peek().map_or(input.len(), |&(pos, _)| pos);
        &input[start..end]
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                // Comments run to the next '#', or to end of file
                self.advance();
                while let Some(c) = self.advance() {
                    if c == '#' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> (Vec<TokenKind>, Names) {
        let mut names = Names::new();
        let mut kinds = Vec::new();
        {
            let mut lexer = Lexer::new(input, &mut names);
            loop {
                let token = lexer.next_token();
                let done = token.is_eof();
                kinds.push(token.kind);
                if done {
                    break;
                }
            }
        }
        (kinds, names)
    }

    #[test]
    fn test_lexer_basic() {
        let mut names = Names::new();
        let mut lexer = Lexer::new("DEVICES {", &mut names);

        let tok = lexer.next_token();
        assert_eq!(tok.keyword(), Some(Keyword::Devices));
        let id = tok.id().unwrap();

        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::LeftCurly);
        assert_eq!(tok.id(), None);

        assert!(lexer.next_token().is_eof());
        assert!(lexer.next_token().is_eof());
        assert_eq!(names.get_name_string(id), Some("DEVICES"));
    }

    #[test]
    fn test_keywords_interned_first() {
        let mut names = Names::new();
        let mut lexer = Lexer::new("G1 END", &mut names);
        let g1 = lexer.next_token().id().unwrap();
        let end = lexer.next_token().id().unwrap();
        assert_eq!(end.as_raw(), 3);
        assert_eq!(g1.as_raw() as usize, KEYWORDS.len());
    }

    #[test]
    fn test_comments_are_invisible() {
        let (with, _) = tokens("A1 # a comment; with = symbols # = 3;");
        let (without, _) = tokens("A1 = 3;");
        assert_eq!(with, without);
    }

    #[test]
    fn test_unterminated_comment() {
        let (kinds, names) = tokens("SW1 # never closed = 1;");
        let sw1 = names.query("SW1").unwrap();
        assert_eq!(kinds, vec![TokenKind::Name(sw1), TokenKind::Eof]);
    }

    #[test]
    fn test_numbers_logic_and_punctuation() {
        let (kinds, _) = tokens("(cycle: 12) waveform:__--_ ;.,=}");
        assert!(matches!(kinds[0], TokenKind::LeftBracket));
        assert!(matches!(kinds[1], TokenKind::Keyword(Keyword::Cycle, _)));
        assert_eq!(kinds[2], TokenKind::Colon);
        assert_eq!(kinds[3], TokenKind::Number(12));
        assert_eq!(kinds[4], TokenKind::RightBracket);
        assert!(matches!(kinds[5], TokenKind::Keyword(Keyword::Waveform, _)));
        assert_eq!(kinds[7], TokenKind::Logic("__--_".to_string()));
        assert_eq!(
            &kinds[8..],
            &[
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Comma,
                TokenKind::Equals,
                TokenKind::RightCurly,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_name_with_underscore_and_digits() {
        let (kinds, names) = tokens("my_gate2.I12");
        let id = names.query("my_gate2").unwrap();
        assert_eq!(kinds[0], TokenKind::Name(id));
        assert_eq!(kinds[1], TokenKind::Dot);
        assert!(matches!(kinds[2], TokenKind::Keyword(Keyword::Input(12), _)));
    }

    #[test]
    fn test_invalid_character() {
        let mut names = Names::new();
        let mut lexer = Lexer::new("A\n  @ B", &mut names);
        lexer.next_token();
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Error('@'));
        assert_eq!((tok.line, tok.column), (2, 3));
        assert_eq!(
            lexer.errors(),
            &[LexError::InvalidCharacter {
                ch: '@',
                line: 2,
                column: 3
            }]
        );
        assert!(matches!(lexer.next_token().kind, TokenKind::Name(_)));
    }

    #[test]
    fn test_positions_with_crlf() {
        let mut names = Names::new();
        let mut lexer = Lexer::new("DEVICES {\r\n  SW1 = SWITCH;\r\n}", &mut names);
        lexer.next_token();
        lexer.next_token();
        let sw1 = lexer.next_token();
        assert_eq!((sw1.line, sw1.column, sw1.len), (2, 3, 3));
        assert_eq!(lexer.source_line(2), "  SW1 = SWITCH;");
        assert_eq!(lexer.source_line(1), "DEVICES {");
    }

    #[test]
    fn test_caret_line() {
        let token = Token {
            kind: TokenKind::Eof,
            line: 1,
            column: 3,
            len: 7,
        };
        assert_eq!(Lexer::caret_line(&token, false), "     ^");
        assert_eq!(Lexer::caret_line(&token, true), "         ^");

        let semicolon = Token {
            kind: TokenKind::Semicolon,
            line: 1,
            column: 5,
            len: 1,
        };
        assert_eq!(Lexer::caret_line(&semicolon, false), "    ^");
        assert_eq!(Lexer::caret_line(&semicolon, true), "     ^");
    }
}
