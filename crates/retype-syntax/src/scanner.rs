//! Scanner with trivia attachment.
//!
//! Trivia (whitespace and comments) is never lost: every token records a
//! full span `[full_start, full_end)` around its text span `[start, end)`.
//! Leading trivia is everything from the previous token's full end; trailing
//! trivia runs to the end of the line, including the newline itself.
//! Invariant: tokens are contiguous over their full spans, so concatenating
//! full texts reproduces the source byte-for-byte.

use retype_common::Span;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    StringLiteral,

    // Keywords
    ClassKeyword,
    InterfaceKeyword,
    PublicKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    InternalKeyword,
    StaticKeyword,
    AsyncKeyword,
    AbstractKeyword,
    VirtualKeyword,
    OverrideKeyword,
    SealedKeyword,
    VoidKeyword,
    DynamicKeyword,
    IntKeyword,
    LongKeyword,
    DoubleKeyword,
    BoolKeyword,
    StringKeyword,
    ObjectKeyword,
    ReturnKeyword,
    NewKeyword,
    NullKeyword,
    TrueKeyword,
    FalseKeyword,

    // Punctuation
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    LessThan,
    GreaterThan,
    Comma,
    Semicolon,
    Dot,
    Equals,

    EndOfFile,
    Unknown,
}

impl TokenKind {
    /// Keywords that can begin a type reference.
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            TokenKind::VoidKeyword
                | TokenKind::DynamicKeyword
                | TokenKind::IntKeyword
                | TokenKind::LongKeyword
                | TokenKind::DoubleKeyword
                | TokenKind::BoolKeyword
                | TokenKind::StringKeyword
                | TokenKind::ObjectKeyword
        )
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::PublicKeyword
                | TokenKind::PrivateKeyword
                | TokenKind::ProtectedKeyword
                | TokenKind::InternalKeyword
                | TokenKind::StaticKeyword
                | TokenKind::AsyncKeyword
                | TokenKind::AbstractKeyword
                | TokenKind::VirtualKeyword
                | TokenKind::OverrideKeyword
                | TokenKind::SealedKeyword
        )
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "class" => TokenKind::ClassKeyword,
        "interface" => TokenKind::InterfaceKeyword,
        "public" => TokenKind::PublicKeyword,
        "private" => TokenKind::PrivateKeyword,
        "protected" => TokenKind::ProtectedKeyword,
        "internal" => TokenKind::InternalKeyword,
        "static" => TokenKind::StaticKeyword,
        "async" => TokenKind::AsyncKeyword,
        "abstract" => TokenKind::AbstractKeyword,
        "virtual" => TokenKind::VirtualKeyword,
        "override" => TokenKind::OverrideKeyword,
        "sealed" => TokenKind::SealedKeyword,
        "void" => TokenKind::VoidKeyword,
        "dynamic" => TokenKind::DynamicKeyword,
        "int" => TokenKind::IntKeyword,
        "long" => TokenKind::LongKeyword,
        "double" => TokenKind::DoubleKeyword,
        "bool" => TokenKind::BoolKeyword,
        "string" => TokenKind::StringKeyword,
        "object" => TokenKind::ObjectKeyword,
        "return" => TokenKind::ReturnKeyword,
        "new" => TokenKind::NewKeyword,
        "null" => TokenKind::NullKeyword,
        "true" => TokenKind::TrueKeyword,
        "false" => TokenKind::FalseKeyword,
        _ => return None,
    };
    Some(kind)
}

/// Index of a token in the tree's token list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TokenIndex(pub u32);

impl TokenIndex {
    pub const NONE: TokenIndex = TokenIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == TokenIndex::NONE
    }
}

/// A scanned token with its trivia bounds.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Start of leading trivia.
    pub full_start: u32,
    /// Start of the token text.
    pub start: u32,
    /// End of the token text.
    pub end: u32,
    /// End of trailing trivia.
    pub full_end: u32,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn full_span(&self) -> Span {
        Span::new(self.full_start, self.full_end)
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}

/// Single-pass scanner producing the full token list.
pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Scan the whole source. The final token is always `EndOfFile`, which
    /// owns any trailing trivia at the end of the file.
    pub fn scan_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn scan_token(&mut self) -> Token {
        let full_start = self.pos as u32;
        self.skip_trivia(true);
        let start = self.pos as u32;

        let kind = self.scan_text();
        let end = self.pos as u32;

        // Trailing trivia: to end of line, inclusive of the newline.
        if kind != TokenKind::EndOfFile {
            self.skip_trailing_trivia();
        }
        let full_end = self.pos as u32;

        Token {
            kind,
            full_start,
            start,
            end,
            full_end,
        }
    }

    fn scan_text(&mut self) -> TokenKind {
        let Some(&ch) = self.bytes.get(self.pos) else {
            return TokenKind::EndOfFile;
        };

        match ch {
            b'{' => self.single(TokenKind::OpenBrace),
            b'}' => self.single(TokenKind::CloseBrace),
            b'(' => self.single(TokenKind::OpenParen),
            b')' => self.single(TokenKind::CloseParen),
            b'<' => self.single(TokenKind::LessThan),
            b'>' => self.single(TokenKind::GreaterThan),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b'.' => self.single(TokenKind::Dot),
            b'=' => self.single(TokenKind::Equals),
            b'0'..=b'9' => {
                while self
                    .bytes
                    .get(self.pos)
                    .is_some_and(|b| b.is_ascii_digit())
                {
                    self.pos += 1;
                }
                TokenKind::IntLiteral
            }
            b'"' => {
                self.pos += 1;
                while let Some(&b) = self.bytes.get(self.pos) {
                    self.pos += 1;
                    if b == b'"' {
                        break;
                    }
                }
                TokenKind::StringLiteral
            }
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => {
                let start = self.pos;
                while self
                    .bytes
                    .get(self.pos)
                    .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
                {
                    self.pos += 1;
                }
                let text = &self.source[start..self.pos];
                keyword_kind(text).unwrap_or(TokenKind::Identifier)
            }
            _ => self.single(TokenKind::Unknown),
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    /// Skip whitespace and comments. When `include_newlines` is false the
    /// scan stops after consuming one line terminator (trailing trivia).
    fn skip_trivia(&mut self, include_newlines: bool) {
        loop {
            match self.bytes.get(self.pos) {
                Some(b' ' | b'\t') => self.pos += 1,
                Some(b'\r') => {
                    self.pos += 1;
                    if self.bytes.get(self.pos) == Some(&b'\n') {
                        self.pos += 1;
                    }
                    if !include_newlines {
                        return;
                    }
                }
                Some(b'\n') => {
                    self.pos += 1;
                    if !include_newlines {
                        return;
                    }
                }
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    while self
                        .bytes
                        .get(self.pos)
                        .is_some_and(|b| *b != b'\n' && *b != b'\r')
                    {
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.pos += 2;
                    while self.pos < self.bytes.len() {
                        if self.bytes[self.pos] == b'*'
                            && self.bytes.get(self.pos + 1) == Some(&b'/')
                        {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn skip_trailing_trivia(&mut self) {
        self.skip_trivia(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_all()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_method_header() {
        assert_eq!(
            kinds("public void M()"),
            vec![
                TokenKind::PublicKeyword,
                TokenKind::VoidKeyword,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn tokens_are_contiguous_over_full_spans() {
        let source = "  // header\npublic void M() {\n    return 0; /* inline */\n}\n";
        let tokens = Scanner::new(source).scan_all();
        let mut pos = 0u32;
        for token in &tokens {
            assert_eq!(token.full_start, pos);
            assert!(token.full_start <= token.start);
            assert!(token.start <= token.end);
            assert!(token.end <= token.full_end);
            pos = token.full_end;
        }
        assert_eq!(pos as usize, source.len());
    }

    #[test]
    fn trailing_trivia_stops_at_end_of_line() {
        let source = "int x\nint";
        let tokens = Scanner::new(source).scan_all();
        // `x` owns the newline as trailing trivia; the next `int` has no
        // leading trivia of its own.
        let x = tokens[1];
        assert_eq!(x.text(source), "x");
        assert_eq!(x.full_end as usize, source.find("\nint").unwrap() + 1);
        assert_eq!(tokens[2].full_start, x.full_end);
    }

    #[test]
    fn comment_before_token_is_leading_trivia() {
        let source = "/* doc */ int";
        let tokens = Scanner::new(source).scan_all();
        assert_eq!(tokens[0].kind, TokenKind::IntKeyword);
        assert_eq!(tokens[0].full_start, 0);
        assert_eq!(tokens[0].text(source), "int");
    }
}
