use std::iter::Peekable;
use std::str::CharIndices;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Ident,
    Number,
    StringLiteral,
    /// `===`, the only assignment operator.
    Assign,
    /// `+ - * / < > <= >= == !=`
    Operator,
    Semicolon,
    Comma,
    LBrace,
    RBrace,
    IntegerKw,
    DecimalKw,
    StringKw,
    If,
    Else,
    While,
    For,
    Print,
    QuotedCondition,
    Unknown,
    Eof,
}

impl SyntaxKind {
    fn keyword(ident: &str) -> Option<Self> {
        let kind = match ident {
            "integer" => SyntaxKind::IntegerKw,
            "decimal" => SyntaxKind::DecimalKw,
            "string" => SyntaxKind::StringKw,
            "if" => SyntaxKind::If,
            "else" => SyntaxKind::Else,
            "while" => SyntaxKind::While,
            "for" => SyntaxKind::For,
            "print" => SyntaxKind::Print,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntegerKw | SyntaxKind::DecimalKw | SyntaxKind::StringKw
        )
    }
}

/// Byte range of a token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// The lexeme. String literals hold their body without the quotes.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }
}

/// Forward-only tokenizer. Every call to [`Lexer::next_token`] past the end
/// of input returns another `Eof` token.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(idx, _)| idx)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    pub fn next_token(&mut self) -> Token {
        self.chars
            .peeking_take_while(|(_, c)| c.is_ascii_whitespace())
            .for_each(drop);

        let start = self.offset();
        let Some((_, ch)) = self.chars.next() else {
            return Token::new(SyntaxKind::Eof, "", Span::new(start, start));
        };

        let kind = match ch {
            ';' => SyntaxKind::Semicolon,
            ',' => SyntaxKind::Comma,
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            '"' => return self.string_literal(start),
            '=' if self.source[start..].starts_with("===") => {
                self.chars.nth(1);
                SyntaxKind::Assign
            }
            '=' if self.bump_if('=') => SyntaxKind::Operator,
            '=' => SyntaxKind::Unknown,
            '<' | '>' | '!' => {
                self.bump_if('=');
                SyntaxKind::Operator
            }
            '+' | '-' | '*' | '/' => SyntaxKind::Operator,
            c if c.is_ascii_digit() => {
                self.number();
                SyntaxKind::Number
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                self.chars
                    .peeking_take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
                    .for_each(drop);
                let end = self.offset();
                SyntaxKind::keyword(&self.source[start..end]).unwrap_or(SyntaxKind::Ident)
            }
            _ => SyntaxKind::Unknown,
        };

        let end = self.offset();
        Token::new(kind, &self.source[start..end], Span::new(start, end))
    }

    /// Digits with at most one embedded `.`; a second `.` ends the number.
    fn number(&mut self) {
        let mut seen_dot = false;
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '0'..='9' => {}
                '.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            self.chars.next();
        }
    }

    /// Everything up to the next `"` (or end of input) is the literal body.
    fn string_literal(&mut self, start: usize) -> Token {
        let body_start = start + 1;
        let body_end = self
            .chars
            .peeking_take_while(|&(_, c)| c != '"')
            .last()
            .map_or(body_start, |(idx, c)| idx + c.len_utf8());
        self.bump_if('"');
        let end = self.offset();

        Token::new(
            SyntaxKind::StringLiteral,
            &self.source[body_start..body_end],
            Span::new(start, end),
        )
    }
}

/// Tokenizes the whole source, including the trailing `Eof` token.
pub fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is(SyntaxKind::Eof);
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{TestResult, quickcheck};

    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn declaration() {
        use SyntaxKind::*;
        let tokens = lex("integer x === 5;");
        assert_eq!(
            tokens,
            vec![
                Token::new(IntegerKw, "integer", Span::new(0, 7)),
                Token::new(Ident, "x", Span::new(8, 9)),
                Token::new(Assign, "===", Span::new(10, 13)),
                Token::new(Number, "5", Span::new(14, 15)),
                Token::new(Semicolon, ";", Span::new(15, 16)),
                Token::new(Eof, "", Span::new(16, 16)),
            ]
        );
    }

    #[test]
    fn keywords_and_punctuation() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("if else while for print decimal string iffy _x1 , { }"),
            vec![
                If, Else, While, For, Print, DecimalKw, StringKw, Ident, Ident, Comma, LBrace,
                RBrace, Eof
            ]
        );
    }

    #[test]
    fn numbers_take_one_dot() {
        assert_eq!(texts("3.14 1.2.3 7."), vec!["3.14", "1.2", ".", "3", "7.", ""]);
        assert_eq!(kinds("1.2.3")[1], SyntaxKind::Unknown);
    }

    #[test]
    fn string_literals() {
        let tokens = lex("\"x < 10\" \"open");
        assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
        assert_eq!(tokens[0].text, "x < 10");
        assert_eq!(tokens[0].span, Span::new(0, 8));
        assert_eq!(tokens[1].text, "open");
        assert_eq!(tokens[1].span, Span::new(9, 14));
        assert_eq!(tokens[2].kind, SyntaxKind::Eof);

        let empty = lex("\"\"");
        assert_eq!(empty[0].text, "");
        assert_eq!(empty[0].span, Span::new(0, 2));
    }

    #[test]
    fn equals_signs() {
        use SyntaxKind::*;
        assert_eq!(kinds("==="), vec![Assign, Eof]);
        assert_eq!(kinds("=="), vec![Operator, Eof]);
        assert_eq!(kinds("="), vec![Unknown, Eof]);
        assert_eq!(texts("===="), vec!["===", "=", ""]);
        assert_eq!(kinds("===="), vec![Assign, Unknown, Eof]);
    }

    #[test]
    fn operators() {
        assert_eq!(
            texts("< <= > >= != ! + - * / +="),
            vec!["<", "<=", ">", ">=", "!=", "!", "+", "-", "*", "/", "+", "=", ""]
        );
    }

    #[test]
    fn unknown_characters_advance() {
        use SyntaxKind::*;
        let tokens = lex("@ é#");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Unknown, Unknown, Unknown, Eof]
        );
        assert_eq!(tokens[1].text, "é");
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("  x ");
        assert_eq!(lexer.next_token().kind, SyntaxKind::Ident);
        for _ in 0..3 {
            let eof = lexer.next_token();
            assert_eq!(eof.kind, SyntaxKind::Eof);
            assert_eq!(eof.span, Span::new(4, 4));
        }
    }

    quickcheck! {
        fn lexemes_rebuild_source(input: String) -> TestResult {
            if input.contains('"') {
                return TestResult::discard();
            }
            let rebuilt: String = lex(&input).into_iter().map(|t| t.text).collect();
            let significant: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            TestResult::from_bool(rebuilt == significant)
        }

        fn lexing_always_ends_in_eof(input: String) -> bool {
            let tokens = lex(&input);
            tokens.len() <= input.chars().count() + 1
                && tokens.last().map(|t| t.kind) == Some(SyntaxKind::Eof)
                && tokens.iter().filter(|t| t.is(SyntaxKind::Eof)).count() == 1
        }
    }
}
