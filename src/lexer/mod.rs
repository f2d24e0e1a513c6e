mod tokens;

pub use tokens::{Token, TokenKind, keyword_to_token};

use crate::error::{Error, Result};

/// Lexer that turns script text into a flat token sequence
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire source. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        // Rough estimate: 1 token per 4 chars
        let estimated_tokens = self.source.len() / 4 + 1;
        let mut tokens = Vec::with_capacity(estimated_tokens.min(1024));

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let (line, col) = (self.line, self.column);

        let Some((_pos, ch)) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, line, col));
        };

        let token = match ch {
            '"' | '\'' => self.scan_string(ch)?,

            '0'..='9' => self.scan_number()?,

            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(),

            // Two-character operators are tried before their one-character prefixes
            '+' => {
                self.advance();
                if self.match_char('+') {
                    Token::new(TokenKind::Increment, line, col)
                } else if self.match_char('=') {
                    Token::new(TokenKind::PlusAssign, line, col)
                } else {
                    Token::new(TokenKind::Plus, line, col)
                }
            }
            '-' => {
                self.advance();
                if self.match_char('-') {
                    Token::new(TokenKind::Decrement, line, col)
                } else if self.match_char('=') {
                    Token::new(TokenKind::MinusAssign, line, col)
                } else {
                    Token::new(TokenKind::Minus, line, col)
                }
            }
            '*' => self.one_or_assign(TokenKind::Star, TokenKind::StarAssign),
            '/' => self.one_or_assign(TokenKind::Slash, TokenKind::SlashAssign),
            '%' => self.one_or_assign(TokenKind::Percent, TokenKind::PercentAssign),
            '<' => self.one_or_assign(TokenKind::Less, TokenKind::LessEqual),
            '>' => self.one_or_assign(TokenKind::Greater, TokenKind::GreaterEqual),
            '=' => self.one_or_assign(TokenKind::Assign, TokenKind::Equal),
            '!' => self.one_or_assign(TokenKind::Not, TokenKind::NotEqual),
            '&' => {
                self.advance();
                if !self.match_char('&') {
                    return Err(Error::lexical('&', line, col));
                }
                Token::new(TokenKind::And, line, col)
            }
            '|' => {
                self.advance();
                if !self.match_char('|') {
                    return Err(Error::lexical('|', line, col));
                }
                Token::new(TokenKind::Or, line, col)
            }
            '$' => self.single(TokenKind::Dollar),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),

            _ => return Err(Error::lexical(ch, line, col)),
        };

        Ok(token)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let (line, col) = (self.line, self.column);
        self.advance();
        Token::new(kind, line, col)
    }

    /// `op` alone, or `op=` when followed by `=`
    fn one_or_assign(&mut self, plain: TokenKind, with_eq: TokenKind) -> Token {
        let (line, col) = (self.line, self.column);
        self.advance();
        if self.match_char('=') {
            Token::new(with_eq, line, col)
        } else {
            Token::new(plain, line, col)
        }
    }

    fn peek_char(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|(_, c)| *c == expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((_, ch)) = result {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some((_, ' ' | '\t' | '\r' | '\n')) => {
                    self.advance();
                }
                Some((_, '#')) => {
                    // Comment - skip to end of line
                    while let Some((_, ch)) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<Token> {
        let (line, col) = (self.line, self.column);
        self.advance(); // consume opening quote

        let mut value = String::new();

        loop {
            match self.advance() {
                Some((_, c)) if c == quote => break,
                Some((_, '\\')) => match self.advance() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '\n')) | None => return Err(Error::lexical(quote, line, col)),
                    Some((_, c)) => value.push(c),
                },
                Some((_, '\n')) | None => return Err(Error::lexical(quote, line, col)),
                Some((_, ch)) => value.push(ch),
            }
        }

        Ok(Token::new(TokenKind::String(value), line, col))
    }

    fn scan_number(&mut self) -> Result<Token> {
        let (line, col) = (self.line, self.column);
        let start_pos = self.chars.peek().map(|(pos, _)| *pos).unwrap_or(0);
        let mut end_pos = start_pos;

        while let Some((pos, ch)) = self.peek_char() {
            if ch.is_ascii_digit() {
                end_pos = pos + 1;
                self.advance();
            } else {
                break;
            }
        }

        let mut is_float = false;
        if self.match_char('.') {
            is_float = true;
            end_pos += 1;
            while let Some((pos, ch)) = self.peek_char() {
                if ch.is_ascii_digit() {
                    end_pos = pos + 1;
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let text = &self.source[start_pos..end_pos];
        let kind = match text.parse::<i64>() {
            Ok(n) if !is_float => TokenKind::Integer(n),
            _ => {
                let first = text.chars().next().unwrap_or('0');
                TokenKind::Float(text.parse().map_err(|_| Error::lexical(first, line, col))?)
            }
        };

        Ok(Token::new(kind, line, col))
    }

    fn scan_identifier(&mut self) -> Token {
        let (line, col) = (self.line, self.column);
        let start_pos = self.chars.peek().map(|(pos, _)| *pos).unwrap_or(0);
        let mut end_pos = start_pos;

        while let Some((pos, ch)) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                end_pos = pos + 1;
                self.advance();
            } else {
                break;
            }
        }

        let ident = &self.source[start_pos..end_pos];
        let kind = keyword_to_token(ident).unwrap_or_else(|| TokenKind::Identifier(ident.to_string()));

        Token::new(kind, line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("x + y - z * w / v % u");
        assert_eq!(tokens[1], TokenKind::Plus);
        assert_eq!(tokens[3], TokenKind::Minus);
        assert_eq!(tokens[5], TokenKind::Star);
        assert_eq!(tokens[7], TokenKind::Slash);
        assert_eq!(tokens[9], TokenKind::Percent);
        assert_eq!(tokens.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_multi_char_operators_win() {
        let tokens = kinds("+= -= *= /= %= ++ -- == != <= >= && || < > = !");
        assert_eq!(
            tokens,
            vec![
                TokenKind::PlusAssign,
                TokenKind::MinusAssign,
                TokenKind::StarAssign,
                TokenKind::SlashAssign,
                TokenKind::PercentAssign,
                TokenKind::Increment,
                TokenKind::Decrement,
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Assign,
                TokenKind::Not,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        let tokens = kinds("BEGIN END if else for print break begin Print");
        assert_eq!(tokens[0], TokenKind::Begin);
        assert_eq!(tokens[1], TokenKind::End);
        assert_eq!(tokens[2], TokenKind::If);
        assert_eq!(tokens[3], TokenKind::Else);
        assert_eq!(tokens[4], TokenKind::For);
        assert_eq!(tokens[5], TokenKind::Print);
        assert_eq!(tokens[6], TokenKind::Break);
        // Keywords are case-sensitive
        assert_eq!(tokens[7], TokenKind::Identifier("begin".to_string()));
        assert_eq!(tokens[8], TokenKind::Identifier("Print".to_string()));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 3.14 7. 99999999999999999999");
        assert_eq!(tokens[0], TokenKind::Integer(42));
        assert!(matches!(tokens[1], TokenKind::Float(n) if (n - 3.14).abs() < 1e-9));
        assert_eq!(tokens[2], TokenKind::Float(7.0));
        assert!(matches!(tokens[3], TokenKind::Float(n) if n > 9.0e18));
    }

    #[test]
    fn test_strings() {
        let tokens = kinds(r#""hello" 'single' "tab\there""#);
        assert_eq!(tokens[0], TokenKind::String("hello".to_string()));
        assert_eq!(tokens[1], TokenKind::String("single".to_string()));
        assert_eq!(tokens[2], TokenKind::String("tab\there".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("print \"abc\n\"").tokenize().unwrap_err();
        assert!(matches!(err, Error::Lexical { character: '"', location } if location.line == 1));
    }

    #[test]
    fn test_comments_and_newlines() {
        let tokens = kinds("x # a comment = ! @\ny");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("x".to_string()),
                TokenKind::Identifier("y".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_tracking() {
        let tokens = Lexer::new("a\nb\n\nc").tokenize().unwrap();
        assert_eq!(tokens[0].location.line, 1);
        assert_eq!(tokens[1].location.line, 2);
        assert_eq!(tokens[2].location.line, 4);
    }

    #[test]
    fn test_illegal_character() {
        let err = Lexer::new("{ x = 1 }\n{ y @ 2 }").tokenize().unwrap_err();
        match err {
            Error::Lexical { character, location } => {
                assert_eq!(character, '@');
                assert_eq!(location.line, 2);
                assert_eq!(location.column, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lone_ampersand_and_pipe() {
        assert!(matches!(
            Lexer::new("a & b").tokenize(),
            Err(Error::Lexical { character: '&', .. })
        ));
        assert!(matches!(
            Lexer::new("a | b").tokenize(),
            Err(Error::Lexical { character: '|', .. })
        ));
    }
}
