mod cursor;
pub mod token;

use cursor::Cursor;
use token::{Token, TokenKind, KEYWORDS, SYMBOLS};

/// Streaming tokenizer with a one-token buffer.
///
/// `advance` consumes the next token from the stream, making it the
/// current one; at end of input the current token becomes `None` and
/// `has_more` reports false. Comments and whitespace are stripped.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    current: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Tokenizer<'a> {
        Tokenizer {
            cursor: Cursor::new(source),
            current: None,
        }
    }

    pub fn advance(&mut self) {
        self.current = self.next_token();
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.current.is_some()
    }

    fn next_token(&mut self) -> Option<Token> {
        while let Some(ch) = self.cursor.consume() {
            match ch {
                '/' => match self.cursor.peek() {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => self.skip_block_comment(),
                    _ => {
                        return Some(Token::new(
                            TokenKind::Symbol,
                            ch.to_string(),
                            self.cursor.line,
                        ))
                    }
                },

                '"' => {
                    if let Some(token) = self.read_string() {
                        return Some(token);
                    }
                    // unterminated string, stream exhausted
                }

                '0'..='9' => return Some(self.read_integer(ch)),

                'a'..='z' | 'A'..='Z' | '_' => return Some(self.read_identifier(ch)),

                _ if SYMBOLS.contains(&ch) => {
                    return Some(Token::new(
                        TokenKind::Symbol,
                        ch.to_string(),
                        self.cursor.line,
                    ))
                }

                // whitespace and anything unrecognised
                _ => continue,
            }
        }

        None
    }

    fn skip_line_comment(&mut self) {
        // the newline stays in the stream so the outer loop counts it
        while self.cursor.peek().is_some_and(|ch| ch != '\n') {
            self.cursor.consume();
        }
    }

    fn skip_block_comment(&mut self) {
        self.cursor.consume(); // the opening '*'

        let mut last_star = false;

        while let Some(ch) = self.cursor.consume() {
            if last_star && ch == '/' {
                return;
            }

            last_star = ch == '*';
        }
    }

    fn read_string(&mut self) -> Option<Token> {
        let line = self.cursor.line;
        let mut literal = String::new();

        while let Some(ch) = self.cursor.consume() {
            if ch == '"' {
                return Some(Token::new(TokenKind::StringConst, literal, line));
            }

            literal.push(ch);
        }

        None
    }

    fn read_integer(&mut self, first: char) -> Token {
        let line = self.cursor.line;
        let mut literal = String::from(first);

        while let Some(ch) = self.cursor.peek() {
            match ch {
                '0'..='9' => literal.push(ch),
                _ => break,
            }

            self.cursor.consume();
        }

        Token::new(TokenKind::IntConst, literal, line)
    }

    fn read_identifier(&mut self, first: char) -> Token {
        let line = self.cursor.line;
        let mut literal = String::from(first);

        while let Some(ch) = self.cursor.peek() {
            match ch {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => literal.push(ch),
                _ => break,
            }

            self.cursor.consume();
        }

        let kind = if KEYWORDS.contains(&literal.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Token::new(kind, literal, line)
    }
}

#[cfg(test)]
mod tests {
    use super::token::{Token, TokenKind};
    use super::Tokenizer;

    fn lex(source: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(source);
        let mut tokens = Vec::new();

        tokenizer.advance();
        while tokenizer.has_more() {
            tokens.extend(tokenizer.current().cloned());
            tokenizer.advance();
        }

        tokens
    }

    fn lexemes(source: &str) -> Vec<String> {
        lex(source).into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = lex("class Main { field int count; }");

        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Symbol,
            ]
        );
    }

    #[test]
    fn keyword_must_match_whole_lexeme() {
        let tokens = lex("classy class");

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
    }

    #[test]
    fn all_symbols() {
        let tokens = lex("{}()[].,;+-*/&|<>=~");

        assert_eq!(tokens.len(), 19);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Symbol));
    }

    #[test]
    fn slash_without_comment_is_a_symbol() {
        assert_eq!(lexemes("a / b"), vec!["a", "/", "b"]);
    }

    #[test]
    fn line_comment_is_stripped() {
        assert_eq!(lexemes("let // let x = 1;\nx"), vec!["let", "x"]);
    }

    #[test]
    fn block_comment_is_stripped() {
        assert_eq!(lexemes("a /* b c d */ e"), vec!["a", "e"]);
    }

    #[test]
    fn block_comment_with_consecutive_stars() {
        assert_eq!(lexemes("a /* ** * **/ b"), vec!["a", "b"]);
        assert_eq!(lexemes("a /** doc **/ b"), vec!["a", "b"]);
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        assert_eq!(lexemes("a /* no end"), vec!["a"]);
    }

    #[test]
    fn unterminated_string_is_dropped() {
        assert_eq!(lexemes("a \"no end"), vec!["a"]);
    }

    #[test]
    fn string_constant_strips_quotes() {
        let tokens = lex("\"hello world\"");

        assert_eq!(tokens[0].kind, TokenKind::StringConst);
        assert_eq!(tokens[0].lexeme, "hello world");
    }

    #[test]
    fn string_may_span_lines() {
        let tokens = lex("\"a\nb\" x");

        assert_eq!(tokens[0].lexeme, "a\nb");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn integer_keeps_leading_zeros() {
        let tokens = lex("007");

        assert_eq!(tokens[0].kind, TokenKind::IntConst);
        assert_eq!(tokens[0].lexeme, "007");
    }

    #[test]
    fn integer_run_is_maximal() {
        assert_eq!(lexemes("123abc"), vec!["123", "abc"]);
    }

    #[test]
    fn line_numbers_count_newlines() {
        let tokens = lex("a\nb\n\nc");

        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[test]
    fn carriage_return_does_not_count_as_a_line() {
        let tokens = lex("a\r\nb");

        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn comments_count_their_newlines() {
        let tokens = lex("// one\n/* two\nthree */ x");

        assert_eq!(tokens[0].lexeme, "x");
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn adjacent_symbols_split() {
        assert_eq!(lexemes("x[i]=y;"), vec!["x", "[", "i", "]", "=", "y", ";"]);
    }
}
