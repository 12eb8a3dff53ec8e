//! Character source and tokenizer
//!
//! The tokenizer hands out structural tokens with one token of pushback.
//! Property values are not tokenized: after a `[` token the reader pulls
//! raw characters from the same source until the closing `]`.
//!
//! Line endings are normalized up front: `\r\n`, `\r` and `\n` all become
//! a single `\n`.

/// Structural token
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `(`
    TreeOpen,
    /// `)`
    TreeClose,
    /// `;`
    NodeStart,
    /// `[`
    ValueOpen,
    /// Property name
    Word(String),
    /// Any other non-whitespace character
    Other(char),
    Eof,
}

/// Characters with a 1-based line counter
#[derive(Debug)]
pub struct CharSource {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl CharSource {
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut iter = text.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' {
                iter.next_if_eq(&'\n');
                chars.push('\n');
            } else {
                chars.push(c);
            }
        }
        Self {
            chars,
            pos: 0,
            line: 1,
        }
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Tokenizer with one-token pushback
#[derive(Debug)]
pub struct Tokenizer {
    source: CharSource,
    pushed: Option<Token>,
}

impl Tokenizer {
    pub fn new(text: &str) -> Self {
        Self {
            source: CharSource::new(text),
            pushed: None,
        }
    }

    pub fn line(&self) -> usize {
        self.source.line()
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pushed.take() {
            return token;
        }

        while self.source.peek_char().is_some_and(char::is_whitespace) {
            self.source.next_char();
        }

        let Some(c) = self.source.next_char() else {
            return Token::Eof;
        };
        match c {
            '(' => Token::TreeOpen,
            ')' => Token::TreeClose,
            ';' => Token::NodeStart,
            '[' => Token::ValueOpen,
            c if c.is_alphabetic() => {
                let mut word = String::from(c);
                while let Some(next) = self.source.peek_char().filter(|n| n.is_alphanumeric()) {
                    word.push(next);
                    self.source.next_char();
                }
                Token::Word(word)
            }
            c => Token::Other(c),
        }
    }

    /// Return `token` from the next call to [`Tokenizer::next_token`]
    pub fn push_back(&mut self, token: Token) {
        debug_assert!(self.pushed.is_none(), "only one token of pushback");
        self.pushed = Some(token);
    }

    /// Discard everything before the first `(`; false if there is none
    pub fn skip_to_tree(&mut self) -> bool {
        while let Some(c) = self.source.peek_char() {
            if c == '(' {
                return true;
            }
            self.source.next_char();
        }
        false
    }

    /// Next raw character inside a property value
    pub fn next_raw(&mut self) -> Option<char> {
        debug_assert!(self.pushed.is_none(), "raw read with a pushed-back token");
        self.source.next_char()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(text);
        let mut out = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token == Token::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            tokens("( ;FF \n AB )"),
            vec![
                Token::TreeOpen,
                Token::NodeStart,
                Token::Word("FF".to_string()),
                Token::Word("AB".to_string()),
                Token::TreeClose,
            ]
        );
        assert_eq!(tokens("[ 7"), vec![Token::ValueOpen, Token::Other('7')]);
    }

    #[test]
    fn test_word_stops_at_bracket() {
        let mut tokenizer = Tokenizer::new("B[a1]");
        assert_eq!(tokenizer.next_token(), Token::Word("B".to_string()));
        assert_eq!(tokenizer.next_token(), Token::ValueOpen);
        assert_eq!(tokenizer.next_raw(), Some('a'));
        assert_eq!(tokenizer.next_raw(), Some('1'));
        assert_eq!(tokenizer.next_raw(), Some(']'));
        assert_eq!(tokenizer.next_token(), Token::Eof);
    }

    #[test]
    fn test_push_back() {
        let mut tokenizer = Tokenizer::new(";)");
        let first = tokenizer.next_token();
        tokenizer.push_back(first.clone());
        assert_eq!(tokenizer.next_token(), first);
        assert_eq!(tokenizer.next_token(), Token::TreeClose);
    }

    #[test]
    fn test_line_endings_normalized() {
        let mut source = CharSource::new("a\r\nb\rc\nd");
        let chars: Vec<char> = std::iter::from_fn(|| source.next_char()).collect();
        assert_eq!(chars, vec!['a', '\n', 'b', '\n', 'c', '\n', 'd']);
        assert_eq!(source.line(), 4);
    }

    #[test]
    fn test_skip_to_tree() {
        let mut tokenizer = Tokenizer::new("header text\n\n  (;)");
        assert!(tokenizer.skip_to_tree());
        assert_eq!(tokenizer.line(), 3);
        assert_eq!(tokenizer.next_token(), Token::TreeOpen);

        let mut empty = Tokenizer::new("no tree here");
        assert!(!empty.skip_to_tree());
    }
}
