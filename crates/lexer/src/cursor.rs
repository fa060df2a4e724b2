use std::str::Chars;

/// Character stream with single-character look-ahead and line tracking.
///
/// `line` is 1-based and counts every consumed `\n`, including the ones
/// inside string constants and comments. `\r` is ordinary whitespace and
/// never counts.
#[derive(Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    pub line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Cursor<'a> {
        Cursor {
            chars: source.chars(),
            line: 1,
        }
    }

    #[inline]
    pub fn consume(&mut self) -> Option<char> {
        let ch = self.chars.next();

        if ch == Some('\n') {
            self.line += 1;
        }

        ch
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }
}
