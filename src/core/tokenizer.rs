//! HTML Tokenizer - lenient state machine for markup token extraction
//!
//! Implements a pull-parser style tokenizer that extracts tokens from
//! real-world HTML, which is rarely well-formed:
//! - Element start/end tags (names matched case-insensitively)
//! - Self-closing tags (`<br/>`)
//! - Text content with entity decoding
//! - Raw-text elements (`<script>`, `<style>`) whose content is never tokenized
//! - Comments, DOCTYPE and bogus `<?...>` markup
//!
//! The tokenizer never fails. Markup it cannot interpret is emitted as text.

use super::entities::decode_text;
use super::scanner::{is_name_start_char, Scanner};
use std::borrow::Cow;

/// Elements whose content is raw text up to the matching end tag
const RAW_TEXT_ELEMENTS: [&[u8]; 2] = [b"script", b"style"];

/// Type of markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Self-closing element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// Comment: <!--...-->
    Comment,
    /// DOCTYPE or other `<!...>` declaration
    DocType,
    /// Bogus processing instruction: <?...>
    ProcessingInstruction,
    /// End of file
    Eof,
}

/// A parsed markup token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags: the element name as written
    pub name: Option<Cow<'a, [u8]>>,
    /// For text/comments: the content (owned if entities were decoded)
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(Cow::Borrowed(name));
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// HTML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    done: bool,
    /// Set after a raw-text start tag; holds the element name to look for
    raw_text: Option<&'static [u8]>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            done: false,
            raw_text: None,
        }
    }

    /// Get the current position in the input
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next token, or None once Eof has been returned
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            if self.done {
                return None;
            }

            if self.scanner.is_eof() {
                self.done = true;
                let end = self.scanner.position();
                return Some(Token::new(TokenKind::Eof, (end, end)));
            }

            if let Some(element) = self.raw_text.take() {
                if let Some(token) = self.parse_raw_text(element) {
                    return Some(token);
                }
                continue;
            }

            if self.scanner.peek() == Some(b'<') {
                if let Some(token) = self.parse_markup() {
                    return Some(token);
                }
                // A '<' that opens no markup is literal text
                return Some(self.parse_text(1));
            }

            return Some(self.parse_text(0));
        }
    }

    /// Parse markup starting at '<'. Returns None if the '<' is literal text.
    fn parse_markup(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();

        if self.scanner.starts_with(b"<!--") {
            return Some(self.parse_comment(start));
        }
        if self.scanner.starts_with(b"<!") {
            return Some(self.parse_declaration(start, TokenKind::DocType));
        }
        if self.scanner.starts_with(b"<?") {
            return Some(self.parse_declaration(start, TokenKind::ProcessingInstruction));
        }
        if self.scanner.starts_with(b"</") {
            return self.parse_end_tag(start);
        }
        if self.scanner.peek_at(1).is_some_and(is_name_start_char) {
            return Some(self.parse_start_tag(start));
        }
        None
    }

    fn parse_start_tag(&mut self, start: usize) -> Token<'a> {
        self.scanner.advance(1); // Skip '<'
        let name = self.scanner.read_name().unwrap_or_default();
        let end = self.tag_end();

        let self_closing = end >= 2 && self.scanner.slice(start, end).ends_with(b"/>");
        let kind = if self_closing {
            TokenKind::EmptyTag
        } else {
            if let Some(raw) = RAW_TEXT_ELEMENTS
                .iter()
                .copied()
                .find(|raw| raw.eq_ignore_ascii_case(name))
            {
                self.raw_text = Some(raw);
            }
            TokenKind::StartTag
        };

        Token::new(kind, (start, end)).with_name(name)
    }

    fn parse_end_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2); // Skip '</'
        match self.scanner.read_name() {
            Some(name) => {
                let end = self.tag_end();
                Some(Token::new(TokenKind::EndTag, (start, end)).with_name(name))
            }
            None if self.scanner.peek() == Some(b'>') => {
                // `</>` is dropped entirely
                self.scanner.advance(1);
                let end = self.scanner.position();
                Some(Token::new(TokenKind::Comment, (start, end)).with_content(Cow::Borrowed(b"")))
            }
            None => {
                self.scanner.set_position(start);
                Some(self.parse_declaration(start, TokenKind::Comment))
            }
        }
    }

    fn parse_comment(&mut self, start: usize) -> Token<'a> {
        self.scanner.advance(4); // Skip '<!--'
        let content_start = self.scanner.position();
        let (content_end, end) = match self.scanner.find(b"-->") {
            Some(close) => (close, close + 3),
            None => (self.input_len(), self.input_len()),
        };
        self.scanner.set_position(end);
        Token::new(TokenKind::Comment, (start, end))
            .with_content(Cow::Borrowed(self.scanner.slice(content_start, content_end)))
    }

    /// `<!DOCTYPE ...>`, `<?...>` and other bogus markup running to the next '>'
    fn parse_declaration(&mut self, start: usize, kind: TokenKind) -> Token<'a> {
        self.scanner.advance(2);
        let content_start = self.scanner.position();
        let (content_end, end) = match self.scanner.find(b">") {
            Some(close) => (close, close + 1),
            None => (self.input_len(), self.input_len()),
        };
        self.scanner.set_position(end);
        Token::new(kind, (start, end))
            .with_content(Cow::Borrowed(self.scanner.slice(content_start, content_end)))
    }

    /// Text up to the next '<', starting `skip` bytes past the current position
    fn parse_text(&mut self, skip: usize) -> Token<'a> {
        let start = self.scanner.position();
        self.scanner.advance(skip);
        let end = self.scanner.find_tag_start().unwrap_or(self.input_len());
        self.scanner.set_position(end);
        let raw = self.scanner.slice(start, end);
        Token::new(TokenKind::Text, (start, end)).with_content(decode_text(raw))
    }

    /// Content of a raw-text element; not entity-decoded
    fn parse_raw_text(&mut self, element: &[u8]) -> Option<Token<'a>> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_end_tag_ci(element)
            .unwrap_or(self.input_len());
        self.scanner.set_position(end);
        if end == start {
            return None;
        }
        Some(
            Token::new(TokenKind::Text, (start, end))
                .with_content(Cow::Borrowed(self.scanner.slice(start, end))),
        )
    }

    /// Position just past the closing '>' of the current tag (or EOF)
    fn tag_end(&mut self) -> usize {
        let end = match self.scanner.find_tag_end_quoted() {
            Some(close) => close + 1,
            None => self.input_len(),
        };
        self.scanner.set_position(end);
        end
    }

    fn input_len(&self) -> usize {
        self.scanner.position() + self.scanner.remaining().len()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
