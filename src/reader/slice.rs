//! Zero-Copy Slice Reader
//!
//! Turns the token stream of a byte slice into HTML events.
//! Input references are maintained directly in the output where possible.

use super::events::{EndElement, HtmlEvent, StartElement};
use crate::core::attributes::{parse_attributes, Attribute};
use crate::core::scanner::is_name_char;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};

/// Zero-copy HTML reader from a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Get the next HTML event
    pub fn next_event(&mut self) -> Option<HtmlEvent<'a>> {
        loop {
            let token = self.tokenizer.next_token()?;

            match token.kind {
                TokenKind::Eof => return Some(HtmlEvent::EndDocument),

                TokenKind::StartTag => {
                    let attrs = self.parse_tag_attributes(&token);
                    let name = token.name?;
                    return Some(HtmlEvent::StartElement(StartElement::from_cow(name, attrs)));
                }

                TokenKind::EmptyTag => {
                    let attrs = self.parse_tag_attributes(&token);
                    let name = token.name?;
                    return Some(HtmlEvent::EmptyElement(StartElement::from_cow(name, attrs)));
                }

                TokenKind::EndTag => {
                    let name = token.name?;
                    return Some(HtmlEvent::EndElement(EndElement::from_cow(name)));
                }

                TokenKind::Text => {
                    if let Some(content) = token.content {
                        if !content.is_empty() {
                            return Some(HtmlEvent::Text(content));
                        }
                    }
                }

                TokenKind::Comment => {
                    if let Some(content) = token.content {
                        return Some(HtmlEvent::Comment(content));
                    }
                }

                TokenKind::DocType => {
                    let (start, end) = token.span;
                    return Some(HtmlEvent::DocType(std::borrow::Cow::Borrowed(
                        &self.input[start..end],
                    )));
                }

                // Bogus `<?...>` markup carries nothing for the tree
                TokenKind::ProcessingInstruction => {}
            }
        }
    }

    /// Parse attributes from a tag token
    fn parse_tag_attributes(&self, token: &Token<'a>) -> Vec<Attribute<'a>> {
        let (start, end) = token.span;
        let tag_content = &self.input[start..end];

        // Skip '<' and the tag name
        let mut pos = 1;
        while pos < tag_content.len() && is_name_char(tag_content[pos]) {
            pos += 1;
        }

        let mut attr_end = tag_content.len();
        if tag_content.ends_with(b"/>") {
            attr_end -= 2;
        } else if tag_content.ends_with(b">") {
            attr_end -= 1;
        }

        if pos >= attr_end {
            return Vec::new();
        }

        parse_attributes(&tag_content[pos..attr_end])
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = HtmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.next_event()?;
        if matches!(event, HtmlEvent::EndDocument) {
            None
        } else {
            Some(event)
        }
    }
}
