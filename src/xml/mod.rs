//! The token stream the parser reads from, and the output stream the writer renders into.
//!
//! The parser only sees the [`TokenCursor`] trait. [`XmlInputStream`] implements it by tokenizing
//! a whole document up front with `quick-xml`, which keeps enough of the source around to hand
//! back annotation markup verbatim.

mod writer;

pub use writer::XmlOutputStream;

use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::MathError;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum TokenKind {
    /// An opening tag. `<a/>` and `<a></a>` both give a single self-closing start, with no end
    /// token following it.
    Start { self_closing: bool },
    End,
    Text,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct XmlToken {
    pub kind: TokenKind,

    /// The local name, without any prefix. Empty for text.
    pub name: String,
    pub prefix: Option<String>,

    /// Attributes by qualified name, in document order.
    pub attributes: Vec<(String, String)>,

    /// The unescaped content of a text token.
    pub text: String,

    pub line: usize,
    pub column: usize,

    /// Byte range of the token in the source document.
    pub span: Range<usize>,
}

impl XmlToken {
    pub fn is_start(&self) -> bool {
        matches!(self.kind, TokenKind::Start { .. })
    }

    pub fn is_self_closing(&self) -> bool {
        matches!(self.kind, TokenKind::Start { self_closing: true })
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    /// Whether this is the end tag closing `start`.
    pub fn is_end_for(&self, start: &XmlToken) -> bool {
        self.is_end() && self.name == start.name && self.prefix == start.prefix
    }

    /// Looks up an attribute by its local name. Namespace declarations are never matched.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| {
                let (prefix, local) = match key.split_once(':') {
                    Some((prefix, local)) => (Some(prefix), local),
                    None => (None, key.as_str()),
                };
                prefix != Some("xmlns") && key != "xmlns" && local == local_name
            })
            .map(|(_, value)| value.as_str())
    }

    /// Like `attribute`, but treats an empty value as missing.
    pub fn non_empty_attribute(&self, local_name: &str) -> Option<&str> {
        self.attribute(local_name).filter(|v| !v.is_empty())
    }
}

/// A forward-only view of a token stream.
pub trait TokenCursor {
    fn peek(&self) -> Option<&XmlToken>;
    fn next(&mut self) -> Option<XmlToken>;

    /// Consumes the element starting at the next token and returns its markup exactly as it
    /// appeared in the source. Returns `None`, consuming nothing, if the next token is not a
    /// start tag.
    fn read_element_markup(&mut self) -> Option<String>;

    fn skip_text(&mut self) {
        while self.peek().map(XmlToken::is_text).unwrap_or(false) {
            self.next();
        }
    }

    /// Consumes tokens up to and including the end tag matching `start`, which must already have
    /// been consumed. Stops early, without consuming it, at an end tag belonging to an enclosing
    /// element, so the stream is never pulled past the parent of `start`.
    fn skip_past_end(&mut self, start: &XmlToken) {
        if !start.is_start() || start.is_self_closing() {
            return;
        }

        let mut depth = 0usize;
        loop {
            let (kind, closes_start) = match self.peek() {
                Some(token) => (token.kind, token.is_end_for(start)),
                None => return,
            };
            match kind {
                TokenKind::Start { self_closing: false } => depth += 1,
                TokenKind::End if depth == 0 => {
                    if closes_start {
                        self.next();
                    }
                    return;
                }
                TokenKind::End => depth -= 1,
                _ => (),
            }
            self.next();
        }
    }
}

/// A `TokenCursor` over a complete document held in memory.
pub struct XmlInputStream<'a> {
    source: &'a str,
    tokens: Vec<XmlToken>,
    index: usize,
}

impl<'a> XmlInputStream<'a> {
    /// Tokenizes `source`. Fails only if it is not well-formed XML.
    pub fn new(source: &'a str) -> Result<XmlInputStream<'a>, MathError> {
        let lines = LineIndex::new(source);
        let mut reader = Reader::from_str(source);
        let mut tokens: Vec<XmlToken> = vec![];

        loop {
            let mut begin = reader.buffer_position() as usize;
            let event = reader.read_event()?;
            let end = reader.buffer_position() as usize;
            if !matches!(event, Event::Text(_)) {
                begin = markup_start(source, begin);
            }
            let (line, column) = lines.locate(begin);

            let token = match event {
                Event::Start(e) => start_token(&e, false, line, column, begin..end)?,
                Event::Empty(e) => start_token(&e, true, line, column, begin..end)?,

                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                    // An element with nothing between its tags is treated as self-closing
                    if let Some(last) = tokens.last_mut() {
                        if last.kind == (TokenKind::Start { self_closing: false }) && last.name == name {
                            last.kind = TokenKind::Start { self_closing: true };
                            last.span.end = end;
                            continue;
                        }
                    }

                    XmlToken {
                        kind: TokenKind::End,
                        prefix: e.name().prefix().map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
                        name,
                        attributes: vec![],
                        text: String::new(),
                        line,
                        column,
                        span: begin..end,
                    }
                }

                Event::Text(e) => text_token(e.unescape()?.into_owned(), line, column, begin..end),
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    text_token(text, line, column, begin..end)
                }

                Event::Eof => break,

                // Declarations, comments and processing instructions carry no maths
                _ => continue,
            };
            tokens.push(token);
        }

        tracing::trace!(tokens = tokens.len(), "tokenized document");
        Ok(XmlInputStream { source, tokens, index: 0 })
    }
}

impl<'a> TokenCursor for XmlInputStream<'a> {
    fn peek(&self) -> Option<&XmlToken> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<XmlToken> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn read_element_markup(&mut self) -> Option<String> {
        let start = self.peek().filter(|t| t.is_start())?.clone();
        self.next();
        self.skip_past_end(&start);

        let end = match self.index.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(last) => last.span.end,
            None => start.span.end,
        };
        self.source.get(start.span.start..end).map(str::to_string)
    }
}

fn start_token(
    e: &BytesStart,
    self_closing: bool,
    line: usize,
    column: usize,
    span: Range<usize>,
) -> Result<XmlToken, MathError> {
    let mut attributes = vec![];
    for attribute in e.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlToken {
        kind: TokenKind::Start { self_closing },
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        prefix: e.name().prefix().map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
        attributes,
        text: String::new(),
        line,
        column,
        span,
    })
}

/// The reader may already have consumed the `<` of a tag when it reports the position before
/// it, depending on what preceded the tag.
fn markup_start(source: &str, position: usize) -> usize {
    let bytes = source.as_bytes();
    if bytes.get(position) != Some(&b'<') && position > 0 && bytes.get(position - 1) == Some(&b'<') {
        position - 1
    } else {
        position
    }
}

fn text_token(text: String, line: usize, column: usize, span: Range<usize>) -> XmlToken {
    XmlToken {
        kind: TokenKind::Text,
        name: String::new(),
        prefix: None,
        attributes: vec![],
        text,
        line,
        column,
        span,
    }
}

/// Maps byte offsets to 1-based line and column numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> LineIndex {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        LineIndex { starts }
    }

    fn locate(&self, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.starts.get(line).copied().unwrap_or(0);
        (line + 1, offset - start + 1)
    }
}
