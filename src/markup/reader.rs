//! A small markup reader for XOML documents.
//!
//! XOML only needs a subset of XML: a prolog, comments, nested elements
//! with attributes, and text content. The reader tracks a 1-based
//! line/column for every node so later stages can attribute diagnostics.

use crate::error::MarkupError;

/// One element of the raw markup tree, before activity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(MarkupText),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupText {
    pub value: String,
    pub line: u32,
    pub column: u32,
}

impl MarkupElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(|child| match child {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Concatenated non-whitespace text content, if any.
    pub fn text_content(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .children
            .iter()
            .filter_map(|child| match child {
                MarkupNode::Text(text) if !text.value.trim().is_empty() => {
                    Some(text.value.as_str())
                }
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// Parses a complete XOML document and returns its root element.
pub fn parse_document(source: &str) -> Result<MarkupElement, MarkupError> {
    let mut reader = Reader::new(source);
    reader.skip_misc()?;
    let root = reader.parse_element()?;
    reader.skip_misc()?;
    if !reader.at_end() {
        return Err(reader.malformed("unexpected content after the document root"));
    }
    Ok(root)
}

struct Reader {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Reader {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn malformed(&self, message: &str) -> MarkupError {
        MarkupError::malformed_at(self.line, self.column, message)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, ch)| self.peek_at(i) == Some(ch))
    }

    fn consume(&mut self, text: &str) -> Result<(), MarkupError> {
        if !self.starts_with(text) {
            return Err(self.malformed(&format!("expected '{}'", text)));
        }
        for _ in 0..text.chars().count() {
            self.bump();
        }
        Ok(())
    }

    /// Skips whitespace, the XML prolog, comments and doctype declarations.
    fn skip_misc(&mut self) -> Result<(), MarkupError> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.skip_until("?>")?;
            } else if self.starts_with("<!--") {
                self.skip_until("-->")?;
            } else if self.starts_with("<!") {
                self.skip_until(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_until(&mut self, terminator: &str) -> Result<(), MarkupError> {
        while !self.at_end() {
            if self.starts_with(terminator) {
                return self.consume(terminator);
            }
            self.bump();
        }
        Err(self.malformed(&format!("unterminated construct, expected '{}'", terminator)))
    }

    fn read_name(&mut self) -> Result<String, MarkupError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':') {
                name.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.malformed("expected a name"));
        }
        Ok(name)
    }

    fn parse_element(&mut self) -> Result<MarkupElement, MarkupError> {
        // Position of the element is the position of its '<'.
        let (line, column) = (self.line, self.column);
        self.consume("<")?;
        let name = self.read_name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.consume("/>")?;
                    return Ok(MarkupElement {
                        name,
                        attributes,
                        children: Vec::new(),
                        line,
                        column,
                    });
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let (key, value) = self.parse_attribute(&name, &attributes)?;
                    attributes.push((key, value));
                }
                None => return Err(self.malformed("unexpected end of document in element tag")),
            }
        }

        let children = self.parse_children(&name)?;
        Ok(MarkupElement {
            name,
            attributes,
            children,
            line,
            column,
        })
    }

    fn parse_attribute(
        &mut self,
        element: &str,
        existing: &[(String, String)],
    ) -> Result<(String, String), MarkupError> {
        let key = self.read_name()?;
        if existing.iter().any(|(k, _)| *k == key) {
            return Err(self.malformed(&format!(
                "attribute '{}' appears twice on element '{}'",
                key, element
            )));
        }
        self.skip_whitespace();
        self.consume("=")?;
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(ch @ ('"' | '\'')) => {
                self.bump();
                ch
            }
            _ => return Err(self.malformed("expected a quoted attribute value")),
        };
        let mut raw = String::new();
        loop {
            match self.bump() {
                Some(ch) if ch == quote => break,
                Some(ch) => raw.push(ch),
                None => return Err(self.malformed("unterminated attribute value")),
            }
        }
        Ok((key, decode_entities(&raw)))
    }

    fn parse_children(&mut self, parent: &str) -> Result<Vec<MarkupNode>, MarkupError> {
        let mut children = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.malformed(&format!("element '{}' is never closed", parent)));
            }
            if self.starts_with("</") {
                self.consume("</")?;
                let closing = self.read_name()?;
                if closing != parent {
                    return Err(self.malformed(&format!(
                        "mismatched closing tag: expected '</{}>' but found '</{}>'",
                        parent, closing
                    )));
                }
                self.skip_whitespace();
                self.consume(">")?;
                return Ok(children);
            }
            if self.starts_with("<!--") {
                self.skip_until("-->")?;
                continue;
            }
            if self.starts_with("<") {
                children.push(MarkupNode::Element(self.parse_element()?));
                continue;
            }
            let (line, column) = (self.line, self.column);
            let mut value = String::new();
            while let Some(ch) = self.peek() {
                if ch == '<' {
                    break;
                }
                value.push(ch);
                self.bump();
            }
            children.push(MarkupNode::Text(MarkupText {
                value: decode_entities(&value),
                line,
                column,
            }));
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let Some(end) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        match &rest[..=end] {
            "&lt;" => out.push('<'),
            "&gt;" => out.push('>'),
            "&amp;" => out.push('&'),
            "&quot;" => out.push('"'),
            "&apos;" => out.push('\''),
            other => out.push_str(other),
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}
