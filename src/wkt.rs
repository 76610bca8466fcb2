//! Well-known text (version 1) reader and writer.
//!
//! The parser produces a generic [`Node`] tree which [`crate::crs`] lowers into
//! typed coordinate reference systems. Serialization is canonical: square
//! brackets, no whitespace, and numbers in their shortest round-trip form.

use std::fmt::Display;

use tracing::trace;

use crate::{Error, ThisOrThat};

// Real CRS definitions nest fewer than ten levels
const MAX_DEPTH: usize = 64;

/// An argument of a WKT node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A double-quoted string, stored unescaped.
    Text(String),
    Number(f64),
    /// A bare identifier such as `NORTH` in `AXIS["Lat",NORTH]`.
    Keyword(String),
    Node(Node),
}

/// A `KEYWORD[arg, ...]` element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub keyword: String,
    pub args: Vec<Value>,
}

impl Node {
    pub fn new(keyword: impl Into<String>) -> Node {
        Self {
            keyword: keyword.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument, builder style.
    pub fn with(mut self, value: impl Into<Value>) -> Node {
        self.args.push(value.into());
        self
    }

    /// Appends an argument if present.
    pub fn with_opt(self, value: Option<impl Into<Value>>) -> Node {
        match value {
            Some(value) => self.with(value),
            None => self,
        }
    }

    /// Child nodes, in order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.args.iter().filter_map(|arg| match arg {
            Value::Node(node) => Some(node),
            _ => None,
        })
    }

    /// First child node with the given keyword, compared case-insensitively.
    ///
    /// ```
    /// let node = fuelgrid::wkt::parse(r#"UNIT["metre",1,AUTHORITY["EPSG","9001"]]"#).unwrap();
    ///
    /// assert!(node.find("authority").is_some());
    /// assert!(node.find("SPHEROID").is_none());
    /// ```
    pub fn find(&self, keyword: &str) -> Option<&Node> {
        self.children()
            .find(|node| node.keyword.eq_ignore_ascii_case(keyword))
    }

    pub fn find_all<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children()
            .filter(move |node| node.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Like [`Node::find`], failing with [`Error::MissingNode`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNode`] if there is no such child.
    pub fn require(&self, keyword: &str) -> Result<&Node, Error> {
        self.find(keyword).ok_or_else(|| Error::MissingNode {
            parent: self.keyword.clone(),
            child: keyword.to_string(),
        })
    }

    /// Returns the string argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNode`] if the argument is absent or not a string.
    pub fn text_arg(&self, index: usize) -> Result<&str, Error> {
        match self.args.get(index) {
            Some(Value::Text(text)) => Ok(text),
            _ => Err(Error::MissingNode {
                parent: self.keyword.clone(),
                child: format!("string argument {index}"),
            }),
        }
    }

    /// Returns the numeric argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNode`] if the argument is absent or not a number.
    pub fn number_arg(&self, index: usize) -> Result<f64, Error> {
        match self.args.get(index) {
            Some(Value::Number(value)) => Ok(*value),
            _ => Err(Error::MissingNode {
                parent: self.keyword.clone(),
                child: format!("numeric argument {index}"),
            }),
        }
    }

    /// Returns the bare keyword argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNode`] if the argument is absent or not a keyword.
    pub fn keyword_arg(&self, index: usize) -> Result<&str, Error> {
        match self.args.get(index) {
            Some(Value::Keyword(keyword)) => Ok(keyword),
            _ => Err(Error::MissingNode {
                parent: self.keyword.clone(),
                child: format!("keyword argument {index}"),
            }),
        }
    }
}

impl From<Node> for Value {
    fn from(value: Node) -> Self {
        Value::Node(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Formats a number in its shortest round-trip form, dropping the fractional
/// part of integral values (`23`, not `23.0`).
fn format_number(value: f64) -> String {
    let mut buf = ryu::Buffer::new();
    let text = buf.format(value);
    text.strip_suffix(".0").unwrap_or(text).to_string()
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => write!(f, "\"{}\"", text.replace('"', "\"\"")),
            Value::Number(value) => write!(f, "{}", format_number(*value)),
            Value::Keyword(keyword) => write!(f, "{keyword}"),
            Value::Node(node) => write!(f, "{node}"),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.keyword)?;
        for (i, arg) in self.args.iter().enumerate() {
            write!(f, "{}{arg}", (i > 0).ternary(",", ""))?;
        }
        write!(f, "]")
    }
}

/// Parses a single WKT element. Both `[ ]` and `( )` delimiters are accepted,
/// but a node must be closed with the kind of bracket that opened it.
///
/// # Errors
///
/// Returns [`Error::InvalidWkt`] with the byte offset of the first problem.
/// Elements nested deeper than 64 levels and numbers that overflow `f64` are
/// rejected.
///
/// # Usage
///
/// ```
/// use fuelgrid::wkt::{self, Value};
///
/// let node = wkt::parse(r#"PARAMETER["false_easting", 0]"#).unwrap();
///
/// assert_eq!(node.keyword, "PARAMETER");
/// assert_eq!(node.args[0], Value::Text("false_easting".to_string()));
/// assert_eq!(node.to_string(), r#"PARAMETER["false_easting",0]"#);
///
/// assert!(wkt::parse("PARAMETER[\"x\",1").is_err());
/// assert!(wkt::parse("PARAMETER[\"x\",1] extra").is_err());
/// ```
pub fn parse(input: &str) -> Result<Node, Error> {
    let mut parser = Parser {
        src: input.as_bytes(),
        pos: 0,
        depth: 0,
    };

    let node = parser.node()?;
    parser.skip_whitespace();
    if parser.pos < parser.src.len() {
        return Err(parser.error("trailing characters after root element"));
    }

    trace!(keyword = %node.keyword, len = input.len(), "parsed wkt");
    Ok(node)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn error(&self, msg: impl Into<String>) -> Error {
        Error::InvalidWkt {
            position: self.pos,
            msg: msg.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn identifier(&mut self) -> Result<String, Error> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => self.pos += 1,
            Some(c) => return Err(self.error(format!("expected keyword, found '{}'", c as char))),
            None => return Err(self.error("expected keyword, found end of input")),
        }
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        // Identifiers are ASCII by construction
        Ok(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn node(&mut self) -> Result<Node, Error> {
        self.skip_whitespace();
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {MAX_DEPTH} levels")));
        }

        self.depth += 1;
        let node = self.node_body();
        self.depth -= 1;
        node
    }

    fn node_body(&mut self) -> Result<Node, Error> {
        let keyword = self.identifier()?;
        self.skip_whitespace();

        let close = match self.peek() {
            Some(b'[') => b']',
            Some(b'(') => b')',
            _ => return Err(self.error(format!("expected '[' after {keyword}"))),
        };
        self.pos += 1;

        let mut node = Node::new(keyword);

        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(node);
        }

        loop {
            node.args.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(node);
                }
                Some(c) => {
                    return Err(self.error(format!(
                        "expected ',' or '{}' in {}, found '{}'",
                        close as char, node.keyword, c as char
                    )))
                }
                None => return Err(self.error(format!("unterminated {}", node.keyword))),
            }
        }
    }

    fn value(&mut self) -> Result<Value, Error> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'"') => self.text().map(Value::Text),
            Some(c) if c.is_ascii_digit() || matches!(c, b'-' | b'+' | b'.') => {
                self.number().map(Value::Number)
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let start = self.pos;
                let ident = self.identifier()?;
                self.skip_whitespace();
                if matches!(self.peek(), Some(b'[' | b'(')) {
                    self.pos = start;
                    self.node().map(Value::Node)
                } else {
                    Ok(Value::Keyword(ident))
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn text(&mut self) -> Result<String, Error> {
        // Opening quote
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                Some(b'"') if self.src.get(self.pos + 1) == Some(&b'"') => {
                    bytes.push(b'"');
                    self.pos += 2;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => {
                    bytes.push(c);
                    self.pos += 1;
                }
                None => return Err(self.error("unterminated string")),
            }
        }
        String::from_utf8(bytes).map_err(|_| self.error("string is not valid UTF-8"))
    }

    fn number(&mut self) -> Result<f64, Error> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == b'.') {
            self.pos += 1;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("number is not valid UTF-8"))?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(Error::InvalidWkt {
                position: start,
                msg: format!("number '{text}' is out of range"),
            }),
            Err(_) => Err(Error::InvalidWkt {
                position: start,
                msg: format!("invalid number '{text}'"),
            }),
        }
    }
}
