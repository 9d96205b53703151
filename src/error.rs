//! Parse Errors
//!
//! Separates the three ways a parse can end badly:
//! - no document at all (empty or oversized input)
//! - environment failure (arena could not grow)
//! - malformed input, with the partial tree kept for salvage

use std::fmt;
use thiserror::Error;

use crate::arena::AllocError;
use crate::dom::Document;

/// Construct that was still open when input ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// Start tag (`<name ...`), including a `<` seen while one was open
    Tag,
    /// Closing tag name (`</name`)
    ClosingTag,
    AttributeName,
    AttributeValue,
    Comment,
    /// `<![...]]>` span
    CData,
    /// `<?...>` or `<!...>` declaration
    Declaration,
    /// Text run not followed by `<`
    Text,
    /// Element body never closed
    Element,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Construct::Tag => "tag",
            Construct::ClosingTag => "closing tag",
            Construct::AttributeName => "attribute name",
            Construct::AttributeValue => "attribute value",
            Construct::Comment => "comment",
            Construct::CData => "CDATA section",
            Construct::Declaration => "declaration",
            Construct::Text => "text",
            Construct::Element => "element",
        };
        f.write_str(name)
    }
}

/// What went wrong in the scan loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// Closing tag does not match the open element
    #[error("closing tag does not match open element")]
    Mismatch,
    /// Input ended before the construct was finished
    #[error("unterminated {0}")]
    Unterminated(Construct),
}

/// Structural error with the byte offset where scanning halted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize) -> Self {
        SyntaxError { kind, offset }
    }

    pub(crate) fn unterminated(construct: Construct, offset: usize) -> Self {
        Self::new(SyntaxErrorKind::Unterminated(construct), offset)
    }
}

/// Failure returned by [`parse`](crate::parse)
#[derive(Debug, Error)]
pub enum ParseError<'a> {
    /// Buffer is empty or starts with NUL
    #[error("empty input")]
    Empty,
    /// Buffer cannot be addressed with 32-bit spans
    #[error("input of {len} bytes exceeds the 4 GiB span limit")]
    TooLarge { len: usize },
    /// Arena could not obtain memory
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] AllocError),
    /// Scanning halted; `partial` holds everything linked before the halt
    #[error("malformed XML: {error}")]
    Syntax {
        #[source]
        error: SyntaxError,
        partial: Document<'a>,
    },
}

impl<'a> ParseError<'a> {
    /// The syntax error, if this is a halted parse
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Borrow the partial document of a halted parse
    pub fn partial(&self) -> Option<&Document<'a>> {
        match self {
            ParseError::Syntax { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Take the partial document of a halted parse
    pub fn into_partial(self) -> Option<Document<'a>> {
        match self {
            ParseError::Syntax { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// True for environment failures rather than malformed input
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::OutOfMemory(_))
    }
}
