//! Single-pass tokenizer and tree builder
//!
//! One forward pass over the buffer drives a small position machine and
//! links nodes into the arenas as it goes:
//! - `<` opens a tag, `>` opens or closes a body, `/` marks closing tags
//! - comments, CDATA-like spans and declarations are skipped verbatim
//! - in mutating mode, names, values and text runs are NUL-terminated in place

use super::scanner::{is_quote, is_space, Scanner};
use crate::arena::{AllocError, Arena};
use crate::dom::{AttrId, Attribute, Document, Node, NodeId, Span};
use crate::error::{Construct, ParseError, SyntaxError, SyntaxErrorKind};
use crate::options::ParseOptions;

/// Synthetic parent of every top-level node
const TOP: NodeId = NodeId(0);

/// Where the cursor sits relative to markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Outside any element body (prolog / epilog)
    None,
    /// After `<`, before the name
    TagOpen,
    /// After `</name` or a self-closing `/`
    TagClose,
    /// Inside an element body
    BodyOpen,
    /// After an element was closed, inside its parent's body
    BodyClose,
    /// After the tag name, among attributes
    AttrOpen,
}

/// Why the scan loop stopped early
enum Halt {
    Syntax(SyntaxError),
    Alloc(AllocError),
}

impl From<SyntaxError> for Halt {
    fn from(err: SyntaxError) -> Self {
        Halt::Syntax(err)
    }
}

impl From<AllocError> for Halt {
    fn from(err: AllocError) -> Self {
        Halt::Alloc(err)
    }
}

/// Parse a writable buffer
///
/// Unless `options.read_only` is set, the byte following every tag name,
/// attribute name, attribute value and text run is overwritten with NUL so
/// spans double as C strings. The buffer is borrowed for the lifetime of
/// the returned document.
///
/// Input ends at the slice end or at the first NUL byte.
pub fn parse<'a>(buf: &'a mut [u8], options: ParseOptions) -> Result<Document<'a>, ParseError<'a>> {
    check_len(buf.len())?;
    let mutate = !options.read_only;
    Parser::new(Scanner::writable(buf, mutate), options).run()
}

/// Parse a shared buffer without writing to it
pub fn parse_read_only(buf: &[u8], options: ParseOptions) -> Result<Document<'_>, ParseError<'_>> {
    check_len(buf.len())?;
    Parser::new(Scanner::shared(buf), options.read_only(true)).run()
}

fn check_len<'a>(len: usize) -> Result<(), ParseError<'a>> {
    if len > u32::MAX as usize {
        return Err(ParseError::TooLarge { len });
    }
    Ok(())
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    options: ParseOptions,
    nodes: Arena<Node>,
    attrs: Arena<Attribute>,
    position: Position,
    /// Position to restore after a skipped comment / declaration
    resume: Position,
    /// Innermost open element
    current: NodeId,
    /// First byte after the most recent markup
    text_start: usize,
}

impl<'a> Parser<'a> {
    fn new(scanner: Scanner<'a>, options: ParseOptions) -> Self {
        Parser {
            scanner,
            options,
            nodes: Arena::new(),
            attrs: Arena::new(),
            position: Position::None,
            resume: Position::None,
            current: TOP,
            text_start: 0,
        }
    }

    fn run(mut self) -> Result<Document<'a>, ParseError<'a>> {
        if self.scanner.len() == 0 {
            return Err(ParseError::Empty);
        }
        self.nodes.alloc(Node::element(Span::empty(0), None, self.options))?;

        match self.scan() {
            Ok(()) => {
                let doc = self.finish();
                log::trace!(
                    "parsed {} nodes, {} attributes into {} pages ({} bytes)",
                    doc.node_count(),
                    doc.attribute_count(),
                    doc.page_count(),
                    doc.allocated_bytes()
                );
                Ok(doc)
            }
            Err(Halt::Alloc(err)) => Err(ParseError::OutOfMemory(err)),
            Err(Halt::Syntax(error)) => {
                log::debug!("parse halted: {error}");
                let partial = self.finish();
                Err(ParseError::Syntax { error, partial })
            }
        }
    }

    // ========================================================================
    // Scan loop
    // ========================================================================

    fn scan(&mut self) -> Result<(), Halt> {
        loop {
            self.skip_space();
            let Some(byte) = self.scanner.peek() else {
                break;
            };
            match (byte, self.position) {
                (b'<', _) => self.open_markup()?,
                (b'!', Position::TagOpen) => self.skip_bang()?,
                (b'?', Position::TagOpen) => self.skip_declaration()?,
                (b'/', Position::TagOpen) => self.closing_tag()?,
                (b'/', Position::AttrOpen) => self.self_close(),
                (b'>', Position::TagOpen | Position::AttrOpen | Position::TagClose) => {
                    self.close_markup()?
                }
                (_, Position::TagOpen) => self.open_element()?,
                (_, Position::AttrOpen) => self.attribute()?,
                (_, Position::BodyOpen | Position::BodyClose) => self.text()?,
                (_, Position::None | Position::TagClose) => self.scanner.advance(1),
            }
        }
        self.check_end()
    }

    fn check_end(&self) -> Result<(), Halt> {
        let end = self.scanner.len();
        match self.position {
            Position::TagOpen | Position::AttrOpen | Position::TagClose => {
                Err(SyntaxError::unterminated(Construct::Tag, end).into())
            }
            _ if self.current != TOP => Err(SyntaxError::unterminated(Construct::Element, end).into()),
            _ => Ok(()),
        }
    }

    #[inline]
    fn skip_space(&mut self) {
        while self.scanner.peek().is_some_and(is_space) {
            self.scanner.advance(1);
        }
    }

    // ========================================================================
    // Structural bytes
    // ========================================================================

    /// `<`
    fn open_markup(&mut self) -> Result<(), Halt> {
        let at = self.scanner.position();
        if self.position == Position::TagOpen {
            return Err(SyntaxError::unterminated(Construct::Tag, at).into());
        }
        self.resume = self.position;
        self.position = Position::TagOpen;
        self.scanner.advance(1);
        self.scanner.terminate(at);
        Ok(())
    }

    /// `>` ending a start tag, closing tag or self-closing tag
    fn close_markup(&mut self) -> Result<(), Halt> {
        let at = self.scanner.position();
        if self.position == Position::TagClose {
            if self.current == TOP {
                return Err(SyntaxError::new(SyntaxErrorKind::Mismatch, at).into());
            }
            self.current = self.nodes.get(self.current.0).and_then(|n| n.parent).unwrap_or(TOP);
            self.position = Position::BodyClose;
        } else {
            self.position = Position::BodyOpen;
        }
        self.scanner.advance(1);
        self.scanner.terminate(at);
        self.text_start = at + 1;
        Ok(())
    }

    /// `/` after a tag name or attribute
    fn self_close(&mut self) {
        let at = self.scanner.position();
        self.position = Position::TagClose;
        self.scanner.advance(1);
        self.scanner.terminate(at);
    }

    /// `</name`, compared against the open element
    fn closing_tag(&mut self) -> Result<(), Halt> {
        self.scanner.advance(1);
        let start = self.scanner.position();
        let end = self
            .find_from(start, |b| is_space(b) || b == b'>')
            .ok_or_else(|| SyntaxError::unterminated(Construct::ClosingTag, self.scanner.len()))?;

        let open = match self.nodes.get(self.current.0).and_then(Node::as_element) {
            Some(elem) if self.current != TOP => elem.qualified_span(),
            _ => return Err(SyntaxError::new(SyntaxErrorKind::Mismatch, start).into()),
        };
        if self.scanner.slice(start, end) != open.slice(self.scanner.input()) {
            return Err(SyntaxError::new(SyntaxErrorKind::Mismatch, start).into());
        }

        self.scanner.set_position(end);
        self.position = Position::TagClose;
        Ok(())
    }

    // ========================================================================
    // Skipped constructs
    // ========================================================================

    /// `<!--`, `<![` or another `<!` declaration
    fn skip_bang(&mut self) -> Result<(), Halt> {
        let start = self.scanner.position() - 1;
        let end = if self.scanner.starts_with(b"!--") {
            self.scanner.advance(3);
            self.scanner
                .find_seq(b"-->")
                .map(|p| p + 3)
                .ok_or_else(|| SyntaxError::unterminated(Construct::Comment, self.scanner.len()))?
        } else if self.scanner.starts_with(b"![") {
            self.scanner.advance(2);
            self.cdata_end()
                .ok_or_else(|| SyntaxError::unterminated(Construct::CData, self.scanner.len()))?
        } else {
            self.scanner.advance(1);
            self.declaration_end()
                .ok_or_else(|| SyntaxError::unterminated(Construct::Declaration, self.scanner.len()))?
        };
        log::trace!("skipped markup at {start}..{end}");
        self.resume_after(end);
        Ok(())
    }

    /// `<?...>`
    fn skip_declaration(&mut self) -> Result<(), Halt> {
        let end = self
            .scanner
            .find_byte(b'>')
            .map(|p| p + 1)
            .ok_or_else(|| SyntaxError::unterminated(Construct::Declaration, self.scanner.len()))?;
        self.resume_after(end);
        Ok(())
    }

    /// End of a `<![...]]>` or `<![... ]>` span
    fn cdata_end(&mut self) -> Option<usize> {
        loop {
            let p = self.scanner.find_byte(b']')?;
            let tail = self.scanner.slice(p + 1, p + 3);
            if tail == b"]>" || tail == b" >" {
                return Some(p + 3);
            }
            self.scanner.set_position(p + 1);
        }
    }

    /// End of a `<!NAME ...>` declaration, skipping a bracketed subset
    fn declaration_end(&mut self) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            let p = self.scanner.find_byte3(b'[', b']', b'>')?;
            match self.scanner.byte_at(p)? {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                _ if depth == 0 => return Some(p + 1),
                _ => {}
            }
            self.scanner.set_position(p + 1);
        }
    }

    fn resume_after(&mut self, end: usize) {
        self.scanner.set_position(end);
        self.position = self.resume;
        self.text_start = end;
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Element name after `<`
    fn open_element(&mut self) -> Result<(), Halt> {
        let start = self.scanner.position();
        let end = self
            .find_from(start, |b| is_space(b) || b == b'/' || b == b'>')
            .ok_or_else(|| SyntaxError::unterminated(Construct::Tag, self.scanner.len()))?;

        let name = self.scanner.slice(start, end);
        let split = if self.options.prefixes {
            memchr::memchr(b':', name)
        } else {
            None
        };
        let (prefix, tag) = match split {
            Some(i) => (Some(Span::between(start, start + i)), Span::between(start + i + 1, end)),
            None => (None, Span::between(start, end)),
        };

        let mut node = Node::element(tag, Some(self.current), self.options);
        if let Some(elem) = node.as_element_mut() {
            elem.prefix = prefix;
        }
        let id = NodeId(self.nodes.alloc(node)?);
        self.link(self.current, id);
        self.current = id;

        self.scanner.set_position(end);
        self.seal_at_space(end);
        self.position = Position::AttrOpen;
        Ok(())
    }

    /// One attribute of the open start tag
    fn attribute(&mut self) -> Result<(), Halt> {
        let start = self.scanner.position();

        // Name
        let (name, name_quote) = match self.scanner.peek().filter(|&b| is_quote(b)) {
            Some(q) => {
                let close = self
                    .find_quote(start + 1, q)
                    .ok_or_else(|| SyntaxError::unterminated(Construct::AttributeName, self.scanner.len()))?;
                self.scanner.set_position(close + 1);
                (self.trimmed(start + 1, close), Some(q))
            }
            None => {
                let end = self
                    .find_escaped(start, |b| is_space(b) || b == b'=' || b == b'>' || b == b'/')
                    .ok_or_else(|| SyntaxError::unterminated(Construct::AttributeName, self.scanner.len()))?;
                self.scanner.set_position(end);
                (Span::between(start, end), None)
            }
        };
        self.skip_space();

        // Value
        let (value, value_quote) = if self.scanner.peek() == Some(b'=') {
            self.scanner.advance(1);
            self.scanner.terminate(name.end());
            self.skip_space();
            let value_start = self.scanner.position();
            match self.scanner.peek() {
                None => {
                    return Err(SyntaxError::unterminated(Construct::AttributeValue, self.scanner.len()).into());
                }
                Some(q) if is_quote(q) => {
                    let close = self
                        .find_quote(value_start + 1, q)
                        .ok_or_else(|| SyntaxError::unterminated(Construct::AttributeValue, self.scanner.len()))?;
                    self.scanner.set_position(close + 1);
                    let value = self.trimmed(value_start + 1, close);
                    self.scanner.terminate(value.end());
                    (value, Some(q))
                }
                Some(_) => {
                    let end = self
                        .find_escaped(value_start, |b| is_space(b) || b == b'>' || b == b'/')
                        .ok_or_else(|| SyntaxError::unterminated(Construct::AttributeValue, self.scanner.len()))?;
                    self.scanner.set_position(end);
                    self.seal_at_space(end);
                    (Span::between(value_start, end), None)
                }
            }
        } else {
            // Valueless: the next attribute, `/` or `>` follows
            self.scanner.terminate(name.end());
            (Span::empty(name.end() as u32), None)
        };

        let head = self.nodes.get(self.current.0).and_then(Node::as_element).and_then(|e| e.first_attr);
        let id = AttrId(self.attrs.alloc(Attribute {
            name,
            value,
            name_quote,
            value_quote,
            next: head,
        })?);
        if let Some(elem) = self.nodes.get_mut(self.current.0).and_then(Node::as_element_mut) {
            elem.first_attr = Some(id);
        }
        Ok(())
    }

    /// Text run from the end of the last markup up to the next `<`
    fn text(&mut self) -> Result<(), Halt> {
        let start = self.text_start.min(self.scanner.position());
        let end = self
            .scanner
            .find_tag_start()
            .ok_or_else(|| SyntaxError::unterminated(Construct::Text, self.scanner.len()))?;
        let id = NodeId(self.nodes.alloc(Node::text(Span::between(start, end), Some(self.current), self.options))?);
        self.link(self.current, id);
        // `<` writes the terminator
        self.scanner.set_position(end);
        Ok(())
    }

    /// Link `child` under `parent` according to the ordering option
    fn link(&mut self, parent: NodeId, child: NodeId) {
        let Some(elem) = self.nodes.get(parent.0).and_then(Node::as_element) else {
            return;
        };
        let (first, last) = (elem.first_child, elem.last_child);

        if self.options.reverse {
            if let Some(node) = self.nodes.get_mut(child.0) {
                node.next_sibling = first;
            }
            if let Some(elem) = self.nodes.get_mut(parent.0).and_then(Node::as_element_mut) {
                elem.first_child = Some(child);
                if last.is_none() {
                    elem.last_child = Some(child);
                }
            }
        } else {
            if let Some(prev) = last.and_then(|l| self.nodes.get_mut(l.0)) {
                prev.next_sibling = Some(child);
            }
            if let Some(elem) = self.nodes.get_mut(parent.0).and_then(Node::as_element_mut) {
                if first.is_none() {
                    elem.first_child = Some(child);
                }
                elem.last_child = Some(child);
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// First position at or after `from` whose byte satisfies `stop`
    fn find_from(&self, from: usize, stop: impl Fn(u8) -> bool) -> Option<usize> {
        let input = self.scanner.input();
        input.get(from..)?.iter().position(|&b| stop(b)).map(|i| from + i)
    }

    /// Like `find_from`, but a backslash hides the byte after it
    fn find_escaped(&self, from: usize, stop: impl Fn(u8) -> bool) -> Option<usize> {
        let input = self.scanner.input();
        let mut i = from;
        while let Some(&b) = input.get(i) {
            if b == b'\\' {
                i += 2;
            } else if stop(b) {
                return Some(i);
            } else {
                i += 1;
            }
        }
        None
    }

    /// Matching close quote at or after `from`
    fn find_quote(&self, from: usize, quote: u8) -> Option<usize> {
        let input = self.scanner.input();
        let mut i = from;
        loop {
            let p = i + memchr::memchr2(quote, b'\\', input.get(i..)?)?;
            if input[p] == quote {
                return Some(p);
            }
            i = p + 2;
        }
    }

    /// `start..end` with the trailing whitespace run removed
    fn trimmed(&self, start: usize, end: usize) -> Span {
        let bytes = self.scanner.slice(start, end);
        let kept = bytes.iter().rposition(|&b| !is_space(b)).map_or(0, |i| i + 1);
        Span::between(start, start + kept)
    }

    /// Consume a whitespace delimiter at `at` and terminate there
    ///
    /// `/` and `>` delimiters are left for their own handlers.
    fn seal_at_space(&mut self, at: usize) {
        if self.scanner.byte_at(at).is_some_and(is_space) {
            self.scanner.advance(1);
            self.scanner.terminate(at);
        }
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    /// Promote the first top-level node to document root
    fn finish(self) -> Document<'a> {
        let Parser {
            scanner,
            options,
            mut nodes,
            attrs,
            ..
        } = self;

        let (first, last) = match nodes.get(TOP.0).and_then(Node::as_element) {
            Some(top) => (top.first_child, top.last_child),
            None => (None, None),
        };
        let root = if options.reverse { last } else { first };

        if let Some(top) = first {
            let mut extra = 0usize;
            let mut cur = nodes.get(top.0).and_then(|n| n.next_sibling);
            while let Some(id) = cur {
                extra += 1;
                cur = nodes.get(id.0).and_then(|n| n.next_sibling);
            }
            if extra > 0 {
                log::debug!("{extra} top-level node(s) after the root are unreachable");
            }
        }

        if let Some(node) = root.and_then(|r| nodes.get_mut(r.0)) {
            node.parent = None;
            node.next_sibling = None;
        }

        Document::from_parts(scanner.into_source(), nodes, attrs, root, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_tags<'a>(doc: &Document<'a>, id: NodeId) -> Vec<&'a [u8]> {
        doc.children(id).map(|c| doc.tag(c)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_read_only(b"", ParseOptions::default()), Err(ParseError::Empty)));
        assert!(matches!(parse_read_only(b"\0<a/>", ParseOptions::default()), Err(ParseError::Empty)));
    }

    #[test]
    fn test_self_closing_and_empty_body() {
        for src in [&b"<a/>"[..], b"<a></a>", b"<a />", b"  <a>  </a>  "] {
            let doc = parse_read_only(src, ParseOptions::default()).unwrap();
            let root = doc.root().unwrap();
            assert_eq!(doc.tag(root), b"a");
            assert_eq!(doc.children(root).count(), 0);
            assert_eq!(doc.attributes(root).count(), 0);
        }
    }

    #[test]
    fn test_forward_and_reverse_order() {
        let src = b"<r><a/><b/><c/></r>";
        let doc = parse_read_only(src, ParseOptions::default()).unwrap();
        assert_eq!(child_tags(&doc, doc.root().unwrap()), vec![&b"a"[..], b"b", b"c"]);

        let doc = parse_read_only(src, ParseOptions::default().reverse(true)).unwrap();
        assert_eq!(child_tags(&doc, doc.root().unwrap()), vec![&b"c"[..], b"b", b"a"]);
    }

    #[test]
    fn test_attribute_order_and_quotes() {
        let doc = parse_read_only(b"<a x=\"1\" y='2' z=`3`/>", ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();
        let attrs: Vec<_> = doc
            .attributes(root)
            .map(|a| (doc.attr_name(a), doc.attr_value(a), doc.attr(a).unwrap().value_quote))
            .collect();
        assert_eq!(
            attrs,
            vec![
                (&b"z"[..], &b"3"[..], Some(b'`')),
                (&b"y"[..], &b"2"[..], Some(b'\'')),
                (&b"x"[..], &b"1"[..], Some(b'"')),
            ]
        );
    }

    #[test]
    fn test_attribute_forms() {
        let src = b"<a k = v \"quoted name\"='x' flag esc='a\\'b' trail='t  '>x</a>";
        let doc = parse_read_only(src, ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();
        let get = |name: &str| doc.attr_value(doc.attribute(root, name).unwrap());
        assert_eq!(get("k"), b"v");
        assert_eq!(get("quoted name"), b"x");
        assert_eq!(get("flag"), b"");
        assert_eq!(get("esc"), b"a\\'b");
        assert_eq!(get("trail"), b"t");
    }

    #[test]
    fn test_unquoted_value_before_close() {
        let doc = parse_read_only(b"<a n=5/><b/>", ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.attr_value(doc.attribute(root, "n").unwrap()), b"5");
        assert_eq!(doc.children(root).count(), 0);
    }

    #[test]
    fn test_prefix_split() {
        let src = b"<ns:tag attr=\"v\"></ns:tag>";
        let doc = parse_read_only(src, ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.prefix(root), Some(&b"ns"[..]));
        assert_eq!(doc.tag(root), b"tag");

        let doc = parse_read_only(src, ParseOptions::none()).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.prefix(root), None);
        assert_eq!(doc.tag(root), b"ns:tag");
    }

    #[test]
    fn test_text_keeps_leading_whitespace() {
        let doc = parse_read_only(b"<a>  hi there </a>", ParseOptions::default()).unwrap();
        let text = doc.children(doc.root().unwrap()).next().unwrap();
        assert_eq!(doc.text(text), Some(&b"  hi there "[..]));
    }

    #[test]
    fn test_skipped_markup() {
        let src = b"<?xml version=\"1.0\"?>\n\
            <!DOCTYPE r [ <!ELEMENT r ANY> ]>\n\
            <r><!-- <x/> --><![CDATA[ <y/> ]]><z/></r>";
        let doc = parse_read_only(src, ParseOptions::default()).unwrap();
        assert_eq!(child_tags(&doc, doc.root().unwrap()), vec![&b"z"[..]]);
    }

    #[test]
    fn test_text_restarts_after_comment() {
        let doc = parse_read_only(b"<a>one<!--c-->two</a>", ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();
        let texts: Vec<_> = doc.children(root).filter_map(|c| doc.text(c)).collect();
        assert_eq!(texts, vec![&b"one"[..], b"two"]);
    }

    #[test]
    fn test_mismatch() {
        let err = parse_read_only(b"<a><b></a>", ParseOptions::default()).unwrap_err();
        assert_eq!(err.syntax().map(|e| e.kind), Some(SyntaxErrorKind::Mismatch));

        // Same prefix, different length
        let err = parse_read_only(b"<ab></a>", ParseOptions::default()).unwrap_err();
        assert_eq!(err.syntax().map(|e| e.kind), Some(SyntaxErrorKind::Mismatch));

        let err = parse_read_only(b"<a/></a>", ParseOptions::default()).unwrap_err();
        assert_eq!(err.syntax().map(|e| e.kind), Some(SyntaxErrorKind::Mismatch));
    }

    #[test]
    fn test_unterminated() {
        let cases: [(&[u8], Construct); 8] = [
            (b"<a", Construct::Tag),
            (b"<<a>", Construct::Tag),
            (b"<a x='1", Construct::AttributeValue),
            (b"<a 'x", Construct::AttributeName),
            (b"<a><!-- x", Construct::Comment),
            (b"<a></a", Construct::ClosingTag),
            (b"<a>text", Construct::Text),
            (b"<a><b/>", Construct::Element),
        ];
        for (src, construct) in cases {
            let err = parse_read_only(src, ParseOptions::default()).unwrap_err();
            assert_eq!(
                err.syntax().map(|e| e.kind),
                Some(SyntaxErrorKind::Unterminated(construct)),
                "{}",
                String::from_utf8_lossy(src)
            );
        }
    }

    #[test]
    fn test_partial_tree_kept() {
        let err = parse_read_only(b"<r><a/><b><c>", ParseOptions::default()).unwrap_err();
        let partial = err.into_partial().unwrap();
        let root = partial.root().unwrap();
        assert_eq!(child_tags(&partial, root), vec![&b"a"[..], b"b"]);
    }

    #[test]
    fn test_mutating_terminates_spans() {
        let mut buf = b"<r k='v'><p:leaf>text</p:leaf><e/></r>".to_vec();
        let doc = parse(&mut buf, ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();
        let leaf = doc.children(root).next().unwrap();
        let elem = doc.element(leaf).unwrap();
        assert_eq!(doc.cstr(elem.tag).unwrap().to_bytes(), b"leaf");

        let attr = doc.attribute(root, "k").unwrap();
        let a = doc.attr(attr).unwrap();
        assert_eq!(doc.cstr(a.name).unwrap().to_bytes(), b"k");
        assert_eq!(doc.cstr(a.value).unwrap().to_bytes(), b"v");

        let text = doc.first_text(leaf).unwrap();
        let span = doc.node(text).unwrap().text_span().unwrap();
        assert_eq!(doc.cstr(span).unwrap().to_bytes(), b"text");

        let e = doc.child_element(root, "e").unwrap();
        assert_eq!(doc.cstr(doc.element(e).unwrap().tag).unwrap().to_bytes(), b"e");
    }

    #[test]
    fn test_read_only_flag_on_writable_buffer() {
        let original = b"<r a='1'><b>t</b></r>".to_vec();
        let mut buf = original.clone();
        {
            let doc = parse(&mut buf, ParseOptions::default().read_only(true)).unwrap();
            assert!(doc.root().is_some());
        }
        assert_eq!(buf, original);
    }

    #[test]
    fn test_embedded_nul_stops_input() {
        let doc = parse_read_only(b"<a/>\0garbage<", ParseOptions::default()).unwrap();
        assert_eq!(doc.tag(doc.root().unwrap()), b"a");
    }

    #[test]
    fn test_declaration_only() {
        let doc = parse_read_only(b"<?xml version='1.0'?>", ParseOptions::default()).unwrap();
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_extra_top_level_unreachable() {
        for options in [ParseOptions::default(), ParseOptions::default().reverse(true)] {
            let doc = parse_read_only(b"<a/><b/>", options).unwrap();
            let root = doc.root().unwrap();
            assert_eq!(doc.tag(root), b"a");
            assert_eq!(doc.next_sibling(root), None);
            assert_eq!(doc.parent(root), None);
        }
    }
}
