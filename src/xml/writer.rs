use quick_xml::escape::{escape, partial_escape};

/// Builds indented XML text.
///
/// Each nested element goes on its own line, indented two spaces per level. With auto-indent
/// turned off, elements are written inline, which is how token elements like `<ci> x </ci>` are
/// kept on one line.
#[derive(Debug, Clone)]
pub struct XmlOutputStream {
    out: String,
    indent: usize,
    auto_indent: bool,

    /// A start tag has been written but not yet closed with `>`, so attributes can still be added.
    in_start: bool,

    /// Text was the last thing written inside the current element.
    in_text: bool,
}

impl Default for XmlOutputStream {
    fn default() -> Self {
        XmlOutputStream { out: String::new(), indent: 0, auto_indent: true, in_start: false, in_text: false }
    }
}

impl XmlOutputStream {
    pub fn new() -> XmlOutputStream {
        XmlOutputStream::default()
    }

    pub fn write_xml_decl(&mut self) {
        self.out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }

    pub fn set_auto_indent(&mut self, auto_indent: bool) {
        self.auto_indent = auto_indent;
    }

    pub fn start_element(&mut self, name: &str) {
        self.close_start_tag();
        self.in_start = true;
        self.write_indent(false);
        self.out.push('<');
        self.out.push_str(name);
    }

    pub fn end_element(&mut self, name: &str) {
        if self.in_start {
            self.in_start = false;
            self.out.push_str("/>");
        } else if self.in_text {
            self.in_text = false;
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        } else {
            self.indent = self.indent.saturating_sub(1);
            self.write_indent(true);
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        }
    }

    /// Writes `<name/>`.
    pub fn start_end_element(&mut self, name: &str) {
        self.close_start_tag();
        self.write_indent(false);
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str("/>");
    }

    /// Adds an attribute to the start tag being written. Ignored once the tag has been closed.
    pub fn write_attribute(&mut self, name: &str, value: &str) {
        if !self.in_start {
            return;
        }
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape(value));
        self.out.push('"');
    }

    pub fn write_chars(&mut self, text: &str) {
        if self.in_start {
            self.in_start = false;
            self.out.push('>');
        }
        self.out.push_str(&partial_escape(text));
        self.in_text = true;
    }

    /// Writes markup which is already serialized, such as a preserved annotation, as a child of
    /// the current element.
    pub fn write_markup(&mut self, markup: &str) {
        self.close_start_tag();
        self.write_indent(false);
        self.out.push_str(markup);
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn close_start_tag(&mut self) {
        if self.in_start {
            self.in_start = false;
            self.out.push('>');
            self.indent += 1;
        }
    }

    fn write_indent(&mut self, is_end: bool) {
        if !self.auto_indent {
            return;
        }
        if self.indent > 0 || is_end {
            self.out.push('\n');
        }
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nesting() {
        let mut out = XmlOutputStream::new();
        out.start_element("apply");
        out.start_end_element("plus");
        out.start_element("ci");
        out.set_auto_indent(false);
        out.write_chars(" x ");
        out.end_element("ci");
        out.set_auto_indent(true);
        out.end_element("apply");

        assert_eq!(out.into_string(), "<apply>\n  <plus/>\n  <ci> x </ci>\n</apply>");
    }

    #[test]
    fn test_escaping() {
        let mut out = XmlOutputStream::new();
        out.start_element("ci");
        out.write_attribute("definitionURL", "a\"b&c");
        out.write_chars(" x<y ");
        out.end_element("ci");

        assert_eq!(out.into_string(), "<ci definitionURL=\"a&quot;b&amp;c\"> x&lt;y </ci>");
    }
}
