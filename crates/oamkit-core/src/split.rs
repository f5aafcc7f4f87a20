//! Multi-document YAML splitting
//!
//! Documents are separated by lines starting with `---`, optionally followed
//! by whitespace or a comment. The separator line belongs to no document and
//! every yielded document is an exact slice of the input.
//!
//! Splitting works on raw bytes: the separator is plain ASCII, so text
//! encoding is left to whoever decodes each document.

/// File suffixes treated as YAML manifests by default
pub const YAML_EXTENSIONS: &[&str] = &[".yaml", ".yml"];

/// Split a multi-document stream into its documents
///
/// Whitespace-only documents are skipped.
pub fn split_documents(content: &[u8]) -> Documents<'_> {
    Documents::new(content)
}

/// Lazy iterator over the documents of a stream
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    content: &'a [u8],
    /// Start of the document being accumulated
    start: usize,
    /// Start of the next line to inspect
    cursor: usize,
}

impl<'a> Documents<'a> {
    fn new(content: &'a [u8]) -> Self {
        Self {
            content,
            start: 0,
            cursor: 0,
        }
    }
}

impl<'a> Iterator for Documents<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let len = self.content.len();
        while self.start < len {
            if self.cursor >= len {
                let doc = &self.content[self.start..];
                self.start = len;
                if !is_blank(doc) {
                    return Some(doc);
                }
                return None;
            }

            let line_start = self.cursor;
            let line_end = self.content[line_start..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|i| line_start + i + 1)
                .unwrap_or(len);
            self.cursor = line_end;

            if is_separator(&self.content[line_start..line_end]) {
                let doc = &self.content[self.start..line_start];
                self.start = line_end;
                if !is_blank(doc) {
                    return Some(doc);
                }
            }
        }
        None
    }
}

fn is_separator(line: &[u8]) -> bool {
    let Some(rest) = line.strip_prefix(b"---") else {
        return false;
    };
    let rest = rest.trim_ascii();
    rest.is_empty() || rest.starts_with(b"#")
}

fn is_blank(doc: &[u8]) -> bool {
    doc.trim_ascii().is_empty()
}
