//! Bounded tag search and `name="value"` tokenization.
//!
//! The scanner never interprets the container as XML. It locates the outer
//! section by literal tag search, finds the first program element inside it,
//! and walks that element's attribute tokens byte by byte. All delimiters are
//! ASCII, so every slice boundary it produces is a valid `str` boundary even
//! when the surrounding text holds multi-byte characters.

const OUTER_OPEN: &str = "<tal ";
const OUTER_CLOSE: &str = "</tal>";
const PROGRAM_TAG: &str = "<program";

/// Returns the text from the first `<tal ` up to the first `</tal>` after it.
pub(crate) fn outer_section(text: &str) -> Option<&str> {
    let start = text.find(OUTER_OPEN)?;
    let len = text[start..].find(OUTER_CLOSE)?;
    Some(&text[start..start + len])
}

/// Returns the attribute body of the first `<program` element in `section`.
///
/// The body ends at the first `>` outside a quoted value. Self-closing and
/// open forms (`<program a="1"/>`, `<program a="1">`) produce the same body
/// apart from a trailing `/`, which the tokenizer ignores.
pub(crate) fn program_element(section: &str) -> Option<&str> {
    let bytes = section.as_bytes();
    let mut from = 0;
    while let Some(rel) = section[from..].find(PROGRAM_TAG) {
        let after = from + rel + PROGRAM_TAG.len();
        match bytes.get(after) {
            Some(b) if b.is_ascii_whitespace() => {
                let body = &section[after..];
                let end = element_end(body)?;
                return Some(&body[..end]);
            }
            // `<programs ...>` and friends are different elements.
            _ => from = after,
        }
    }
    None
}

fn element_end(body: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'>' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Iterator over `name="value"` pairs in an element body.
///
/// Names are runs of `[A-Za-z0-9_]`. Whitespace is allowed around `=`.
/// A name that is not followed by a double-quoted value is skipped and the
/// scan resumes at the next name byte. An unterminated value ends the scan.
pub(crate) struct AttributeTokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> AttributeTokens<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn skip_whitespace(&self, mut at: usize) -> usize {
        let bytes = self.text.as_bytes();
        while at < bytes.len() && bytes[at].is_ascii_whitespace() {
            at += 1;
        }
        at
    }
}

impl<'a> Iterator for AttributeTokens<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        let len = bytes.len();

        loop {
            while self.pos < len && !is_name_byte(bytes[self.pos]) {
                self.pos += 1;
            }
            if self.pos >= len {
                return None;
            }

            let name_start = self.pos;
            while self.pos < len && is_name_byte(bytes[self.pos]) {
                self.pos += 1;
            }
            let name = &self.text[name_start..self.pos];

            let eq = self.skip_whitespace(self.pos);
            if bytes.get(eq) != Some(&b'=') {
                continue;
            }
            let quote = self.skip_whitespace(eq + 1);
            if bytes.get(quote) != Some(&b'"') {
                self.pos = quote;
                continue;
            }

            let value_start = quote + 1;
            match bytes[value_start..].iter().position(|&b| b == b'"') {
                Some(value_len) => {
                    self.pos = value_start + value_len + 1;
                    return Some((name, &self.text[value_start..value_start + value_len]));
                }
                None => {
                    self.pos = len;
                    return None;
                }
            }
        }
    }
}
