//! Splits template text into literal runs and `${ ... }` expression spans.

use std::borrow::Cow;

use minijinja::{Error, ErrorKind};

/// A piece of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text passed through unchanged
    Literal(&'a str),
    /// Source of an expression, without the `${` and `}` delimiters
    Expression { source: &'a str, line: usize },
}

/// Scans `text` into segments.
///
/// `\${` produces a literal `${`. Inside a span, braces nest and quoted string
/// literals are skipped, so `${ {"a": "}"}["a"] }` is a single expression.
///
/// # Errors
/// * `ErrorKind::SyntaxError` for an unterminated or empty span
pub fn scan(text: &str) -> Result<Vec<Segment<'_>>, Error> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if text[i + 1..].starts_with("${") => {
                push_literal(&mut segments, &text[literal_start..i]);
                push_literal(&mut segments, &text[i + 1..i + 3]);
                i += 3;
                literal_start = i;
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                push_literal(&mut segments, &text[literal_start..i]);
                let line = line_of(text, i);
                let start = i + 2;
                let end = find_closing(bytes, start).ok_or_else(|| {
                    Error::new(
                        ErrorKind::SyntaxError,
                        format!("unterminated `${{` expression at line {line}"),
                    )
                })?;
                let source = &text[start..end];
                if source.trim().is_empty() {
                    return Err(Error::new(
                        ErrorKind::SyntaxError,
                        format!("empty `${{}}` expression at line {line}"),
                    ));
                }
                segments.push(Segment::Expression { source, line });
                i = end + 1;
                literal_start = i;
            }
            _ => i += 1,
        }
    }
    push_literal(&mut segments, &text[literal_start..]);

    Ok(segments)
}

fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, literal: &'a str) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
}

/// Finds the `}` closing a span whose body starts at `start`.
fn find_closing(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' => depth += 1,
                b'}' if depth == 0 => return Some(i),
                b'}' => depth -= 1,
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Quotes bare identifier keys of map literals, so `{x: "v"}` reads as `{"x": "v"}`.
///
/// A key is an identifier directly after `{`, or after `,` inside a map, that
/// is followed by `:`. String literals and slices such as `items[1:2]` are
/// left alone.
pub fn quote_bare_keys(source: &str) -> Cow<'_, str> {
    let bytes = source.as_bytes();
    let mut nesting: Vec<u8> = Vec::new();
    let mut quote: Option<u8> = None;
    let mut at_key = false;
    let mut quoted = String::new();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => {
                quote = Some(b);
                at_key = false;
            }
            b'{' | b'[' | b'(' => {
                nesting.push(b);
                at_key = b == b'{';
            }
            b'}' | b']' | b')' => {
                nesting.pop();
                at_key = false;
            }
            b',' => at_key = nesting.last() == Some(&b'{'),
            b if b.is_ascii_whitespace() => {}
            b if at_key && (b.is_ascii_alphabetic() || b == b'_') => {
                let end = skip_while(bytes, i, |c| c.is_ascii_alphanumeric() || c == b'_');
                let next = skip_while(bytes, end, |c| c.is_ascii_whitespace());
                if bytes.get(next) == Some(&b':') {
                    quoted.push_str(&source[copied..i]);
                    quoted.push('"');
                    quoted.push_str(&source[i..end]);
                    quoted.push('"');
                    copied = end;
                }
                at_key = false;
                i = end;
                continue;
            }
            _ => at_key = false,
        }
        i += 1;
    }

    if copied == 0 {
        return Cow::Borrowed(source);
    }
    quoted.push_str(&source[copied..]);
    Cow::Owned(quoted)
}

fn skip_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[start..].iter().position(|&c| !pred(c)).map_or(bytes.len(), |n| start + n)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
