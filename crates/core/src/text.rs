// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Escaping, trimming, and quote-aware tokenization for the
//! configuration language.

use crate::error::{Error, Result};

/// Prepend a backslash before every character present in `chars`.
/// The flag reports whether anything was escaped.
pub fn escape(input: &str, chars: &str) -> (String, bool) {
    let mut out = String::with_capacity(input.len());
    let mut escaped = false;
    for c in input.chars() {
        if chars.contains(c) {
            out.push('\\');
            escaped = true;
        }
        out.push(c);
    }
    (out, escaped)
}

/// Inverse of [`escape`]: strip the backslash before members of `chars`.
///
/// A bare trailing member of `chars` is rejected with `InvalidArgs`; it
/// is the signature of an unterminated quote and never appears in
/// output produced by [`escape`].
pub fn unescape(input: &str, chars: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();
    while let Some(c) = it.next() {
        if c == '\\' {
            match it.peek() {
                Some(&n) if chars.contains(n) => {
                    out.push(n);
                    it.next();
                }
                _ => out.push(c),
            }
        } else if chars.contains(c) && it.peek().is_none() {
            return Err(Error::InvalidArgs);
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Strip trailing characters contained in `chars`.
pub fn trim_right<'a>(s: &'a str, chars: &str) -> &'a str {
    s.trim_end_matches(|c| chars.contains(c))
}

/// Split on runs of delimiter characters. More than `max` tokens is
/// `TooManyObjects`.
pub fn tokenize<'a>(s: &'a str, max: usize, delims: &str) -> Result<Vec<&'a str>> {
    let mut tokens = Vec::new();
    for tok in s.split(|c| delims.contains(c)) {
        if tok.is_empty() {
            continue;
        }
        if tokens.len() >= max {
            return Err(Error::TooManyObjects);
        }
        tokens.push(tok);
    }
    Ok(tokens)
}

/// Quote-aware tokenizer.
///
/// Tokens are separated by runs of `delims`. Any character in `quotes`
/// opens a quoted span that runs to the matching quote character and may
/// contain delimiters and backslash-escaped quote marks. An unmatched
/// quote is `QuoteNotClosed`; more than `max` tokens is
/// `TooManyObjects`.
pub fn tokenize_quote(
    s: &str,
    max: usize,
    delims: &str,
    quotes: &str,
) -> Result<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut cur: Option<String> = None;
    let mut it = s.chars().peekable();

    while let Some(c) = it.next() {
        if delims.contains(c) {
            if let Some(tok) = cur.take() {
                if tokens.len() >= max {
                    return Err(Error::TooManyObjects);
                }
                tokens.push(tok);
            }
            continue;
        }
        let tok = cur.get_or_insert_with(String::new);
        if quotes.contains(c) {
            let quote = c;
            let mut closed = false;
            while let Some(q) = it.next() {
                if q == '\\' {
                    match it.next() {
                        Some(n) if quotes.contains(n) || n == '\\' => tok.push(n),
                        Some(n) => {
                            tok.push('\\');
                            tok.push(n);
                        }
                        None => break,
                    }
                } else if q == quote {
                    closed = true;
                    break;
                } else {
                    tok.push(q);
                }
            }
            if !closed {
                return Err(Error::QuoteNotClosed);
            }
        } else {
            tok.push(c);
        }
    }
    if let Some(tok) = cur.take() {
        if tokens.len() >= max {
            return Err(Error::TooManyObjects);
        }
        tokens.push(tok);
    }
    Ok(tokens)
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
