//! Field extraction from a tokenized document.
//!
//! # Design
//! Works directly on the flat token sequence plus the original buffer. The
//! tokenizer's container-span contract lets the walk step over a whole
//! sibling subtree in one bound: the next sibling of token `i` is the first
//! following token whose `start` is at or past `tokens[i].end`. The
//! extractor only ever returns byte spans; numeric interpretation belongs
//! to the caller.

use crate::error::ExtractError;
use crate::tokenizer::{Token, TokenKind};

/// Locate `array_key` among the root object's keys, then `field_key` among
/// the keys of the array's last element, and return the value's byte span.
///
/// `Ok(None)` means the document is shaped as expected but holds nothing to
/// extract: the array key is absent, or the array is empty. Shape
/// violations (non-object root, non-array value, non-object last element,
/// missing field) are reported as [`ExtractError`] so the caller can log
/// the precise miss; none of them are fatal to a poll loop.
///
/// The last element's keys are scanned exhaustively; the field does not
/// have to come first.
pub fn last_array_element_field<'a>(
    buf: &'a [u8],
    tokens: &[Token],
    array_key: &str,
    field_key: &str,
) -> Result<Option<&'a [u8]>, ExtractError> {
    let root = match tokens.first() {
        Some(token) => *token,
        None => return Err(ExtractError::UnexpectedRoot),
    };
    if root.kind != TokenKind::Object {
        return Err(ExtractError::UnexpectedRoot);
    }

    let mut idx = 1;
    while idx < tokens.len() && tokens[idx].start < root.end {
        let key = tokens[idx];
        let value_idx = idx + 1;
        if key.kind != TokenKind::String || value_idx >= tokens.len() {
            // Dangling key; nothing further to walk.
            return Ok(None);
        }
        if string_bytes(buf, &key) == array_key.as_bytes() {
            return field_of_last_element(buf, tokens, value_idx, array_key, field_key);
        }
        idx = next_sibling(tokens, value_idx);
    }
    Ok(None)
}

fn field_of_last_element<'a>(
    buf: &'a [u8],
    tokens: &[Token],
    array_idx: usize,
    array_key: &str,
    field_key: &str,
) -> Result<Option<&'a [u8]>, ExtractError> {
    let array = tokens[array_idx];
    if array.kind != TokenKind::Array {
        return Err(ExtractError::ExpectedArray(array_key.to_string()));
    }

    let mut child = array_idx + 1;
    let mut last = None;
    while child < tokens.len() && tokens[child].start < array.end {
        last = Some(child);
        child = next_sibling(tokens, child);
    }
    let Some(last_idx) = last else {
        return Ok(None);
    };

    let element = tokens[last_idx];
    if element.kind != TokenKind::Object {
        return Err(ExtractError::ExpectedObject(array_key.to_string()));
    }

    let mut idx = last_idx + 1;
    while idx < tokens.len() && tokens[idx].start < element.end {
        let key = tokens[idx];
        let value_idx = idx + 1;
        if key.kind != TokenKind::String
            || value_idx >= tokens.len()
            || tokens[value_idx].start >= element.end
        {
            break;
        }
        if string_bytes(buf, &key) == field_key.as_bytes() {
            return Ok(Some(token_text(buf, &tokens[value_idx])));
        }
        idx = next_sibling(tokens, value_idx);
    }
    Err(ExtractError::MissingField(field_key.to_string()))
}

/// Index of the first token past `tokens[idx]`'s span.
fn next_sibling(tokens: &[Token], idx: usize) -> usize {
    let end = tokens[idx].end;
    let mut next = idx + 1;
    while next < tokens.len() && tokens[next].start < end {
        next += 1;
    }
    next
}

/// A string token's contents, without the quotes.
fn string_bytes<'a>(buf: &'a [u8], token: &Token) -> &'a [u8] {
    &buf[token.start + 1..token.end - 1]
}

/// The lexical text of a value token; strings lose their quotes.
fn token_text<'a>(buf: &'a [u8], token: &Token) -> &'a [u8] {
    match token.kind {
        TokenKind::String => string_bytes(buf, token),
        _ => &buf[token.start..token.end],
    }
}
