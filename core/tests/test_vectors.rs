//! Verify response parsing against JSON test vectors in `test-vectors/`.
//!
//! Each case carries a raw body plus either the update id expected out of
//! it (null for a well-formed body with nothing to extract) or the name of
//! the expected error variant.

use updates_core::{ExtractError, PollError, TokenizeError, UpdatesClient};

const TOKEN_CAPACITY: usize = 256;

fn client() -> UpdatesClient {
    UpdatesClient::new("http://localhost:8081", "TESTTOKEN")
}

fn error_name(err: &PollError) -> &'static str {
    match err {
        PollError::Tokenize(TokenizeError::UnexpectedEnd) => "UnexpectedEnd",
        PollError::Tokenize(TokenizeError::InvalidCharacter { .. }) => "InvalidCharacter",
        PollError::Tokenize(TokenizeError::TooManyTokens(_)) => "TooManyTokens",
        PollError::Extract(ExtractError::UnexpectedRoot) => "UnexpectedRoot",
        PollError::Extract(ExtractError::ExpectedArray(_)) => "ExpectedArray",
        PollError::Extract(ExtractError::ExpectedObject(_)) => "ExpectedObject",
        PollError::Extract(ExtractError::MissingField(_)) => "MissingField",
        PollError::InvalidUpdateId(_) => "InvalidUpdateId",
        _ => "other",
    }
}

#[test]
fn extraction_test_vectors() {
    let raw = include_str!("../../test-vectors/extract.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let body = case["body"].as_str().unwrap().as_bytes();

        let result = c.parse_get_updates(body, TOKEN_CAPACITY);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(
                error_name(&err),
                expected_error.as_str().unwrap(),
                "{name}: error kind"
            );
        } else {
            let id = result.unwrap();
            assert_eq!(
                id,
                case["expected_update_id"].as_u64(),
                "{name}: extracted id"
            );
        }
    }
}

#[test]
fn token_capacity_bound_applies_to_real_bodies() {
    // A body with more values than the capacity allows must fail loudly.
    let mut body = String::from(r#"{"ok":true,"result":["#);
    for i in 0..50 {
        if i > 0 {
            body.push(',');
        }
        body.push_str(&format!(r#"{{"update_id":{i}}}"#));
    }
    body.push_str("]}");

    let c = client();
    let err = c.parse_get_updates(body.as_bytes(), 16).unwrap_err();
    assert_eq!(error_name(&err), "TooManyTokens");

    // The same body fits a generous capacity.
    assert_eq!(
        c.parse_get_updates(body.as_bytes(), 256).unwrap(),
        Some(49)
    );
}
