//! Stateless request builder and response parser for the Bot API's
//! `getUpdates` call.
//!
//! # Design
//! `UpdatesClient` holds only the API base and the bot token and carries no
//! mutable state between calls. Building the request URL and parsing the
//! response body are separate halves; the poll loop executes the transport
//! round-trip in between. Parsing runs the bounded tokenizer and the
//! last-element extraction, then interprets the span as a base-10 unsigned
//! integer — the one place the raw text becomes a number.

use crate::error::PollError;
use crate::extract::last_array_element_field;
use crate::tokenizer::tokenize;

/// Top-level key of the array holding updates.
pub const RESULT_KEY: &str = "result";
/// Field extracted from the newest update.
pub const UPDATE_ID_KEY: &str = "update_id";

const GET_UPDATES_METHOD: &str = "getUpdates";

/// Stateless client for the `getUpdates` endpoint.
#[derive(Debug, Clone)]
pub struct UpdatesClient {
    base_url: String,
    token: String,
}

impl UpdatesClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Format the poll URL: the bare endpoint without an offset, otherwise
    /// `?offset=<n>` to skip everything already seen.
    pub fn get_updates_url(&self, offset: Option<u64>) -> String {
        match offset {
            Some(offset) => format!(
                "{}/bot{}/{}?offset={}",
                self.base_url, self.token, GET_UPDATES_METHOD, offset
            ),
            None => format!("{}/bot{}/{}", self.base_url, self.token, GET_UPDATES_METHOD),
        }
    }

    /// Pull the newest `update_id` out of a complete response body.
    ///
    /// `Ok(None)` means a well-formed response with no updates in it.
    pub fn parse_get_updates(
        &self,
        body: &[u8],
        token_capacity: usize,
    ) -> Result<Option<u64>, PollError> {
        let tokens = tokenize(body, token_capacity)?;
        let span = last_array_element_field(body, &tokens, RESULT_KEY, UPDATE_ID_KEY)?;
        match span {
            None => Ok(None),
            Some(text) => {
                let text = std::str::from_utf8(text)
                    .map_err(|_| PollError::InvalidUpdateId(String::from_utf8_lossy(text).into_owned()))?;
                let id = text
                    .parse::<u64>()
                    .map_err(|_| PollError::InvalidUpdateId(text.to_string()))?;
                Ok(Some(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, TokenizeError};

    fn client() -> UpdatesClient {
        UpdatesClient::new("https://api.example.org", "123:SECRET")
    }

    #[test]
    fn bare_endpoint_without_offset() {
        assert_eq!(
            client().get_updates_url(None),
            "https://api.example.org/bot123:SECRET/getUpdates"
        );
    }

    #[test]
    fn offset_becomes_a_query_parameter() {
        assert_eq!(
            client().get_updates_url(Some(102)),
            "https://api.example.org/bot123:SECRET/getUpdates?offset=102"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = UpdatesClient::new("https://api.example.org/", "t");
        assert_eq!(
            client.get_updates_url(None),
            "https://api.example.org/bott/getUpdates"
        );
    }

    #[test]
    fn parses_newest_update_id() {
        let body = br#"{"ok":true,"result":[{"update_id":100,"x":1},{"update_id":101,"x":2}]}"#;
        assert_eq!(client().parse_get_updates(body, 64).unwrap(), Some(101));
    }

    #[test]
    fn empty_result_parses_to_none() {
        let body = br#"{"ok":true,"result":[]}"#;
        assert_eq!(client().parse_get_updates(body, 64).unwrap(), None);
    }

    #[test]
    fn malformed_body_surfaces_tokenizer_error() {
        let err = client().parse_get_updates(br#"{"ok":tru"#, 64).unwrap_err();
        assert!(matches!(err, PollError::Tokenize(TokenizeError::UnexpectedEnd)));
    }

    #[test]
    fn wrong_shape_surfaces_extract_error() {
        let body = br#"{"ok":true,"result":{"update_id":1}}"#;
        let err = client().parse_get_updates(body, 64).unwrap_err();
        assert!(matches!(err, PollError::Extract(ExtractError::ExpectedArray(_))));
    }

    #[test]
    fn non_numeric_update_id_is_rejected() {
        let body = br#"{"result":[{"update_id":"abc"}]}"#;
        let err = client().parse_get_updates(body, 64).unwrap_err();
        assert!(matches!(err, PollError::InvalidUpdateId(text) if text == "abc"));
    }

    #[test]
    fn negative_update_id_is_rejected() {
        let body = br#"{"result":[{"update_id":-5}]}"#;
        let err = client().parse_get_updates(body, 64).unwrap_err();
        assert!(matches!(err, PollError::InvalidUpdateId(text) if text == "-5"));
    }
}
