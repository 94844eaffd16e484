//! Identifier codec: user identifiers to storage keys and back.
//!
//! Raw identifiers are arbitrary text chosen by the client. The storage key
//! has to be usable both as a standalone filename and as a URL path segment,
//! so we run the identifier through unpadded URL-safe base64. The alphabet
//! (`A-Za-z0-9-_`) contains no `/`, `\` or `.`, which rules out directory
//! traversal by construction, and the encoding is injective, so two distinct
//! identifiers can never collapse to the same key.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{CalFeedError, CalFeedResult};

/// Encode a raw user identifier into a filesystem- and URL-safe storage key.
pub fn encode_identifier(raw: &str) -> String {
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Recover the raw identifier from a storage key.
///
/// Fails on keys that were not produced by [`encode_identifier`], which is
/// how the feed path rejects hand-crafted URLs.
pub fn decode_identifier(key: &str) -> CalFeedResult<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(key.as_bytes())
        .map_err(|_| CalFeedError::InvalidKey(key.to_string()))?;

    String::from_utf8(bytes).map_err(|_| CalFeedError::InvalidKey(key.to_string()))
}
