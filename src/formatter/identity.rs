//! Identity tag derivation from event tags

use crate::types::EventDetail;

/// Bracketed label naming the client or server process behind an event
///
/// Client events carry `client-version`; server events carry `node-id`.
/// Client wins when both are present.
pub fn identity_tag(detail: &EventDetail) -> Option<String> {
    if let Some(client_version) = detail.tag("client-version") {
        return Some(format!(
            "[client:{}_{}_{}]",
            detail.tag("player-id").unwrap_or_default(),
            detail.tag("player-name").unwrap_or_default(),
            client_version
        ));
    }

    detail.tag("node-id").map(|node_id| {
        format!(
            "[{}:{}_{}]",
            node_id,
            detail.tag("service-handle").unwrap_or("0"),
            detail.tag("service-name").unwrap_or_default()
        )
    })
}
