//! Share links for the final screen
//!
//! The browser driver percent-encodes these with `encodeURIComponent` before
//! building the `mailto:` link.

/// Subject line of the share email
pub const SHARE_SUBJECT: &str = "Try Challenge Blaster - A Fun Arcade Game!";

/// Prompt shown when the clipboard is unavailable
pub const COPY_PROMPT: &str = "Copy this link:";

/// How long the "link copied" note stays visible
pub const COPY_CONFIRMATION_MS: i32 = 2000;

/// The page address without its query string
pub fn game_link(href: &str) -> &str {
    href.split('?').next().unwrap_or(href)
}

/// Body of the share email, pointing at `link`
pub fn share_body(link: &str) -> String {
    format!(
        "Hey!\n\nI just played Challenge Blaster - it's a fun arcade game about workforce challenges.\n\nGive it a try: {}\n\nSee if you can beat my score!",
        link
    )
}

/// Assemble a `mailto:` URL from already-encoded parts
pub fn mailto(encoded_subject: &str, encoded_body: &str) -> String {
    format!("mailto:?subject={}&body={}", encoded_subject, encoded_body)
}
