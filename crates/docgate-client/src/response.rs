//! Authority response parsing.

use docgate_acl::token::TokenSet;

/// Prefix marking an access-token line.
pub const TOKEN_PREFIX: &str = "TOKEN:";

/// Extract access tokens from a decoded response body.
///
/// Each line starting with [`TOKEN_PREFIX`] contributes its remainder,
/// verbatim. Other lines (authority status notices and the like) are
/// logged and skipped.
pub fn parse_token_lines(body: &str) -> TokenSet {
    let mut tokens = TokenSet::new();
    for line in body.lines() {
        match line.strip_prefix(TOKEN_PREFIX) {
            Some(token) => {
                tokens.insert(token);
            }
            None if line.is_empty() => {}
            None => log::info!("Saw authority response line: {line}"),
        }
    }
    tokens
}
