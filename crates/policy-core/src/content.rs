//! Structural check for policy document content

const POLICIES_OPEN: &str = "<policies>";
const POLICIES_CLOSE: &str = "</policies>";

/// Classify a policy document as structurally acceptable.
///
/// All of the following must hold:
///
/// 1. the content is non-empty after trimming surrounding whitespace;
/// 2. the trimmed content starts with `<` and ends with `>`;
/// 3. it contains the literal substrings `<policies>` and `</policies>`.
///
/// This is a lexical check, not an XML parse. It accepts malformed XML that
/// merely contains both substrings, and it rejects well-formed documents
/// whose root is spelled differently: `<policies/>`, `<policies xmlns="...">`
/// or a prefixed `<p:policies>` all fail. The service performs the real
/// validation when the policy is written; callers depend on this exact lax
/// behavior, so do not tighten it here.
pub fn validate(content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return false;
    }
    if !trimmed.starts_with('<') || !trimmed.ends_with('>') {
        return false;
    }
    trimmed.contains(POLICIES_OPEN) && trimmed.contains(POLICIES_CLOSE)
}
