/// Clients send `Authorization: <relay credential>, <helpdesk credential>`.
/// Only the helpdesk credential is passed upstream; a value without a comma
/// is passed whole.
pub fn rewrite_authorization(value: &str) -> &str {
    match value.split(',').nth(1) {
        Some(second) => second.trim_start(),
        None => value.trim_start(),
    }
}
