/// Trailing segment of a namespaced id, e.g. `project/unshape` -> `unshape`.
pub fn short_label(id: &str) -> &str {
    id.rsplit_once('/').map(|(_, rest)| rest).unwrap_or(id)
}
