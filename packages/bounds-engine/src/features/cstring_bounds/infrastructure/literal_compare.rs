//! Static comparison of string literals

use std::cmp::Ordering;

/// Compare two literals the way `strcmp`/`strncmp` would.
///
/// Stops at the first NUL of either side and after `limit` bytes when a
/// bound applies; `ignore_case` folds ASCII letters.
pub fn compare_literals(lhs: &[u8], rhs: &[u8], limit: Option<usize>, ignore_case: bool) -> Ordering {
    let lhs = c_prefix(lhs, limit);
    let rhs = c_prefix(rhs, limit);
    if ignore_case {
        let fold = |bytes: &[u8]| bytes.iter().map(u8::to_ascii_lowercase).collect::<Vec<u8>>();
        fold(lhs).cmp(&fold(rhs))
    } else {
        lhs.cmp(rhs)
    }
}

fn c_prefix(bytes: &[u8], limit: Option<usize>) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let end = limit.map_or(end, |limit| end.min(limit));
    &bytes[..end]
}
