use crate::classify::ClassifiedToken;

/// Inclusive token range of a candidate geoword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

/// Find the next candidate span at or after `from`.
///
/// The span starts at a head, or at a prefix directly followed by a head,
/// and extends over body tokens while the surface stays within `max_len`
/// bytes. Returns `None` when no head remains.
pub(crate) fn find_candidate(
    stream: &[ClassifiedToken],
    from: usize,
    max_len: usize,
) -> Option<Span> {
    let start = (from..stream.len()).find(|&i| {
        let roles = &stream[i].roles;
        roles.head
            || (roles.prefix && stream.get(i + 1).is_some_and(|next| next.roles.head))
    })?;
    let head = if stream[start].roles.head {
        start
    } else {
        start + 1
    };

    let mut len: usize = stream[start..=head].iter().map(|t| t.surface().len()).sum();
    let mut end = head;
    while let Some(next) = stream.get(end + 1) {
        if !next.roles.body || len + next.surface().len() > max_len {
            break;
        }
        len += next.surface().len();
        end += 1;
    }
    Some(Span { start, end })
}

/// Concatenated surface of `stream[start..=end]`.
pub(crate) fn join_surface(stream: &[ClassifiedToken], start: usize, end: usize) -> String {
    stream[start..=end].iter().map(|t| t.surface()).collect()
}
