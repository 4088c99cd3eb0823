//! RFC 1459 case-mapping for nickname comparison.
//!
//! Nicknames that differ only in case, or in the `[]\~` / `{}|^` pairs, name
//! the same user. Stored records keep the exact spelling; only in-memory
//! bookkeeping (pending WHOIS lookups, own-nick checks) folds case.

#[inline]
const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// Fold a nickname to its canonical lowercase form.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Case-insensitive nickname equality.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .chars()
            .zip(b.chars())
            .all(|(ca, cb)| irc_lower_char(ca) == irc_lower_char(cb))
}
