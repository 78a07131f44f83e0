//! Syntactic validation for topic names, node names, namespaces and enclave
//! names.
//!
//! All four share the same token grammar (`[A-Za-z_][A-Za-z0-9_]*` segments
//! joined by `/`); topic names additionally allow a leading `~` and `{...}`
//! substitution braces. Every function returns the byte offset of the first
//! offending character alongside the reason, rather than an opaque failure.

use crate::error::NameValidationError as E;

pub const ENCLAVE_NAME_MAX_LENGTH: usize = 4096;

type ValidationResult = std::result::Result<(), (E, usize)>;

/// Validates a fully-qualified or relative topic (or service) name.
///
/// Accepts a leading `~` (alone) or `~/` tilde-expansion marker, and
/// `{substitution}` braces whose inner name follows the same token rule as a
/// path segment.
pub fn validate_topic_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return Err((E::IsEmptyString, 0));
    }
    let bytes = name.as_bytes();

    let mut i = 0;
    if bytes[0] == b'~' {
        if bytes.len() == 1 {
            return Ok(());
        } else if bytes.get(1) == Some(&b'/') {
            i = 2;
        } else {
            return Err((E::TildeNotFollowedByForwardSlash, 1));
        }
    }

    if bytes[bytes.len() - 1] == b'/' {
        return Err((E::EndsWithForwardSlash, bytes.len() - 1));
    }

    let mut token_start = i;
    let mut brace_start: Option<usize> = None;
    let mut j = i;
    while j < bytes.len() {
        let c = bytes[j];
        match c {
            b'~' => return Err((E::MisplacedTilde, j)),
            b'/' => {
                if brace_start.is_some() {
                    return Err((E::SubstitutionContainsUnallowedCharacters, j));
                }
                token_start = j + 1;
                j += 1;
            }
            b'{' => {
                if brace_start.is_some() {
                    return Err((E::SubstitutionContainsUnallowedCharacters, j));
                }
                brace_start = Some(j);
                if let Some(&next) = bytes.get(j + 1) {
                    if next.is_ascii_digit() {
                        return Err((E::SubstitutionStartsWithNumber, j + 1));
                    }
                }
                j += 1;
            }
            b'}' => match brace_start {
                Some(_) => {
                    brace_start = None;
                    token_start = j + 1;
                    j += 1;
                }
                None => return Err((E::UnmatchedCurlyBrace, j)),
            },
            _ => {
                let allowed = c.is_ascii_alphanumeric() || c == b'_';
                if brace_start.is_some() {
                    if !allowed {
                        return Err((E::SubstitutionContainsUnallowedCharacters, j));
                    }
                } else {
                    if !allowed {
                        return Err((E::ContainsUnallowedCharacters, j));
                    }
                    if j == token_start && c.is_ascii_digit() {
                        return Err((E::NameTokenStartsWithNumber, j));
                    }
                }
                j += 1;
            }
        }
    }
    if let Some(start) = brace_start {
        return Err((E::UnmatchedCurlyBrace, start));
    }
    Ok(())
}

/// Validates an absolute namespace: must start with `/`, must not end with
/// `/` (unless it is exactly `/`), no repeated slashes, no substitutions.
pub fn validate_namespace(ns: &str) -> ValidationResult {
    if ns.is_empty() {
        return Err((E::IsEmptyString, 0));
    }
    let bytes = ns.as_bytes();
    if bytes[0] != b'/' {
        return Err((E::NotAbsolute, 0));
    }
    if bytes.len() > 1 && bytes[bytes.len() - 1] == b'/' {
        return Err((E::EndsWithForwardSlash, bytes.len() - 1));
    }

    let mut token_start = 1;
    let mut prev_was_slash = true;
    let mut j = 1;
    while j < bytes.len() {
        let c = bytes[j];
        if c == b'/' {
            if prev_was_slash {
                return Err((E::ContainsRepeatedForwardSlash, j));
            }
            prev_was_slash = true;
            token_start = j + 1;
            j += 1;
            continue;
        }
        prev_was_slash = false;
        if !(c.is_ascii_alphanumeric() || c == b'_') {
            return Err((E::ContainsUnallowedCharacters, j));
        }
        if j == token_start && c.is_ascii_digit() {
            return Err((E::NameTokenStartsWithNumber, j));
        }
        j += 1;
    }
    Ok(())
}

/// Validates a bare node name: a single token, no slashes.
pub fn validate_node_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return Err((E::IsEmptyString, 0));
    }
    let bytes = name.as_bytes();
    if bytes[0].is_ascii_digit() {
        return Err((E::NameTokenStartsWithNumber, 0));
    }
    for (i, &c) in bytes.iter().enumerate() {
        if !(c.is_ascii_alphanumeric() || c == b'_') {
            return Err((E::ContainsUnallowedCharacters, i));
        }
    }
    Ok(())
}

/// Validates an enclave name: namespace rules, plus its own (larger) length
/// ceiling.
pub fn validate_enclave_name(name: &str) -> ValidationResult {
    if name.len() > ENCLAVE_NAME_MAX_LENGTH {
        return Err((E::TooLong, ENCLAVE_NAME_MAX_LENGTH));
    }
    validate_namespace(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_name_valid_examples() {
        for name in [
            "foo", "abc123", "_foo", "Foo", "BAR", "~", "foo/bar", "~/foo", "{foo}_bar",
            "foo/{ping}/bar", "foo/_bar", "foo_/bar", "foo_", "/foo", "/bar/baz",
            "/_private/thing", "/public_namespace/_private/thing", "{foo1}", "{foo_bar}",
            "{_bar}",
        ] {
            assert!(validate_topic_name(name).is_ok(), "expected {name:?} to be valid");
        }
    }

    #[test]
    fn topic_name_invalid_examples() {
        let cases: &[(&str, E, usize)] = &[
            ("123abc", E::NameTokenStartsWithNumber, 0),
            ("123", E::NameTokenStartsWithNumber, 0),
            (" ", E::ContainsUnallowedCharacters, 0),
            ("foo bar", E::ContainsUnallowedCharacters, 3),
            ("/~", E::MisplacedTilde, 1),
            ("~foo", E::TildeNotFollowedByForwardSlash, 1),
            ("foo~", E::MisplacedTilde, 3),
            ("foo~/bar", E::MisplacedTilde, 3),
            ("foo/~bar", E::MisplacedTilde, 4),
            ("foo/~/bar", E::MisplacedTilde, 4),
            ("foo/", E::EndsWithForwardSlash, 3),
            ("", E::IsEmptyString, 0),
            ("foo/123bar", E::NameTokenStartsWithNumber, 4),
            ("foo/bar}/baz", E::UnmatchedCurlyBrace, 7),
            ("foo/{bar", E::UnmatchedCurlyBrace, 4),
            ("{$}", E::SubstitutionContainsUnallowedCharacters, 1),
            ("{{bar}_baz}", E::SubstitutionContainsUnallowedCharacters, 1),
            ("foo/{bar/baz}", E::SubstitutionContainsUnallowedCharacters, 8),
            ("{1foo}", E::SubstitutionStartsWithNumber, 1),
        ];
        for &(name, reason, index) in cases {
            let err = validate_topic_name(name).unwrap_err();
            assert_eq!(err, (reason, index), "mismatch for {name:?}");
        }
    }

    #[test]
    fn namespace_valid_examples() {
        for ns in ["/", "/foo", "/foo/bar"] {
            assert!(validate_namespace(ns).is_ok(), "expected {ns:?} to be valid");
        }
    }

    #[test]
    fn enclave_name_invalid_examples() {
        let cases: &[(&str, E, usize)] = &[
            ("", E::IsEmptyString, 0),
            ("~/foo", E::NotAbsolute, 0),
            ("/foo/", E::EndsWithForwardSlash, 4),
            ("/foo/$", E::ContainsUnallowedCharacters, 5),
            ("/bar#", E::ContainsUnallowedCharacters, 4),
            ("/foo//bar", E::ContainsRepeatedForwardSlash, 5),
            ("/1bar", E::NameTokenStartsWithNumber, 1),
        ];
        for &(name, reason, index) in cases {
            let err = validate_enclave_name(name).unwrap_err();
            assert_eq!(err, (reason, index), "mismatch for {name:?}");
        }
    }

    #[test]
    fn node_name_rejects_leading_digit_and_slash() {
        assert_eq!(validate_node_name("1node").unwrap_err().0, E::NameTokenStartsWithNumber);
        assert_eq!(validate_node_name("a/b").unwrap_err().0, E::ContainsUnallowedCharacters);
    }
}
