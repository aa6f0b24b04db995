use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Longest name Nix accepts in a store path.
pub const NAME_MAX_LEN: usize = 207;

/// Characters allowed in a store path name.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '_' | '?' | '=' | '-')
}

/// A name usable in a store path: `[a-zA-Z0-9+._?=-]`, no leading `.`,
/// between 1 and 207 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreName(String);

impl StoreName {
    /// Creates a valid store name from a potentially invalid one.
    ///
    /// Matches `lib.strings.sanitizeDerivationName` in Nixpkgs: leading
    /// dots are stripped, each maximal run of forbidden characters is
    /// collapsed into a single `_`, the result is truncated to
    /// [`NAME_MAX_LEN`] characters, and an empty result falls back to the
    /// literal `unknown`.
    ///
    /// Total function: never fails, and is idempotent on its own output.
    pub fn sanitize(name: &str) -> StoreName {
        let stripped = name.trim_start_matches('.');
        let mut out = String::with_capacity(stripped.len().min(NAME_MAX_LEN));
        let mut in_run = false;
        for c in stripped.chars() {
            // Everything pushed below is ASCII, so the byte count is the
            // character count.
            if out.len() == NAME_MAX_LEN {
                break;
            }
            if is_name_char(c) {
                out.push(c);
                in_run = false;
            } else if !in_run {
                out.push('_');
                in_run = true;
            }
        }
        if out.is_empty() {
            out.push_str("unknown");
        }
        StoreName(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StoreName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum StoreNameError {
    #[error("store path name is empty or longer than {NAME_MAX_LEN} characters")]
    NameLength,
    #[error("store path name starts with a '.'")]
    LeadingDot,
    #[error("store path name contains forbidden byte 0x{1:02x} at offset {0}")]
    Symbol(usize, u8),
}

impl FromStr for StoreName {
    type Err = StoreNameError;

    /// Strict parse of an already-valid name; use [`StoreName::sanitize`]
    /// to coerce arbitrary input instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > NAME_MAX_LEN {
            return Err(StoreNameError::NameLength);
        }
        if s.starts_with('.') {
            return Err(StoreNameError::LeadingDot);
        }
        for (idx, byte) in s.bytes().enumerate() {
            if !is_name_char(byte as char) || !byte.is_ascii() {
                return Err(StoreNameError::Symbol(idx, byte));
            }
        }
        Ok(StoreName(s.to_owned()))
    }
}


#[cfg(test)]
mod proptests {
    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::*;

    proptest! {
        #[test]
        fn proptest_totality(input: String) {
            let name = StoreName::sanitize(&input);
            let s = name.as_str();
            prop_assert!(!s.is_empty());
            prop_assert!(s.len() <= NAME_MAX_LEN);
            prop_assert!(!s.starts_with('.'));
            prop_assert!(s.chars().all(is_name_char));
        }

        #[test]
        fn proptest_idempotent(input: String) {
            let once = StoreName::sanitize(&input);
            let twice = StoreName::sanitize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn proptest_sanitized_parses(input: String) {
            let name = StoreName::sanitize(&input);
            prop_assert_eq!(name.as_str().parse::<StoreName>().unwrap(), name);
        }
    }
}
