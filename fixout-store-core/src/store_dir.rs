use std::fmt;
use std::path::Path;

use thiserror::Error;

use fixout_utils_base_encoding::base32;

use crate::fixed_output::STORE_PATH_HASH_SIZE;

/// The given path does not name an entry of this store.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("'{path}' is not a store path under '{store_dir}'")]
pub struct InvalidStorePath {
    store_dir: String,
    path: String,
}

/// Location of the store root. Defaults to `/nix/store`.
///
/// Store paths are POSIX paths regardless of host platform, so joining
/// always uses a single literal `/`; trailing separators on the configured
/// root are normalized away at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreDir(String);

impl StoreDir {
    pub fn new(dir: impl Into<String>) -> StoreDir {
        let mut dir = dir.into();
        while dir.len() > 1 && dir.ends_with('/') {
            dir.pop();
        }
        StoreDir(dir)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a store entry onto this root with a single `/`, even when
    /// the root is the filesystem root itself.
    pub(crate) fn join(&self, entry: &str) -> String {
        if self.0.ends_with('/') {
            format!("{}{entry}", self.0)
        } else {
            format!("{}/{entry}", self.0)
        }
    }

    /// Extracts the name component from a store path string.
    ///
    /// The path must be `<store root>/<32 base32 chars>-<name>`; anything
    /// else, including paths under a different root, is rejected. The
    /// name component is returned verbatim, without further validation.
    pub fn store_path_name<'a>(&self, path: &'a str) -> Result<&'a str, InvalidStorePath> {
        let invalid = || InvalidStorePath {
            store_dir: self.0.clone(),
            path: path.to_owned(),
        };

        let rest = path
            .strip_prefix(self.0.as_str())
            .and_then(|rest| {
                if self.0.ends_with('/') {
                    Some(rest)
                } else {
                    rest.strip_prefix('/')
                }
            })
            .ok_or_else(invalid)?;

        let (hash, tail) = rest
            .split_at_checked(base32::encode_len(STORE_PATH_HASH_SIZE))
            .ok_or_else(invalid)?;
        if !hash.bytes().all(|b| base32::ALPHABET_BYTES.contains(&b)) {
            return Err(invalid());
        }
        tail.strip_prefix('-').ok_or_else(invalid)
    }
}

impl Default for StoreDir {
    fn default() -> Self {
        StoreDir("/nix/store".to_owned())
    }
}

impl fmt::Display for StoreDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A full store path: `<store dir>/<base32 path hash>-<name>`.
///
/// Derived, never mutated; values are only produced by the computation in
/// this crate and compared against what the external tool reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorePath(String);

impl StorePath {
    pub(crate) fn new(path: String) -> StorePath {
        StorePath(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StorePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for StorePath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl PartialEq<str> for StorePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StorePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod unittests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("/nix/store", "/nix/store")]
    #[case::trailing_slash("/nix/store/", "/nix/store")]
    #[case::many_trailing("/test/store///", "/test/store")]
    #[case::root_kept("/", "/")]
    fn store_dir_normalization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(StoreDir::new(input).as_str(), expected);
    }

    #[test]
    fn store_dir_default() {
        assert_eq!(StoreDir::default().as_str(), "/nix/store");
    }

    #[rstest]
    #[case::plain("/nix/store", "/nix/store/abc-x")]
    #[case::root("/", "/abc-x")]
    fn join_single_separator(#[case] dir: &str, #[case] expected: &str) {
        assert_eq!(StoreDir::new(dir).join("abc-x"), expected);
    }

    const HASH32: &str = "ss61c6yy9dvz0spn4dvwmdmcwjrfrrl6";

    #[rstest]
    #[case::plain(format!("/nix/store/{HASH32}-hello.txt"), "hello.txt")]
    #[case::empty_name(format!("/nix/store/{HASH32}-"), "")]
    #[case::nested(format!("/nix/store/{HASH32}-pkg/bin/tool"), "pkg/bin/tool")]
    fn store_path_name_accepts(#[case] path: String, #[case] name: &str) {
        assert_eq!(StoreDir::default().store_path_name(&path).unwrap(), name);
    }

    #[rstest]
    #[case::wrong_root(format!("/other/store/{HASH32}-hello.txt"))]
    #[case::no_separator(format!("/nix/store{HASH32}-hello.txt"))]
    #[case::short_hash("/nix/store/abc-hello.txt".to_owned())]
    #[case::bad_hash_char(format!("/nix/store/e{}-hello.txt", &HASH32[1..]))]
    #[case::missing_dash(format!("/nix/store/{HASH32}hello.txt"))]
    #[case::bare_root("/nix/store".to_owned())]
    #[case::empty("".to_owned())]
    fn store_path_name_rejects(#[case] path: String) {
        let err = StoreDir::default().store_path_name(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("'{path}' is not a store path under '/nix/store'")
        );
    }

    #[test]
    fn store_path_name_respects_configured_root() {
        let dir = StoreDir::new("/test/store");
        let path = format!("/test/store/{HASH32}-hello.txt");
        assert_eq!(dir.store_path_name(&path).unwrap(), "hello.txt");
        assert!(
            StoreDir::default().store_path_name(&path).is_err(),
            "{path} must not parse under the default root"
        );
    }

    #[test]
    fn store_path_name_under_root_dir() {
        let dir = StoreDir::new("/");
        let path = format!("/{HASH32}-hello.txt");
        assert_eq!(dir.store_path_name(&path).unwrap(), "hello.txt");
    }
}
