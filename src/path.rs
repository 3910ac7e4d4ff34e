//! Path lookup into nested values.
//!
//! A path is a `/`-separated list of segments. A segment of the form
//! `[N]`, where N is a run of decimal digits, indexes an array; any other
//! non-empty segment is a dictionary key. Empty segments are skipped, so
//! `"a//b"`, `"/a/b"` and `"a/b/"` all mean `"a/b"`, and the empty path
//! names the root itself.
//!
//! The syntax cannot address keys that contain `/`, `[` or `]`, nor keys
//! with bytes outside UTF-8; such entries are only reachable through the
//! dictionary API directly.

use crate::value::Value;

enum Segment {
    Index(usize),
    Key,
}

/// Classifies one path segment. `None` means a bracket segment whose
/// inside is not a pure digit run, which fails the whole lookup.
fn classify(token: &[u8]) -> Option<Segment> {
    if token.len() > 2 && token[0] == b'[' && token[token.len() - 1] == b']' {
        let mut index = 0usize;
        let mut i = 1;
        while token[i].is_ascii_digit() {
            index = index
                .wrapping_mul(10)
                .wrapping_add((token[i] - b'0') as usize);
            i += 1;
        }
        if token[i] != b']' {
            return None;
        }
        return Some(Segment::Index(index));
    }
    // Anything else, including "[2]x" or "[]", is an ordinary key.
    Some(Segment::Key)
}

impl Value {
    /// Walks `path` from this value and returns the addressed value, or
    /// `None` on any failed lookup, index past the end, or kind mismatch.
    ///
    /// ```
    /// use cell_value::{VArray, VDict, Value};
    ///
    /// let mut servers = VArray::new();
    /// servers.push("alpha");
    /// servers.push("beta");
    /// let mut root = VDict::new();
    /// root.set("servers", Value::from(servers));
    /// let root = Value::from(root);
    ///
    /// let beta = root.at_path("servers/[1]").unwrap();
    /// assert_eq!(beta.as_string().and_then(|s| s.as_str()), Some("beta"));
    /// ```
    #[must_use]
    pub fn at_path(&self, path: &str) -> Option<&Value> {
        let mut v = self;
        for token in path.as_bytes().split(|&b| b == b'/') {
            if token.is_empty() {
                continue;
            }
            v = match classify(token)? {
                Segment::Index(index) => v.as_array()?.get(index)?,
                Segment::Key => v.as_dict()?.get(token)?,
            };
        }
        Some(v)
    }

    /// Mutable counterpart of [`Value::at_path`].
    #[must_use]
    pub fn at_path_mut(&mut self, path: &str) -> Option<&mut Value> {
        let mut v = self;
        for token in path.as_bytes().split(|&b| b == b'/') {
            if token.is_empty() {
                continue;
            }
            v = match classify(token)? {
                Segment::Index(index) => v.as_array_mut()?.get_mut(index)?,
                Segment::Key => v.as_dict_mut()?.get_mut(token)?,
            };
        }
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::VArray;
    use crate::dict::VDict;

    /// { "a": [ {}, {}, { "b": 42 } ], "[2]x": 7 }
    fn sample() -> Value {
        let mut leaf = VDict::new();
        leaf.set("b", 42i32);

        let mut arr = VArray::new();
        arr.push(Value::from(VDict::new()));
        arr.push(Value::from(VDict::new()));
        arr.push(Value::from(leaf));

        let mut root = VDict::new();
        root.set("a", Value::from(arr));
        root.set("[2]x", 7i32);
        Value::from(root)
    }

    #[test]
    fn nested_lookup() {
        let root = sample();
        assert_eq!(root.at_path("a/[2]/b").unwrap().as_i32(), 42);
    }

    #[test]
    fn empty_path_names_the_root() {
        let root = sample();
        assert!(core::ptr::eq(root.at_path("").unwrap(), &root));
    }

    #[test]
    fn empty_segments_are_skipped() {
        let root = sample();
        assert_eq!(root.at_path("/a//[2]/b/").unwrap().as_i32(), 42);
    }

    #[test]
    fn bracket_needs_pure_digits() {
        let root = sample();
        assert!(root.at_path("a/[2x]/b").is_none());
        assert!(root.at_path("a/[ 2]/b").is_none());
    }

    #[test]
    fn short_or_unterminated_brackets_are_keys() {
        let root = sample();
        // "[2]x" does not end with ']' and is looked up as a key.
        assert_eq!(root.at_path("[2]x").unwrap().as_i32(), 7);
        // "[]" is too short for index syntax, so it is a (missing) key.
        assert!(root.at_path("[]").is_none());
    }

    #[test]
    fn failed_lookups() {
        let root = sample();
        assert!(root.at_path("nope").is_none());
        assert!(root.at_path("a/[9]").is_none());
        // Index syntax against a dictionary fails.
        assert!(root.at_path("[0]").is_none());
        // Key lookup against an array fails.
        assert!(root.at_path("a/b").is_none());
        // Descending through a scalar fails.
        assert!(root.at_path("a/[2]/b/c").is_none());
    }

    #[test]
    fn mutation_through_a_path() {
        let mut root = sample();
        *root.at_path_mut("a/[2]/b").unwrap() = Value::from("changed");
        assert_eq!(
            root.at_path("a/[2]/b").unwrap().as_string().and_then(|s| s.as_str()),
            Some("changed")
        );
    }
}
