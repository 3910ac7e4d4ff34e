//! Byte-string value type with a small-buffer payload store.
//!
//! # Payload encoding
//!
//! A string is kept as one contiguous block:
//!
//! ```text
//! ┌────────────────┬───────────────┬─────┐
//! │ varint(length) │ content bytes │ \0  │
//! └────────────────┴───────────────┴─────┘
//! ```
//!
//! The length prefix uses the base-128 encoding from `codec`; the trailing
//! NUL is a convenience for C-style consumers and is not counted in the
//! length. Content may itself contain NUL bytes.
//!
//! Blocks that fit in [`VString::INLINE_CAP`] bytes are stored inline in
//! the handle with no allocation; larger blocks are heap-allocated. The
//! choice is made once at construction and never revisited.

use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use alloc::string::String;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::ptr::{self, NonNull};

use static_assertions::const_assert;

use crate::codec;

/// A byte-string value.
///
/// `VString` stores arbitrary bytes (not necessarily UTF-8). Short strings
/// are embedded directly in the handle; longer strings fall back to a
/// single heap block.
pub struct VString {
    repr: Repr,
}

enum Repr {
    /// Encoded block held inline; `used` is the block size.
    Inline { used: u8, buf: [u8; VString::INLINE_CAP] },
    /// Encoded block on the heap; `total` is the block size (needed to
    /// rebuild the layout on drop).
    Heap { ptr: NonNull<u8>, total: usize },
}

// Safety: a VString exclusively owns its heap block; nothing is shared.
unsafe impl Send for VString {}
unsafe impl Sync for VString {}

const_assert!(VString::INLINE_CAP <= u8::MAX as usize);

impl VString {
    /// Inline capacity in encoded bytes: a 16-byte record minus one
    /// leading tag byte.
    pub const INLINE_CAP: usize = 15;

    /// Longest content that still fits inline (one prefix byte plus the
    /// trailing NUL leave this many bytes for content).
    pub const INLINE_CONTENT_MAX: usize = Self::INLINE_CAP - 2;

    fn block_layout(total: usize) -> Layout {
        // Total is always >= 2 (prefix byte + NUL), so this cannot be a
        // zero-size layout.
        Layout::array::<u8>(total).unwrap()
    }

    /// Creates a new string holding a copy of `content`.
    #[must_use]
    pub fn new(content: impl AsRef<[u8]>) -> Self {
        let content = content.as_ref();
        let prefix = codec::prefix_len(content.len());
        let total = prefix + content.len() + 1;

        if total <= Self::INLINE_CAP {
            let mut buf = [0u8; Self::INLINE_CAP];
            let off = codec::encode_into(content.len(), &mut buf);
            buf[off..off + content.len()].copy_from_slice(content);
            // buf is zero-initialized, so the NUL terminator is in place.
            return VString {
                repr: Repr::Inline { used: total as u8, buf },
            };
        }

        let layout = Self::block_layout(total);
        unsafe {
            let raw = alloc(layout);
            let Some(ptr) = NonNull::new(raw) else {
                handle_alloc_error(layout);
            };
            let block = core::slice::from_raw_parts_mut(raw, total);
            let off = codec::encode_into(content.len(), block);
            ptr::copy_nonoverlapping(content.as_ptr(), raw.add(off), content.len());
            block[total - 1] = 0;
            VString {
                repr: Repr::Heap { ptr, total },
            }
        }
    }

    /// Creates an empty string.
    #[must_use]
    pub fn empty() -> Self {
        Self::new([])
    }

    /// The whole encoded block: prefix, content, NUL.
    fn block(&self) -> &[u8] {
        match &self.repr {
            Repr::Inline { used, buf } => &buf[..*used as usize],
            Repr::Heap { ptr, total } => unsafe {
                core::slice::from_raw_parts(ptr.as_ptr(), *total)
            },
        }
    }

    /// Returns `true` if the payload is stored inline in the handle.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self.repr, Repr::Inline { .. })
    }

    /// Returns the content length in bytes, decoded from the prefix.
    #[must_use]
    pub fn len(&self) -> usize {
        codec::decode(self.block()).0
    }

    /// Returns `true` if the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the content bytes, located by skipping the length prefix.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let block = self.block();
        let (len, off) = codec::decode(block);
        &block[off..off + len]
    }

    /// Returns the content bytes including the trailing NUL, for handing
    /// to NUL-terminated-string consumers.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        let block = self.block();
        let off = codec::skip(block);
        &block[off..]
    }

    /// Returns the content as `&str` if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }
}

impl Drop for VString {
    fn drop(&mut self) {
        if let Repr::Heap { ptr, total } = self.repr {
            unsafe {
                dealloc(ptr.as_ptr(), Self::block_layout(total));
            }
        }
    }
}

impl Clone for VString {
    fn clone(&self) -> Self {
        VString::new(self.as_bytes())
    }
}

impl PartialEq for VString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for VString {}

impl PartialOrd for VString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VString {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lexicographic with length tiebreak: the dictionary's default
        // key order.
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for VString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Debug for VString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => Debug::fmt(s, f),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

impl fmt::Display for VString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => f.write_str(s),
            // Lossy rendering for non-UTF-8 content.
            None => fmt::Display::fmt(&alloc::string::String::from_utf8_lossy(self.as_bytes()), f),
        }
    }
}

impl Default for VString {
    fn default() -> Self {
        Self::empty()
    }
}

impl Borrow<[u8]> for VString {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for VString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

// === PartialEq with byte and string slices ===

impl PartialEq<[u8]> for VString {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for VString {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for VString {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for VString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

// === From implementations ===

impl From<&[u8]> for VString {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for VString {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<String> for VString {
    fn from(s: String) -> Self {
        Self::new(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let s = VString::new("hello");
        assert_eq!(s.as_bytes(), b"hello");
        assert_eq!(s.len(), 5);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_empty() {
        let s = VString::empty();
        assert_eq!(s.len(), 0);
        assert!(s.is_empty());
        assert!(s.is_inline());
        assert_eq!(s.as_bytes(), b"");
        assert_eq!(s.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn inline_capacity_boundaries() {
        for len in 0..=VString::INLINE_CONTENT_MAX {
            let content = alloc::vec![b'x'; len];
            let s = VString::new(&content);
            assert!(s.is_inline(), "expected inline storage for length {len}");
            assert_eq!(s.len(), len);
            assert_eq!(s.as_bytes(), &content[..]);
        }

        let overflow = alloc::vec![b'y'; VString::INLINE_CONTENT_MAX + 1];
        let s = VString::new(&overflow);
        assert!(!s.is_inline(), "expected heap storage past the boundary");
        assert_eq!(s.as_bytes(), &overflow[..]);
    }

    #[test]
    fn heap_strings_round_trip() {
        let long: String = core::iter::repeat('a').take(1000).collect();
        let s = VString::new(long.as_str());
        assert!(!s.is_inline());
        assert_eq!(s.len(), 1000);
        assert_eq!(s.as_str(), Some(long.as_str()));
        assert_eq!(s.as_bytes_with_nul().last(), Some(&0u8));
    }

    #[test]
    fn embedded_nul_bytes() {
        let content = b"ab\0cd\0";
        let s = VString::new(content);
        assert_eq!(s.len(), 6);
        assert_eq!(s.as_bytes(), content);
        // The terminator is appended after the embedded NULs.
        assert_eq!(s.as_bytes_with_nul(), b"ab\0cd\0\0");
    }

    #[test]
    fn multi_byte_prefix_lengths() {
        for len in [128usize, 200, 16384] {
            let content = alloc::vec![7u8; len];
            let s = VString::new(&content);
            assert_eq!(s.len(), len);
            assert_eq!(s.as_bytes(), &content[..]);
        }
    }

    #[test]
    fn test_clone() {
        let short = VString::new("abc");
        assert_eq!(short.clone(), short);
        assert!(short.clone().is_inline());

        let long = VString::new("a very long string that spills to the heap");
        let copy = long.clone();
        assert_eq!(copy, long);
        assert!(!copy.is_inline());
    }

    #[test]
    fn test_ordering() {
        let a = VString::new("apple");
        let b = VString::new("banana");
        assert!(a < b);

        // Prefix sorts before its extension.
        let ab = VString::new("ab");
        let abc = VString::new("abc");
        assert!(ab < abc);
    }

    #[test]
    fn non_utf8_content() {
        let s = VString::new([0xff, 0xfe, 0x80]);
        assert_eq!(s.as_str(), None);
        assert_eq!(s.as_bytes(), &[0xff, 0xfe, 0x80]);
    }
}

#[cfg(all(test, feature = "bolero-inline-tests"))]
mod bolero_props {
    use super::*;
    use alloc::vec::Vec;
    use bolero::check;

    #[test]
    fn bolero_string_round_trip() {
        check!().with_type::<Vec<u8>>().for_each(|bytes: &Vec<u8>| {
            if bytes.len() > VString::INLINE_CONTENT_MAX + 8 {
                // Keep the generator focused on the inline/heap boundary.
                return;
            }

            let s = VString::new(bytes);
            assert_eq!(s.len(), bytes.len());
            assert_eq!(s.as_bytes(), &bytes[..]);
            assert_eq!(s.as_bytes_with_nul().last(), Some(&0u8));
            assert_eq!(s.clone(), s);
        });
    }

    #[test]
    fn bolero_ordering_matches_slices() {
        check!()
            .with_type::<(Vec<u8>, Vec<u8>)>()
            .for_each(|(a, b): &(Vec<u8>, Vec<u8>)| {
                let sa = VString::new(a);
                let sb = VString::new(b);
                assert_eq!(sa.cmp(&sb), a.as_slice().cmp(b.as_slice()));
            });
    }
}
