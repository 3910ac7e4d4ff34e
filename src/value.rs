//! The tagged value core.
//!
//! A [`Value`] holds one of ten kinds: null, boolean, four integer widths,
//! two float widths, a byte string, an array, or a dictionary. Scalars are
//! stored directly in the value; the composite kinds own their payloads and
//! drop them recursively.
//!
//! Numeric access is deliberately total: asking an `Int64` value for an
//! `i32` truncates like a C cast, asking a float for an integer rounds half
//! away from zero, and asking a non-numeric value yields a fixed sentinel
//! (−1 for signed kinds, the maximum for unsigned kinds, −1.0 for floats).
//! Callers that need to distinguish "really −1" from "not a number" check
//! [`Value::is_compatible`] first.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::{self, Debug, Formatter};
use core::mem;

use crate::array::VArray;
use crate::dict::VDict;
use crate::string::VString;

/// The kind of payload a [`Value`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No payload.
    Null,
    /// `bool`.
    Bool,
    /// `i32`.
    Int32,
    /// `u32`.
    UInt32,
    /// `i64`.
    Int64,
    /// `u64`.
    UInt64,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// Byte string ([`VString`]).
    String,
    /// Array of values ([`VArray`]).
    Array,
    /// Sorted dictionary ([`VDict`]).
    Dict,
}

/// A polymorphic value.
///
/// Construct one with the `From` impls (`Value::from(42i32)`,
/// `Value::from("text")`, ...) or start from [`Value::NULL`]. Containers
/// hand out `&mut Value` slots initialized to a fresh null; overwriting the
/// slot with a real value is how elements get their content.
pub struct Value {
    repr: Repr,
}

enum Repr {
    /// `fresh` marks a slot a container created that nobody has assigned
    /// to yet.
    Null { fresh: bool },
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Str(VString),
    Array(VArray),
    // Boxed to keep Value in the small fixed-size class.
    Dict(Box<VDict>),
}

impl Value {
    /// The null value.
    pub const NULL: Value = Value {
        repr: Repr::Null { fresh: false },
    };

    /// A null carrying the freshly-added marker. Containers use this for
    /// slots they create on behalf of the caller.
    pub(crate) const fn fresh() -> Value {
        Value {
            repr: Repr::Null { fresh: true },
        }
    }

    /// Returns the kind of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match &self.repr {
            Repr::Null { .. } => ValueType::Null,
            Repr::Bool(_) => ValueType::Bool,
            Repr::Int32(_) => ValueType::Int32,
            Repr::UInt32(_) => ValueType::UInt32,
            Repr::Int64(_) => ValueType::Int64,
            Repr::UInt64(_) => ValueType::UInt64,
            Repr::Float(_) => ValueType::Float,
            Repr::Double(_) => ValueType::Double,
            Repr::Str(_) => ValueType::String,
            Repr::Array(_) => ValueType::Array,
            Repr::Dict(_) => ValueType::Dict,
        }
    }

    /// Returns `true` if this value is null (fresh or not).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null { .. })
    }

    /// Returns `true` if this is a null slot a container created that has
    /// never been assigned to.
    ///
    /// The marker survives until the slot is overwritten, so a caller that
    /// used `get_or_add` can tell whether the key existed before.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self.repr, Repr::Null { fresh: true })
    }

    /// Returns `true` if reading this value as `target` does not lose much
    /// information.
    ///
    /// Any value is compatible with its own kind. Between numeric kinds,
    /// compatibility is value-dependent: `Int32(-1)` is not compatible with
    /// `UInt32`, but `Int32(7)` is. Float and double report compatible with
    /// each other in both directions regardless of precision.
    #[must_use]
    pub fn is_compatible(&self, target: ValueType) -> bool {
        use ValueType as T;

        if self.value_type() == target {
            return true;
        }

        match &self.repr {
            Repr::Int32(x) => match target {
                T::Int64 | T::Float | T::Double => true,
                T::UInt32 | T::UInt64 => *x >= 0,
                _ => false,
            },
            Repr::UInt32(x) => match target {
                T::Int64 | T::UInt64 | T::Float | T::Double => true,
                T::Int32 => *x <= i32::MAX as u32,
                _ => false,
            },
            Repr::Int64(x) => match target {
                T::Float | T::Double => true,
                T::Int32 => *x >= i32::MIN as i64 && *x <= i32::MAX as i64,
                T::UInt32 => *x >= 0 && *x <= u32::MAX as i64,
                T::UInt64 => *x >= 0,
                _ => false,
            },
            Repr::UInt64(x) => match target {
                T::Float | T::Double => true,
                T::Int32 => *x <= i32::MAX as u64,
                T::UInt32 => *x <= u32::MAX as u64,
                T::Int64 => *x <= i64::MAX as u64,
                _ => false,
            },
            // Range first: the round-trip equality below reads through the
            // saturating getters and would accept the power-of-two bounds.
            Repr::Float(x) => match target {
                T::Double => true,
                T::Int32 => {
                    *x >= i32::MIN as f32
                        && *x < 2_147_483_648.0
                        && *x == self.as_i32() as f32
                }
                T::UInt32 => {
                    *x >= 0.0 && *x < 4_294_967_296.0 && *x == self.as_u32() as f32
                }
                T::Int64 => {
                    *x >= i64::MIN as f32
                        && *x < 9_223_372_036_854_775_808.0
                        && *x == self.as_i64() as f32
                }
                T::UInt64 => {
                    *x >= 0.0
                        && *x < 18_446_744_073_709_551_616.0
                        && *x == self.as_u64() as f32
                }
                _ => false,
            },
            Repr::Double(x) => match target {
                T::Float => true,
                T::Int32 => {
                    *x >= i32::MIN as f64
                        && *x < 2_147_483_648.0
                        && *x == self.as_i32() as f64
                }
                T::UInt32 => {
                    *x >= 0.0 && *x < 4_294_967_296.0 && *x == self.as_u32() as f64
                }
                T::Int64 => {
                    *x >= i64::MIN as f64
                        && *x < 9_223_372_036_854_775_808.0
                        && *x == self.as_i64() as f64
                }
                T::UInt64 => {
                    *x >= 0.0
                        && *x < 18_446_744_073_709_551_616.0
                        && *x == self.as_u64() as f64
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Reads the value as `i32`. Non-numeric values yield `-1`.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        match &self.repr {
            Repr::Int32(x) => *x,
            Repr::UInt32(x) => *x as i32,
            Repr::Int64(x) => *x as i32,
            Repr::UInt64(x) => *x as i32,
            Repr::Float(x) => round_half_away_f32(*x) as i32,
            Repr::Double(x) => round_half_away_f64(*x) as i32,
            _ => -1,
        }
    }

    /// Reads the value as `u32`. Non-numeric values yield `u32::MAX`.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        match &self.repr {
            Repr::Int32(x) => *x as u32,
            Repr::UInt32(x) => *x,
            Repr::Int64(x) => *x as u32,
            Repr::UInt64(x) => *x as u32,
            Repr::Float(x) => round_half_away_f32(*x) as u32,
            Repr::Double(x) => round_half_away_f64(*x) as u32,
            _ => u32::MAX,
        }
    }

    /// Reads the value as `i64`. Non-numeric values yield `-1`.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match &self.repr {
            Repr::Int32(x) => *x as i64,
            Repr::UInt32(x) => *x as i64,
            Repr::Int64(x) => *x,
            Repr::UInt64(x) => *x as i64,
            Repr::Float(x) => round_half_away_f32(*x) as i64,
            Repr::Double(x) => round_half_away_f64(*x) as i64,
            _ => -1,
        }
    }

    /// Reads the value as `u64`. Non-numeric values yield `u64::MAX`.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        match &self.repr {
            Repr::Int32(x) => *x as u64,
            Repr::UInt32(x) => *x as u64,
            Repr::Int64(x) => *x as u64,
            Repr::UInt64(x) => *x,
            Repr::Float(x) => round_half_away_f32(*x) as u64,
            Repr::Double(x) => round_half_away_f64(*x) as u64,
            _ => u64::MAX,
        }
    }

    /// Reads the value as `f32`. Non-numeric values yield `-1.0`.
    #[must_use]
    pub fn as_f32(&self) -> f32 {
        match &self.repr {
            Repr::Int32(x) => *x as f32,
            Repr::UInt32(x) => *x as f32,
            Repr::Int64(x) => *x as f32,
            Repr::UInt64(x) => *x as f32,
            Repr::Float(x) => *x,
            Repr::Double(x) => *x as f32,
            _ => -1.0,
        }
    }

    /// Reads the value as `f64`. Non-numeric values yield `-1.0`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match &self.repr {
            Repr::Int32(x) => *x as f64,
            Repr::UInt32(x) => *x as f64,
            Repr::Int64(x) => *x as f64,
            Repr::UInt64(x) => *x as f64,
            Repr::Float(x) => *x as f64,
            Repr::Double(x) => *x,
            _ => -1.0,
        }
    }

    /// Returns the boolean payload, or `None` for any other kind.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match &self.repr {
            Repr::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string payload, or `None` for any other kind.
    #[must_use]
    pub fn as_string(&self) -> Option<&VString> {
        match &self.repr {
            Repr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array payload, or `None` for any other kind.
    #[must_use]
    pub fn as_array(&self) -> Option<&VArray> {
        match &self.repr {
            Repr::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::as_array`].
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut VArray> {
        match &mut self.repr {
            Repr::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the dictionary payload, or `None` for any other kind.
    #[must_use]
    pub fn as_dict(&self) -> Option<&VDict> {
        match &self.repr {
            Repr::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::as_dict`].
    #[must_use]
    pub fn as_dict_mut(&mut self) -> Option<&mut VDict> {
        match &mut self.repr {
            Repr::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Takes the value out, leaving null behind.
    #[must_use]
    pub fn take(&mut self) -> Value {
        mem::replace(self, Value::NULL)
    }
}

// Round half away from zero: add/subtract half, then truncate toward zero.
// Out-of-range results saturate at the target bounds.
fn round_half_away_f32(x: f32) -> f32 {
    if x >= 0.0 { x + 0.5 } else { x - 0.5 }
}

fn round_half_away_f64(x: f64) -> f64 {
    if x >= 0.0 { x + 0.5 } else { x - 0.5 }
}

impl Default for Value {
    fn default() -> Self {
        Value::NULL
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Null { fresh } => Repr::Null { fresh: *fresh },
            Repr::Bool(b) => Repr::Bool(*b),
            Repr::Int32(x) => Repr::Int32(*x),
            Repr::UInt32(x) => Repr::UInt32(*x),
            Repr::Int64(x) => Repr::Int64(*x),
            Repr::UInt64(x) => Repr::UInt64(*x),
            Repr::Float(x) => Repr::Float(*x),
            Repr::Double(x) => Repr::Double(*x),
            Repr::Str(s) => Repr::Str(s.clone()),
            Repr::Array(a) => Repr::Array(a.clone()),
            Repr::Dict(d) => Repr::Dict(d.clone()),
        };
        Value { repr }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            // The fresh marker is bookkeeping, not content.
            (Repr::Null { .. }, Repr::Null { .. }) => true,
            (Repr::Bool(a), Repr::Bool(b)) => a == b,
            (Repr::Int32(a), Repr::Int32(b)) => a == b,
            (Repr::UInt32(a), Repr::UInt32(b)) => a == b,
            (Repr::Int64(a), Repr::Int64(b)) => a == b,
            (Repr::UInt64(a), Repr::UInt64(b)) => a == b,
            (Repr::Float(a), Repr::Float(b)) => a == b,
            (Repr::Double(a), Repr::Double(b)) => a == b,
            (Repr::Str(a), Repr::Str(b)) => a == b,
            (Repr::Array(a), Repr::Array(b)) => a == b,
            (Repr::Dict(a), Repr::Dict(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Null { fresh: false } => write!(f, "Null"),
            Repr::Null { fresh: true } => write!(f, "Null (fresh)"),
            Repr::Bool(b) => write!(f, "Bool({b})"),
            Repr::Int32(x) => write!(f, "Int32({x})"),
            Repr::UInt32(x) => write!(f, "UInt32({x})"),
            Repr::Int64(x) => write!(f, "Int64({x})"),
            Repr::UInt64(x) => write!(f, "UInt64({x})"),
            Repr::Float(x) => write!(f, "Float({x})"),
            Repr::Double(x) => write!(f, "Double({x})"),
            Repr::Str(s) => f.debug_tuple("String").field(s).finish(),
            Repr::Array(a) => Debug::fmt(a, f),
            Repr::Dict(d) => Debug::fmt(d, f),
        }
    }
}

// === From implementations ===

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value { repr: Repr::Bool(b) }
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value { repr: Repr::Int32(x) }
    }
}

impl From<u32> for Value {
    fn from(x: u32) -> Self {
        Value { repr: Repr::UInt32(x) }
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value { repr: Repr::Int64(x) }
    }
}

impl From<u64> for Value {
    fn from(x: u64) -> Self {
        Value { repr: Repr::UInt64(x) }
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value { repr: Repr::Float(x) }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value { repr: Repr::Double(x) }
    }
}

impl From<VString> for Value {
    fn from(s: VString) -> Self {
        Value { repr: Repr::Str(s) }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        VString::from(s).into()
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        VString::from(bytes).into()
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        VString::from(s).into()
    }
}

impl From<VArray> for Value {
    fn from(a: VArray) -> Self {
        Value { repr: Repr::Array(a) }
    }
}

impl From<VDict> for Value {
    fn from(d: VDict) -> Self {
        Value {
            repr: Repr::Dict(Box::new(d)),
        }
    }
}
