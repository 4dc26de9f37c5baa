//! Observability trait for inspecting component state.
//!
//! Every emulator component exposes its internal state for debugging and
//! inspection tooling. Queries never affect emulation state.

use std::fmt;

/// A dynamically-typed value for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 64-bit unsigned integer, used for counters.
    U64(u64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v:#04X}"),
            Value::U16(v) => write!(f, "{v:#06X}"),
            Value::U64(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

/// Read-only state inspection by dotted path.
///
/// A machine routes a prefix to the component that owns it, so
/// `cpu.flags.z` on the machine is `flags.z` on its CPU, and `memory.ff40`
/// reads one byte of the address space.
pub trait Observable {
    /// Look up one value. Unknown paths return `None`.
    fn query(&self, path: &str) -> Option<Value>;

    /// The paths `query()` understands. Parameterised families are shown
    /// with a `<placeholder>` segment.
    fn query_paths(&self) -> &'static [&'static str];
}
