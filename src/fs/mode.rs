//! POSIX directory permission modes.
//!
//! A [`Mode`] is the permission-and-special-bit part of a directory entry's
//! metadata: the classic `rwx` triples plus the setuid, setgid, and sticky
//! bits. That is 12 bits, so every constructor masks its input with
//! [`MODE_MASK`] and comparisons never see the file-type bits a stat call
//! reports alongside the permissions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Mask restricting a raw `st_mode` value to its permission and special bits.
pub const MODE_MASK: u32 = 0o7777;

/// A permission-and-special-bit value for a directory entry.
///
/// Construct one from a native integer or from an octal string; both forms
/// produce the same semantic value:
///
/// ```rust
/// use mkdirp_stream::Mode;
///
/// let numeric = Mode::from(0o2750);
/// let parsed: Mode = "2750".parse().unwrap();
/// assert_eq!(numeric, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u32);

impl Mode {
  /// Creates a `Mode`, masking `bits` to the low 12 bits.
  pub fn new(bits: u32) -> Self {
    Self(bits & MODE_MASK)
  }

  /// Returns the raw (already masked) mode bits.
  pub fn bits(self) -> u32 {
    self.0
  }
}

impl From<u32> for Mode {
  fn from(bits: u32) -> Self {
    Self::new(bits)
  }
}

/// Error returned when an octal mode string cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid octal mode string: {input:?}")]
pub struct ParseModeError {
  /// The string that failed to parse.
  pub input: String,
  #[source]
  source: std::num::ParseIntError,
}

impl FromStr for Mode {
  type Err = ParseModeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    u32::from_str_radix(s, 8)
      .map(Self::new)
      .map_err(|source| ParseModeError {
        input: s.to_string(),
        source,
      })
  }
}

impl fmt::Debug for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Mode({:04o})", self.0)
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04o}", self.0)
  }
}
