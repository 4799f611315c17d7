//! Character classes of the LTSV grammar.
//!
//! ```text
//! labelchar = %x30-39 / %x41-5A / %x61-7A / "_" / "." / "-"
//! valuechar = %x00-07 / %x0B / %x0C / %x0E-FF
//! ```
//!
//! Values may hold any byte except backspace, tab, LF and CR. NUL is
//! accepted even though the published ABNF starts at %x01.

/// Returns `true` if `byte` may appear in a label (`[0-9A-Za-z_.-]`).
///
/// # Examples
///
/// ```rust
/// use ltsv::grammar::is_label_char;
///
/// assert!(is_label_char(b'a'));
/// assert!(is_label_char(b'-'));
/// assert!(!is_label_char(b':'));
/// assert!(!is_label_char(b' '));
/// ```
#[inline]
#[must_use]
pub const fn is_label_char(byte: u8) -> bool {
    matches!(byte, b'_' | b'.' | b'-' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z')
}

/// Returns `true` if `byte` may appear in a value under strict mode.
///
/// # Examples
///
/// ```rust
/// use ltsv::grammar::is_value_char;
///
/// assert!(is_value_char(b' '));
/// assert!(is_value_char(0xE3));
/// assert!(!is_value_char(b'\t'));
/// assert!(!is_value_char(b'\r'));
/// ```
#[inline]
#[must_use]
pub const fn is_value_char(byte: u8) -> bool {
    !matches!(byte, 0x08 | b'\t' | b'\r' | b'\n')
}

/// Returns the first byte of `label` outside the label charset.
#[inline]
pub(crate) fn first_invalid_label_byte(label: &[u8]) -> Option<u8> {
    label.iter().copied().find(|&b| !is_label_char(b))
}

/// Returns the first byte of `value` outside the strict value charset.
#[inline]
pub(crate) fn first_invalid_value_byte(value: &[u8]) -> Option<u8> {
    value.iter().copied().find(|&b| !is_value_char(b))
}

/// Returns `true` if `label` is a non-empty run of label characters.
#[must_use]
pub fn is_valid_label(label: &[u8]) -> bool {
    !label.is_empty() && first_invalid_label_byte(label).is_none()
}

/// Returns `true` if every byte of `value` is a strict value character.
/// The empty value is valid.
#[must_use]
pub fn is_valid_value(value: &[u8]) -> bool {
    first_invalid_value_byte(value).is_none()
}
