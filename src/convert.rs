//! Value coercion for text and attribute values
//!
//! Numbers are read the way C's `strtol` / `strtod` read them: leading
//! whitespace skipped, the longest numeric prefix used, no digits gives 0.
//! Defaults are only returned when the value is absent.

use crate::dom::{AttrId, Document, NodeId};

/// Best-effort conversion from raw value bytes
pub trait FromText: Sized {
    fn from_text(bytes: &[u8]) -> Self;
}

/// Sign and saturated magnitude of the leading decimal integer
fn scan_integer(bytes: &[u8]) -> (bool, u128) {
    let bytes = trim_start(bytes);
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u128, |acc, &b| acc.saturating_mul(10).saturating_add(u128::from(b - b'0')));
    (negative, magnitude)
}

macro_rules! signed_from_text {
    ($($t:ty),*) => {$(
        impl FromText for $t {
            fn from_text(bytes: &[u8]) -> Self {
                let (negative, magnitude) = scan_integer(bytes);
                if negative {
                    let min = (<$t>::MIN as i128).unsigned_abs();
                    if magnitude >= min {
                        <$t>::MIN
                    } else {
                        -(magnitude as i128) as $t
                    }
                } else {
                    <$t>::try_from(magnitude).unwrap_or(<$t>::MAX)
                }
            }
        }
    )*};
}

macro_rules! unsigned_from_text {
    ($($t:ty),*) => {$(
        impl FromText for $t {
            fn from_text(bytes: &[u8]) -> Self {
                let (negative, magnitude) = scan_integer(bytes);
                match <$t>::try_from(magnitude) {
                    // strtoul negates in the unsigned domain
                    Ok(value) if negative => value.wrapping_neg(),
                    Ok(value) => value,
                    Err(_) => <$t>::MAX,
                }
            }
        }
    )*};
}

signed_from_text!(i32, i64);
unsigned_from_text!(u32, u64);

/// Longest prefix of `bytes` that reads as a float
fn float_prefix(bytes: &[u8]) -> &[u8] {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        i += 1;
    }

    let rest = &bytes[i..];
    for word in [&b"infinity"[..], b"inf", b"nan"] {
        if rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word) {
            return &bytes[..i + word.len()];
        }
    }

    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();
    let int_digits = count_digits(i);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(i + 1);
        if int_digits + frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return &[];
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exp_digits = count_digits(j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    &bytes[..i]
}

macro_rules! float_from_text {
    ($($t:ty),*) => {$(
        impl FromText for $t {
            fn from_text(bytes: &[u8]) -> Self {
                let prefix = float_prefix(trim_start(bytes));
                std::str::from_utf8(prefix)
                    .ok()
                    .and_then(|s| s.parse::<$t>().ok())
                    .unwrap_or(0.0)
            }
        }
    )*};
}

float_from_text!(f32, f64);

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[skip..]
}

/// `t`/`1` is true, `n`/`0` is false
fn parse_bool(bytes: &[u8], default: bool) -> bool {
    match bytes.first() {
        Some(b't' | b'1') => true,
        Some(b'n' | b'0') => false,
        _ => default,
    }
}

impl Document<'_> {
    /// Text to coerce for a node: its own bytes for a text node, else the
    /// first text child
    fn value_bytes(&self, node: Option<NodeId>) -> Option<&[u8]> {
        let node = node?;
        if let Some(text) = self.text(node) {
            return Some(text);
        }
        self.text(self.first_text(node)?)
    }

    /// Parse the text of `node`, or return `default` when there is none
    pub fn value_or<T: FromText>(&self, node: Option<NodeId>, default: T) -> T {
        self.value_bytes(node).map_or(default, T::from_text)
    }

    /// Parse an attribute value, or return `default` when absent
    pub fn attr_value_or<T: FromText>(&self, attr: Option<AttrId>, default: T) -> T {
        match attr {
            Some(id) if self.attr(id).is_some() => T::from_text(self.attr_value(id)),
            _ => default,
        }
    }

    pub fn bool_or(&self, node: Option<NodeId>, default: bool) -> bool {
        self.value_bytes(node).map_or(default, |b| parse_bool(b, default))
    }

    pub fn attr_bool_or(&self, attr: Option<AttrId>, default: bool) -> bool {
        match attr {
            Some(id) if self.attr(id).is_some() => parse_bool(self.attr_value(id), default),
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_read_only, ParseOptions};

    #[test]
    fn test_integers() {
        assert_eq!(i32::from_text(b"42"), 42);
        assert_eq!(i32::from_text(b"  -17xyz"), -17);
        assert_eq!(i32::from_text(b"+8"), 8);
        assert_eq!(i32::from_text(b"abc"), 0);
        assert_eq!(i32::from_text(b""), 0);
        assert_eq!(i64::from_text(b"9007199254740993"), 9_007_199_254_740_993);
    }

    #[test]
    fn test_integer_saturation() {
        assert_eq!(i32::from_text(b"99999999999"), i32::MAX);
        assert_eq!(i32::from_text(b"-99999999999"), i32::MIN);
        assert_eq!(i32::from_text(b"-2147483648"), i32::MIN);
        assert_eq!(u32::from_text(b"4294967296"), u32::MAX);
        assert_eq!(u64::from_text(b"123456789012345678901234567890"), u64::MAX);
    }

    #[test]
    fn test_unsigned_negative_wraps() {
        assert_eq!(u32::from_text(b"-1"), u32::MAX);
        assert_eq!(u64::from_text(b"-2"), u64::MAX - 1);
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::from_text(b"3.25"), 3.25);
        assert_eq!(f64::from_text(b" -1.5e2kg"), -150.0);
        assert_eq!(f64::from_text(b".5"), 0.5);
        assert_eq!(f64::from_text(b"7."), 7.0);
        assert_eq!(f64::from_text(b"2e"), 2.0);
        assert_eq!(f32::from_text(b"abc"), 0.0);
        assert_eq!(f64::from_text(b"."), 0.0);
        assert!(f64::from_text(b"INF").is_infinite());
        assert!(f64::from_text(b"-infinity").is_sign_negative());
        assert!(f64::from_text(b"nan").is_nan());
    }

    #[test]
    fn test_document_values() {
        let doc = parse_read_only(
            b"<cfg><n>42</n><s>abc</s><e/><on>true</on><off>0</off><x>maybe</x></cfg>",
            ParseOptions::default(),
        )
        .unwrap();
        let root = doc.root().unwrap();
        let child = |tag: &str| doc.child_element(root, tag);

        assert_eq!(doc.value_or(child("n"), -1i32), 42);
        assert_eq!(doc.value_or(child("missing"), -1i32), -1);
        assert_eq!(doc.value_or(child("s"), -1i32), 0);
        // No text child
        assert_eq!(doc.value_or(child("e"), 5u32), 5);

        assert!(doc.bool_or(child("on"), false));
        assert!(!doc.bool_or(child("off"), true));
        assert!(doc.bool_or(child("x"), true));
        assert!(!doc.bool_or(child("missing"), false));
    }

    #[test]
    fn test_attribute_values() {
        let doc = parse_read_only(b"<a w='640' r='1.5' f='no' v=''/>", ParseOptions::default()).unwrap();
        let root = doc.root().unwrap();

        assert_eq!(doc.attr_value_or(doc.attribute(root, "w"), 0u32), 640);
        assert_eq!(doc.attr_value_or(doc.attribute(root, "r"), 0.0f64), 1.5);
        assert_eq!(doc.attr_value_or(doc.attribute(root, "h"), 480u32), 480);
        assert_eq!(doc.attr_value_or(doc.attribute(root, "v"), 9i64), 0);
        assert!(!doc.attr_bool_or(doc.attribute(root, "f"), true));
        assert!(doc.attr_bool_or(doc.attribute(root, "v"), true));
        assert!(doc.attr_bool_or(None, true));
    }
}
