//! Parse Options
//!
//! Three independent switches, chosen once per parse:
//! - `reverse`: children exposed in reverse source order (O(1) head insert)
//! - `prefixes`: split `ns:tag` names into prefix and local name
//! - `read_only`: never write to the source buffer

/// Parse-time configuration
///
/// The default enables prefix splitting only. A copy is stored on the
/// document and on every node so consumers know how to read spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    /// Link each new child as the head of its parent's child chain
    pub reverse: bool,
    /// Split tag names on the first ':' into prefix and local name
    pub prefixes: bool,
    /// Leave the buffer untouched; spans are length-delimited only
    pub read_only: bool,
}

impl ParseOptions {
    /// Bit for [`reverse`](ParseOptions::reverse)
    pub const REVERSE: u32 = 1 << 0;
    /// Bit for [`prefixes`](ParseOptions::prefixes)
    pub const PREFIXES: u32 = 1 << 1;
    /// Bit for [`read_only`](ParseOptions::read_only)
    pub const READ_ONLY: u32 = 1 << 2;

    /// All switches off
    pub const fn none() -> Self {
        ParseOptions {
            reverse: false,
            prefixes: false,
            read_only: false,
        }
    }

    /// Build from a bit-set of `REVERSE | PREFIXES | READ_ONLY`
    ///
    /// Unknown bits are ignored.
    pub const fn from_bits(bits: u32) -> Self {
        ParseOptions {
            reverse: bits & Self::REVERSE != 0,
            prefixes: bits & Self::PREFIXES != 0,
            read_only: bits & Self::READ_ONLY != 0,
        }
    }

    /// Encode as a bit-set
    pub const fn bits(&self) -> u32 {
        (self.reverse as u32 * Self::REVERSE)
            | (self.prefixes as u32 * Self::PREFIXES)
            | (self.read_only as u32 * Self::READ_ONLY)
    }

    pub const fn reverse(mut self, on: bool) -> Self {
        self.reverse = on;
        self
    }

    pub const fn prefixes(mut self, on: bool) -> Self {
        self.prefixes = on;
        self
    }

    pub const fn read_only(mut self, on: bool) -> Self {
        self.read_only = on;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::none().prefixes(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_prefixes_only() {
        let opts = ParseOptions::default();
        assert!(opts.prefixes);
        assert!(!opts.reverse);
        assert!(!opts.read_only);
        assert_eq!(opts.bits(), ParseOptions::PREFIXES);
    }

    #[test]
    fn test_bits_roundtrip() {
        for bits in 0..8 {
            assert_eq!(ParseOptions::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn test_builder_combines_freely() {
        let opts = ParseOptions::none().reverse(true).read_only(true);
        assert_eq!(opts.bits(), ParseOptions::REVERSE | ParseOptions::READ_ONLY);
        assert_eq!(ParseOptions::from_bits(0xF0), ParseOptions::none());
    }
}
