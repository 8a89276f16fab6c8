/// Default ceiling for container nesting, on both the decode and encode side.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What the decoder does when a dictionary repeats a key.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum DuplicateKeys {
    /// Later values replace earlier ones; the key keeps its first position.
    #[default]
    LastWins,
    Reject,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DecodeOptions {
    pub max_depth: usize,
    /// Reject `i-0e` and zero padded integers such as `i03e`.
    pub strict_integers: bool,
    pub duplicate_keys: DuplicateKeys,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_integers: false,
            duplicate_keys: DuplicateKeys::LastWins,
        }
    }
}

impl DecodeOptions {
    /// Options that only accept canonical input.
    pub fn strict() -> Self {
        DecodeOptions {
            strict_integers: true,
            duplicate_keys: DuplicateKeys::Reject,
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strict_integers(mut self, strict: bool) -> Self {
        self.strict_integers = strict;
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EncodeOptions {
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl EncodeOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
