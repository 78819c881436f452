/// Source of the unique identity tokens written into manifests.
///
/// Every generated manifest draws three tokens (header, data module, script
/// module). Production code uses [`UuidTokenSource`]; tests inject
/// [`SequentialTokenSource`] to get reproducible manifests.
#[cfg_attr(test, mockall::automock)]
pub trait TokenSource: Send {
    fn next_token(&mut self) -> String;
}

/// Random version 4 UUIDs in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenSource;

impl TokenSource for UuidTokenSource {
    fn next_token(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic tokens shaped like UUIDs: `00000000-0000-0000-0000-000000000001`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialTokenSource {
    counter: u128,
}

impl SequentialTokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `counter`.
    pub fn starting_at(counter: u128) -> Self {
        Self { counter }
    }
}

impl TokenSource for SequentialTokenSource {
    fn next_token(&mut self) -> String {
        self.counter += 1;
        uuid::Uuid::from_u128(self.counter).hyphenated().to_string()
    }
}
