// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output and error messages.
//!
//! Two complementary mechanisms:
//! 1. **Regex-based**: known API key and token formats.
//! 2. **Exact-match**: the key loaded for the current session, registered at
//!    runtime through a [`SecretRegistry`].

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::fmt::MakeWriter;

/// Known secret patterns to redact from output.
static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Anthropic API keys: sk-ant-api03-...
        r"sk-ant-[a-zA-Z0-9_\-]{20,}",
        // Generic sk- keys
        r"sk-[a-zA-Z0-9]{20,}",
        // Google API keys
        r"AIza[0-9A-Za-z_\-]{35}",
        // Google OAuth access tokens (service-account flow)
        r"ya29\.[0-9A-Za-z_\-]{20,}",
        // Bearer tokens in headers
        r"Bearer\s+[a-zA-Z0-9._\-]{10,}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("redaction pattern is valid"))
    .collect()
});

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Redact known secret formats and the given exact values from `input`.
pub fn redact(input: &str, exact_values: &[&str]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).into_owned();
    }

    // Longest first so a value containing another is replaced whole.
    let mut sorted: Vec<&str> = exact_values.iter().copied().filter(|v| !v.is_empty()).collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        result = result.replace(value, REDACTED);
    }

    result
}

/// Shared list of runtime secrets to redact, e.g. the API key of the session.
///
/// Cloning yields another handle to the same list.
#[derive(Clone, Default)]
pub struct SecretRegistry {
    values: Arc<RwLock<Vec<SecretString>>>,
}

impl std::fmt::Debug for SecretRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl SecretRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret; duplicates and empty values are ignored.
    pub fn register(&self, secret: &SecretString) {
        let value = secret.expose_secret();
        if value.is_empty() {
            return;
        }
        if let Ok(mut values) = self.values.write()
            && !values.iter().any(|v| v.expose_secret() == value)
        {
            values.push(SecretString::from(value.to_string()));
        }
    }

    /// Drop every registered secret.
    pub fn clear(&self) {
        if let Ok(mut values) = self.values.write() {
            values.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Redact `input` against the patterns and every registered secret.
    pub fn redact(&self, input: &str) -> String {
        match self.values.read() {
            Ok(values) => {
                let exposed: Vec<&str> = values.iter().map(|v| v.expose_secret()).collect();
                redact(input, &exposed)
            }
            Err(_) => redact(input, &[]),
        }
    }
}

/// A writer that redacts secrets before passing bytes to `inner`.
pub struct RedactingWriter<W> {
    inner: W,
    registry: SecretRegistry,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W, registry: SecretRegistry) -> Self {
        Self { inner, registry }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let redacted = self.registry.redact(&input);
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// [`MakeWriter`] adapter so a `tracing-subscriber` fmt layer writes through
/// a [`RedactingWriter`].
pub struct RedactingMakeWriter<M> {
    inner: M,
    registry: SecretRegistry,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, registry: SecretRegistry) -> Self {
        Self { inner, registry }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new(self.inner.make_writer(), self.registry.clone())
    }
}
