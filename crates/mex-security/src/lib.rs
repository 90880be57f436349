// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeps API keys out of MEX log output.

pub mod redact;

pub use redact::{redact, RedactingMakeWriter, RedactingWriter, SecretRegistry, REDACTED};
