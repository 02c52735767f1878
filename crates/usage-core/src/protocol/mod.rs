//! Protocol modules.
//!
//! Only the tracking payload lives here today. Parsers are panic-free:
//! malformed input is reported as `UsageError` instead of panicking.

pub mod track;
