//! Variable reference expansion
//!
//! Rewrites log messages by replacing tokens of the form `#<type><vr>#` with
//! the name of the referenced variable and collapsing `##` into a single `#`.
//! The type character is one of `r`, `i`, `b` or `s`; `<vr>` is a decimal
//! value reference.
//!
//! Expansion never fails towards the caller. A malformed or unresolvable token
//! logs one warning and the original message is returned unmodified. If the
//! output buffer cannot grow, the short marker [`ALLOCATION_FALLBACK`] is
//! returned instead, since the original would not fit either.

use crate::config::ExpanderConfig;
use crate::logging::{LogSink, EXPANDER_MODULE};
use crate::model::VariableResolver;
use crate::types::{BaseType, ExpandError, LogLevel, Result, ValueReference};

/// Output used when the buffer cannot be grown
pub const ALLOCATION_FALLBACK: &str = "ERROR";

/// Message expander
#[derive(Debug, Clone, Copy)]
pub struct MessageExpander {
    reserve_slack: usize,
}

impl MessageExpander {
    /// Create an expander with the default reservation slack
    pub fn new() -> Self {
        Self::with_config(&ExpanderConfig::default())
    }

    pub fn with_config(config: &ExpanderConfig) -> Self {
        Self {
            reserve_slack: config.reserve_slack,
        }
    }

    /// Expand `raw` into `out`, reporting the first malformed token as an error.
    ///
    /// On error `out` holds the partial expansion and must not be used.
    pub fn try_expand_into<R>(&self, raw: &str, resolver: &R, out: &mut String) -> Result<()>
    where
        R: VariableResolver + ?Sized,
    {
        let raw = until_sentinel(raw);
        out.clear();

        let needed = raw
            .len()
            .checked_add(self.reserve_slack)
            .ok_or(ExpandError::AllocationError)?;
        out.try_reserve(needed)
            .map_err(|_| ExpandError::AllocationError)?;

        let first_ref = match raw.find('#') {
            Some(pos) => pos,
            None => {
                out.push_str(raw);
                return Ok(());
            }
        };
        out.push_str(&raw[..first_ref]);

        let bytes = raw.as_bytes();
        let mut pos = first_ref;
        while pos < bytes.len() {
            if bytes[pos] != b'#' {
                let end = raw[pos..].find('#').map_or(bytes.len(), |off| pos + off);
                push_checked(out, &raw[pos..end])?;
                pos = end;
            } else if bytes.get(pos + 1) == Some(&b'#') {
                push_checked(out, "#")?;
                pos += 2;
            } else {
                pos = self.expand_token(raw, pos, resolver, out)?;
            }
        }
        Ok(())
    }

    /// Expand `raw` into a new string, reporting the first malformed token as
    /// an error
    pub fn try_expand<R>(&self, raw: &str, resolver: &R) -> Result<String>
    where
        R: VariableResolver + ?Sized,
    {
        let mut out = String::new();
        self.try_expand_into(raw, resolver, &mut out)?;
        Ok(out)
    }

    /// Expand `raw` into `out`, falling back on error.
    ///
    /// Every failure logs exactly one warning to `sink`.
    pub fn expand_into<R, S>(&self, raw: &str, resolver: &R, sink: &mut S, out: &mut String)
    where
        R: VariableResolver + ?Sized,
        S: LogSink + ?Sized,
    {
        if let Err(err) = self.try_expand_into(raw, resolver, out) {
            sink.log(EXPANDER_MODULE, LogLevel::Warning, &err.to_string());
            out.clear();
            if err.restores_original() {
                out.push_str(until_sentinel(raw));
            } else {
                out.push_str(ALLOCATION_FALLBACK);
            }
        }
    }

    /// Expand `raw` into a new string, falling back on error
    pub fn expand<R, S>(&self, raw: &str, resolver: &R, sink: &mut S) -> String
    where
        R: VariableResolver + ?Sized,
        S: LogSink + ?Sized,
    {
        let mut out = String::new();
        self.expand_into(raw, resolver, sink, &mut out);
        out
    }

    /// Expand `raw` and cut the result to fit a buffer of `capacity` bytes,
    /// one of which is reserved for the terminator
    pub fn expand_bounded<R, S>(&self, raw: &str, resolver: &R, sink: &mut S, capacity: usize) -> String
    where
        R: VariableResolver + ?Sized,
        S: LogSink + ?Sized,
    {
        let mut out = self.expand(raw, resolver, sink);
        truncate_to_capacity(&mut out, capacity);
        out
    }

    /// Expand `raw` into a NUL-terminated byte buffer.
    ///
    /// Returns the number of text bytes written, terminator excluded. An empty
    /// buffer receives nothing.
    pub fn expand_to_c_buffer<R, S>(&self, raw: &str, resolver: &R, sink: &mut S, buf: &mut [u8]) -> usize
    where
        R: VariableResolver + ?Sized,
        S: LogSink + ?Sized,
    {
        if buf.is_empty() {
            return 0;
        }
        let text = self.expand_bounded(raw, resolver, sink, buf.len());
        let len = text.len();
        buf[..len].copy_from_slice(text.as_bytes());
        buf[len] = 0;
        len
    }

    /// Parse the token starting at the `#` at `start` and append the resolved
    /// name. Returns the position just past the closing `#`.
    fn expand_token<R>(&self, raw: &str, start: usize, resolver: &R, out: &mut String) -> Result<usize>
    where
        R: VariableResolver + ?Sized,
    {
        let bytes = raw.as_bytes();

        let base_type = match bytes.get(start + 1).copied().and_then(BaseType::from_type_char) {
            Some(base_type) => base_type,
            None => return Err(ExpandError::MalformedType(out.clone())),
        };

        let digits_start = start + 2;
        let num_digits = bytes[digits_start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let digits_end = digits_start + num_digits;
        let digits = &raw[digits_start..digits_end];

        if digits.is_empty() {
            return Err(ExpandError::MissingReference(out.clone()));
        }
        if bytes.get(digits_end) != Some(&b'#') {
            return Err(ExpandError::UnterminatedToken(context(out, digits)));
        }

        let value_reference: ValueReference = digits
            .parse()
            .map_err(|_| ExpandError::DecodeError(context(out, digits)))?;

        let name = resolver
            .resolve(base_type, value_reference)
            .ok_or_else(|| ExpandError::UnresolvedReference(context(out, digits)))?;

        // Names are copied verbatim, never rescanned for tokens
        push_checked(out, name)?;
        Ok(digits_end + 1)
    }
}

impl Default for MessageExpander {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut `text` so that it fits a buffer of `capacity` bytes including the
/// terminator. The cut never splits a UTF-8 character.
pub fn truncate_to_capacity(text: &mut String, capacity: usize) {
    let limit = capacity.saturating_sub(1);
    if text.len() <= limit {
        return;
    }
    let mut cut = limit;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

/// The message ends at the first NUL, if any
pub(crate) fn until_sentinel(raw: &str) -> &str {
    match raw.find('\0') {
        Some(end) => &raw[..end],
        None => raw,
    }
}

fn push_checked(out: &mut String, s: &str) -> Result<()> {
    out.try_reserve(s.len())
        .map_err(|_| ExpandError::AllocationError)?;
    out.push_str(s);
    Ok(())
}

/// Partial output followed by the digits read so far
fn context(out: &str, digits: &str) -> String {
    let mut ctx = String::with_capacity(out.len() + digits.len());
    ctx.push_str(out);
    ctx.push_str(digits);
    ctx
}
