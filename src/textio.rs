//! Text file I/O with a configurable newline conversion
//!
//! The conversion mode is ambient state shared by every text read and write
//! on the current thread. The crate is single-threaded, so this acts as a
//! process-wide setting. Operations that must see bytes exactly as stored
//! suspend it with [`suspend_conversion`].

use std::borrow::Cow;
use std::cell::Cell;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::Deserialize;

/// How line endings are translated on read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineMode {
    /// Bytes pass through untouched
    #[default]
    Preserve,
    /// Read and write `\n`
    Unix,
    /// Read `\r\n` as `\n`, write `\n` as `\r\n`
    Dos,
}

thread_local! {
    static NEWLINE_MODE: Cell<NewlineMode> = const { Cell::new(NewlineMode::Preserve) };
}

/// Current conversion mode
pub fn newline_mode() -> NewlineMode {
    NEWLINE_MODE.with(Cell::get)
}

/// Set the conversion mode, returning the previous one
pub fn set_newline_mode(mode: NewlineMode) -> NewlineMode {
    NEWLINE_MODE.with(|m| m.replace(mode))
}

/// Restores the previous conversion mode when dropped
#[must_use = "conversion is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SuspendConversion {
    previous: NewlineMode,
}

impl Drop for SuspendConversion {
    fn drop(&mut self) {
        set_newline_mode(self.previous);
    }
}

/// Turn conversion off until the returned guard goes out of scope
///
/// Restoration happens on every exit path, including `?` and unwinding.
pub fn suspend_conversion() -> SuspendConversion {
    SuspendConversion {
        previous: set_newline_mode(NewlineMode::Preserve),
    }
}

/// Read a text file, applying the current conversion
///
/// Content is handled as bytes: only line endings are ever touched, so
/// files in any encoding pass through.
pub fn read_text(path: &Path) -> io::Result<Vec<u8>> {
    let content = std::fs::read(path)?;
    Ok(match newline_mode() {
        NewlineMode::Preserve => content,
        NewlineMode::Unix | NewlineMode::Dos => crlf_to_lf(&content),
    })
}

/// Write a text file, applying the current conversion
pub fn write_text(path: &Path, content: &[u8]) -> io::Result<()> {
    std::fs::write(path, encode(content))
}

/// Like [`write_text`] but fails if `path` already exists
pub fn create_text(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(&encode(content))
}

fn encode(content: &[u8]) -> Cow<'_, [u8]> {
    match newline_mode() {
        NewlineMode::Preserve => Cow::Borrowed(content),
        NewlineMode::Unix => Cow::Owned(crlf_to_lf(content)),
        NewlineMode::Dos => Cow::Owned(lf_to_crlf(&crlf_to_lf(content))),
    }
}

fn crlf_to_lf(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut rest = content;
    while let Some(pos) = memchr::memmem::find(rest, b"\r\n") {
        out.extend_from_slice(&rest[..pos]);
        out.push(b'\n');
        rest = &rest[pos + 2..];
    }
    out.extend_from_slice(rest);
    out
}

fn lf_to_crlf(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + content.len() / 32);
    let mut rest = content;
    while let Some(pos) = memchr::memchr(b'\n', rest) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(b"\r\n");
        rest = &rest[pos + 1..];
    }
    out.extend_from_slice(rest);
    out
}
