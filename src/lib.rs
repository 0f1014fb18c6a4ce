//! `mudfile`: a reader/writer for MUD (Muon Data) files, the
//! self-describing, big-endian binary container used to record muon-spin-
//! rotation experimental data.
//!
//! This crate covers the container's core mechanics: the section codec,
//! the tree model, streaming file I/O, navigation, and the histogram
//! packer. It does not provide a friendly typed-accessor façade over a
//! handle table, foreign-language bindings, or filesystem open/close
//! wrappers -- callers hand it an already-open `Read + Seek` / `Write +
//! Seek` stream.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod ids;
pub mod io;
pub mod nav;
pub mod pack;
pub mod section;
pub mod tree;

pub use error::{Error, Result};
pub use section::{CoreHeader, Section, SectionBody};

/// Options controlling how a stream is decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// When set, an [`section::Unknown`] section's raw body bytes are kept
    /// (so it can round-trip byte-identically) instead of being discarded.
    /// The reference implementation never preserves them; this defaults to
    /// matching that behaviour.
    pub preserve_unknown_bodies: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preserve_unknown_bodies(mut self, yes: bool) -> Self {
        self.preserve_unknown_bodies = yes;
        self
    }
}
