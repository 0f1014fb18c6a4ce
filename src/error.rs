//! Error types returned by this crate.

use core::result;

/// Errors that can occur while decoding, encoding, or navigating a MUD tree.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A buffer ended before a section's declared size was satisfied.
    #[error("buffer truncated: needed {needed} bytes, had {available}")]
    TruncatedBuffer { needed: usize, available: usize },

    /// `secID` did not match any known section kind. Not normally fatal:
    /// callers that hit this via [`crate::section::Section::new`] get an
    /// [`crate::section::SectionBody::Unknown`] back instead of an `Err`.
    #[error("unrecognized section id: 0x{0:08x}")]
    UnknownSection(u32),

    /// Wraps a stream I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A streaming operation was attempted out of order, e.g. `writeGrpMem`
    /// before `writeGrpStart`, or `writeGrpEnd` with no open group.
    #[error("group writer state violation: {0}")]
    StateViolation(&'static str),

    /// `search`/`fseek` found no member matching the requested path.
    #[error("section not found")]
    NotFound,

    /// The histogram packer was asked to pack a run longer than 65535 bins
    /// in one frame, or was given more bins than fit in the remaining buffer.
    #[error("pack overflow: {0}")]
    PackOverflow(&'static str),

    /// A primitive scroll-level encode/decode failure (bad context, etc).
    #[error(transparent)]
    Scroll(#[from] scroll::Error),
}

pub type Result<T> = result::Result<T, Error>;
