//! A growable byte buffer with a read cursor, the Rust-side counterpart of
//! the reference implementation's `BUF` (`buf`/`pos`/`size` triple). Writers
//! append; readers advance `pos` as they decode. `scroll::Pread`/`Pwrite`
//! with a `BE` context do the actual primitive en/decoding; `Buffer` just
//! owns the bytes and the cursor.

/// An in-memory byte cursor used while assembling or walking a section's
/// encoded body.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    pub bytes: Vec<u8>,
    pub pos: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Buffer {
            bytes: Vec::with_capacity(cap),
            pos: 0,
        }
    }

    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Buffer { bytes, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
