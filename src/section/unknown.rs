//! `Unknown`: the catch-all for a `secID` not in the registry. Recoverable
//! by design -- an unrecognized section never aborts a decode, it just
//! loses its body.

#[derive(Debug, Clone, Default)]
pub struct Unknown {
    /// The section's raw body bytes, kept only when
    /// [`crate::ReadOptions::preserve_unknown_bodies`] is set. The
    /// reference implementation never preserves this; by default neither
    /// do we (see the design notes this choice is recorded against).
    pub raw: Option<Vec<u8>>,
}
