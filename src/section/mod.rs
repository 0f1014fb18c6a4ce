//! The section registry: a closed, tagged union over every MUD section
//! kind, with `encode`/`decode`/`size` dispatched by a `match` rather than
//! the reference implementation's per-kind function-pointer table
//! (`MUD_PROC`). This is the direct idiomatic-Rust rendition the spec's
//! design notes call for: "In a sum-type language this becomes a closed
//! tagged union with a match in each of {encode, decode, free, size}."

mod array;
mod comment;
mod group;
mod hist;
mod ind_var;
mod run_desc;
mod scaler;
mod unknown;

pub use array::GenArray;
pub use comment::Comment;
pub use group::{Group, IndexEntry};
pub use hist::{GenHistDat, GenHistHdr};
pub use ind_var::GenIndVar;
pub use run_desc::{GenRunDesc, TriTiRunDesc};
pub use scaler::GenScaler;
pub use unknown::Unknown;

use crate::codec::{read_u32, write_u32};
use crate::error::{Error, Result};
use crate::ids::*;
use crate::ReadOptions;

/// The 12-byte header common to every section on the wire: a `u32` byte
/// count for the section's own body (never including nested group
/// members), then the `secID`/`instanceID` pair that together identify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreHeader {
    pub size: u32,
    pub sec_id: u32,
    pub instance_id: u32,
}

impl CoreHeader {
    pub const WIRE_SIZE: u32 = 12;

    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let size = read_u32(buf, offset)?;
        let sec_id = read_u32(buf, offset)?;
        let instance_id = read_u32(buf, offset)?;
        Ok(CoreHeader {
            size,
            sec_id,
            instance_id,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.size);
        write_u32(out, self.sec_id);
        write_u32(out, self.instance_id);
    }
}

/// A fully decoded section: its core header plus the kind-specific body.
#[derive(Debug, Clone)]
pub struct Section {
    pub core: CoreHeader,
    pub body: SectionBody,
}

/// One section's worth of payload, closed over every kind the wire format
/// defines. `FixedHeader`/`Group`/`Eof`/`Comment` are common to every
/// format; the `Gen*` variants are the lab-agnostic generic format that
/// every acquisition system in practice emits; `TriTiRunDesc` is the one
/// format-specific body this crate decodes; anything else becomes
/// `Unknown`, preserved only as a core header (see
/// [`crate::ReadOptions::preserve_unknown_bodies`] to keep its raw bytes
/// too).
#[derive(Debug, Clone)]
pub enum SectionBody {
    FixedHeader { file_size: u32, format_id: u32 },
    Group(Group),
    Eof,
    Comment(Comment),
    GenRunDesc(GenRunDesc),
    TriTiRunDesc(TriTiRunDesc),
    GenHistHdr(GenHistHdr),
    GenHistDat(GenHistDat),
    GenScaler(GenScaler),
    GenIndVar(GenIndVar),
    GenArray(GenArray),
    Unknown(Unknown),
}

impl Section {
    /// Constructs a new, empty section of the kind named by `sec_id`,
    /// the Rust counterpart of `MUD_new`. Unrecognized `sec_id`s never
    /// fail: they produce an [`SectionBody::Unknown`], matching the
    /// reference implementation's `default:` case.
    pub fn new(sec_id: u32, instance_id: u32) -> Section {
        let body = match sec_id {
            MUD_SEC_FIXED_ID => SectionBody::FixedHeader {
                file_size: 0,
                format_id: 0,
            },
            MUD_SEC_GRP_ID => SectionBody::Group(Group::default()),
            MUD_SEC_EOF_ID => SectionBody::Eof,
            MUD_SEC_CMT_ID => SectionBody::Comment(Comment::default()),
            MUD_SEC_GEN_RUN_DESC_ID => SectionBody::GenRunDesc(GenRunDesc::default()),
            MUD_SEC_TRI_TI_RUN_DESC_ID => SectionBody::TriTiRunDesc(TriTiRunDesc::default()),
            MUD_SEC_GEN_HIST_HDR_ID => SectionBody::GenHistHdr(GenHistHdr::default()),
            MUD_SEC_GEN_HIST_DAT_ID => SectionBody::GenHistDat(GenHistDat::default()),
            MUD_SEC_GEN_SCALER_ID => SectionBody::GenScaler(GenScaler::default()),
            MUD_SEC_GEN_IND_VAR_ID => SectionBody::GenIndVar(GenIndVar::default()),
            MUD_SEC_GEN_ARRAY_ID => SectionBody::GenArray(GenArray::default()),
            _ => SectionBody::Unknown(Unknown::default()),
        };
        Section {
            core: CoreHeader {
                size: 0,
                sec_id,
                instance_id,
            },
            body,
        }
    }

    /// Decodes one section's core header and body from `buf` starting at
    /// `*offset`, advancing `*offset` past it. Unknown sections consume
    /// nothing but are never an error (see spec: "recoverable, never
    /// fatal").
    pub fn decode(buf: &[u8], offset: &mut usize, opts: &ReadOptions) -> Result<Section> {
        let core = CoreHeader::decode(buf, offset)?;
        let body_start = *offset;
        let body = match core.sec_id {
            MUD_SEC_FIXED_ID => {
                let file_size = read_u32(buf, offset)?;
                let format_id = read_u32(buf, offset)?;
                SectionBody::FixedHeader {
                    file_size,
                    format_id,
                }
            }
            MUD_SEC_GRP_ID => SectionBody::Group(Group::decode(buf, offset, core.size)?),
            MUD_SEC_EOF_ID => SectionBody::Eof,
            MUD_SEC_CMT_ID => SectionBody::Comment(Comment::decode(buf, offset)?),
            MUD_SEC_GEN_RUN_DESC_ID => SectionBody::GenRunDesc(GenRunDesc::decode(buf, offset)?),
            MUD_SEC_TRI_TI_RUN_DESC_ID => {
                SectionBody::TriTiRunDesc(TriTiRunDesc::decode(buf, offset)?)
            }
            MUD_SEC_GEN_HIST_HDR_ID => SectionBody::GenHistHdr(GenHistHdr::decode(buf, offset)?),
            MUD_SEC_GEN_HIST_DAT_ID => {
                let body_size = core.size.saturating_sub(CoreHeader::WIRE_SIZE);
                SectionBody::GenHistDat(GenHistDat::decode(buf, offset, body_size)?)
            }
            MUD_SEC_GEN_SCALER_ID => SectionBody::GenScaler(GenScaler::decode(buf, offset)?),
            MUD_SEC_GEN_IND_VAR_ID => SectionBody::GenIndVar(GenIndVar::decode(buf, offset)?),
            MUD_SEC_GEN_ARRAY_ID => SectionBody::GenArray(GenArray::decode(buf, offset)?),
            other => {
                log::debug!("unrecognized secID 0x{:08x}, preserving header only", other);
                let body_len = core.size.saturating_sub(CoreHeader::WIRE_SIZE) as usize;
                let raw = if opts.preserve_unknown_bodies {
                    let end = body_start + body_len;
                    if buf.len() < end {
                        return Err(Error::TruncatedBuffer {
                            needed: end,
                            available: buf.len(),
                        });
                    }
                    let bytes = buf[body_start..end].to_vec();
                    *offset = end;
                    Some(bytes)
                } else {
                    *offset = body_start + body_len;
                    None
                };
                SectionBody::Unknown(Unknown { raw })
            }
        };
        Ok(Section { core, body })
    }

    /// Encodes this section's core header and body, appending to `out`.
    /// `size` on the core header is recomputed from the body first, so
    /// callers never need to keep it manually in sync. Per `MUD_getSize`,
    /// `size` covers the whole section as written -- the 12-byte core
    /// header plus the variant body -- not just the body.
    pub fn encode(&mut self, out: &mut Vec<u8>) {
        self.core.size = CoreHeader::WIRE_SIZE + self.body_size();
        self.core.encode(out);
        self.encode_body(out);
    }

    fn encode_body(&self, out: &mut Vec<u8>) {
        match &self.body {
            SectionBody::FixedHeader {
                file_size,
                format_id,
            } => {
                write_u32(out, *file_size);
                write_u32(out, *format_id);
            }
            SectionBody::Group(g) => g.encode(out),
            SectionBody::Eof => {}
            SectionBody::Comment(c) => c.encode(out),
            SectionBody::GenRunDesc(r) => r.encode(out),
            SectionBody::TriTiRunDesc(r) => r.encode(out),
            SectionBody::GenHistHdr(h) => h.encode(out),
            SectionBody::GenHistDat(h) => h.encode(out),
            SectionBody::GenScaler(s) => s.encode(out),
            SectionBody::GenIndVar(v) => v.encode(out),
            SectionBody::GenArray(a) => a.encode(out),
            SectionBody::Unknown(u) => {
                if let Some(raw) = &u.raw {
                    out.extend_from_slice(raw);
                }
            }
        }
    }

    /// The size of this section's own body, excluding any nested group
    /// members (`MUD_getSize`'s per-kind branch).
    pub fn body_size(&self) -> u32 {
        match &self.body {
            SectionBody::FixedHeader { .. } => 8,
            SectionBody::Group(g) => g.header_size(),
            SectionBody::Eof => 0,
            SectionBody::Comment(c) => c.size(),
            SectionBody::GenRunDesc(r) => r.size(),
            SectionBody::TriTiRunDesc(r) => r.size(),
            SectionBody::GenHistHdr(h) => h.size(),
            SectionBody::GenHistDat(h) => h.size(),
            SectionBody::GenScaler(s) => s.size(),
            SectionBody::GenIndVar(v) => v.size(),
            SectionBody::GenArray(a) => a.size(),
            SectionBody::Unknown(u) => u.raw.as_ref().map(|r| r.len() as u32).unwrap_or(0),
        }
    }

    /// Total size on the wire including nested group members, i.e.
    /// `MUD_totSize`: `getSize(s) + (s is a group ? memSize(s) : 0)`, where
    /// `getSize` is the core header plus this section's own body.
    pub fn total_size(&self) -> u32 {
        let own_size = CoreHeader::WIRE_SIZE + self.body_size();
        match &self.body {
            SectionBody::Group(g) => own_size + g.mem_size,
            _ => own_size,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.body, SectionBody::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.body {
            SectionBody::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.body {
            SectionBody::Group(g) => Some(g),
            _ => None,
        }
    }
}
