//! `Group`: a section that nests other sections beneath it.
//!
//! A group's own encoded body is just its member *index* — `num` entries of
//! `{offset, secID, instanceID}` — not the member sections themselves. The
//! member sections are separate entries in the surrounding stream,
//! immediately following the group header; [`crate::io`] is what walks that
//! structure recursively and populates [`Group::members`].

use crate::codec::{read_u32, write_u32};
use crate::error::Result;
use crate::section::Section;

/// One entry in a group's member index: where a member sits relative to
/// the end of the group's own header, and which section it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: u32,
    pub sec_id: u32,
    pub instance_id: u32,
}

impl IndexEntry {
    pub const WIRE_SIZE: u32 = 12;

    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let off = read_u32(buf, offset)?;
        let sec_id = read_u32(buf, offset)?;
        let instance_id = read_u32(buf, offset)?;
        Ok(IndexEntry {
            offset: off,
            sec_id,
            instance_id,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.offset);
        write_u32(out, self.sec_id);
        write_u32(out, self.instance_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Group {
    /// Number of members; kept equal to `index.len()` and `members.len()`
    /// by the tree operations in [`crate::tree`].
    pub num: u32,
    /// Total encoded size, in bytes, of every member (recursively,
    /// including their own nested members), excluding this group's own
    /// header.
    pub mem_size: u32,
    pub index: Vec<IndexEntry>,
    pub members: Vec<Section>,
}

impl Group {
    pub fn decode(buf: &[u8], offset: &mut usize, _core_size: u32) -> Result<Self> {
        let num = read_u32(buf, offset)?;
        let mem_size = read_u32(buf, offset)?;
        let mut index = Vec::with_capacity(num as usize);
        for _ in 0..num {
            index.push(IndexEntry::decode(buf, offset)?);
        }
        Ok(Group {
            num,
            mem_size,
            index,
            members: Vec::new(),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.num);
        write_u32(out, self.mem_size);
        for entry in &self.index {
            entry.encode(out);
        }
    }

    /// Size of the group's own header: `num`, `memSize`, then the index
    /// table, never including the members themselves.
    pub fn header_size(&self) -> u32 {
        8 + self.index.len() as u32 * IndexEntry::WIRE_SIZE
    }
}
