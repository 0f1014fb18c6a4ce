//! Streaming file I/O: the read/write driver over an abstract
//! `Read + Seek` / `Write + Seek` stream, plus the multi-pass group write
//! protocol used to emit a group's members without holding them all in
//! memory first.
//!
//! Opening a path into a stream, and closing it, are explicitly out of
//! scope here (see `spec.md`'s non-goals) -- everything in this module
//! takes an already-open stream.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::codec::write_u32;
use crate::error::{Error, Result};
use crate::ids::MUD_SEC_EOF_ID;
use crate::section::{CoreHeader, Group, IndexEntry, Section};
use crate::ReadOptions;

/// Reads one section at the stream's current position. If it's a group,
/// its `num` members are then read in turn (they immediately follow the
/// group's own header on the wire) and stashed in `Group::members`.
pub fn read_section<R: Read + Seek>(reader: &mut R, opts: &ReadOptions) -> Result<Section> {
    let mut header_buf = [0u8; CoreHeader::WIRE_SIZE as usize];
    reader.read_exact(&mut header_buf)?;
    let core = {
        let mut off = 0usize;
        CoreHeader::decode(&header_buf, &mut off)?
    };

    let body_len = core.size.saturating_sub(CoreHeader::WIRE_SIZE) as usize;
    let mut body = vec![0u8; body_len];
    reader.read_exact(&mut body)?;

    let mut whole = Vec::with_capacity(header_buf.len() + body.len());
    whole.extend_from_slice(&header_buf);
    whole.extend_from_slice(&body);
    let mut offset = 0usize;
    let mut section = Section::decode(&whole, &mut offset, opts)?;

    if let Some(group) = section.as_group_mut() {
        let num = group.num;
        for _ in 0..num {
            let member = read_section(reader, opts)?;
            group.members.push(member);
        }
    }

    Ok(section)
}

/// Reads an entire file's worth of top-level sections starting at the
/// stream's current position (typically `0`, so the first section read is
/// the file's `FixedHeader`), stopping at an `Eof` section or the stream's
/// end. Returns the sibling list plus whether an `Eof` section was the
/// reason it stopped (`false` means the stream simply ran out, i.e. a
/// truncated file).
pub fn read_file<R: Read + Seek>(
    reader: &mut R,
    opts: &ReadOptions,
) -> Result<(Vec<Section>, bool)> {
    let mut siblings = Vec::new();
    loop {
        let section = match read_section(reader, opts) {
            Ok(s) => s,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok((siblings, false));
            }
            Err(e) => return Err(e),
        };
        let is_eof = section.core.sec_id == MUD_SEC_EOF_ID;
        siblings.push(section);
        if is_eof {
            return Ok((siblings, true));
        }
    }
}

/// Writes one section, including (recursively) a group's members, to the
/// stream's current position, in one shot. `set_sizes` is expected to have
/// already been run over `section` so `core.size`/`memSize` are current;
/// this does not recompute them.
pub fn write_section<W: Write + Seek>(writer: &mut W, section: &mut Section) -> Result<()> {
    let mut header_and_body = Vec::new();
    section.encode(&mut header_and_body);
    writer.write_all(&header_and_body)?;

    if let Some(group) = section.as_group_mut() {
        for member in group.members.iter_mut() {
            write_section(writer, member)?;
        }
    }
    Ok(())
}

/// Writes a full sibling list (typically `FixedHeader ... Eof`) in one
/// shot.
pub fn write_file<W: Write + Seek>(writer: &mut W, siblings: &mut [Section]) -> Result<()> {
    for section in siblings.iter_mut() {
        write_section(writer, section)?;
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum GroupWriterState {
    Streaming,
    Finalized,
}

/// Streams a group's members out without buffering their encoded bytes:
/// each member is written directly to the underlying stream as soon as
/// `write_member` is called, and only its lightweight index entry (12
/// bytes) is kept in memory meanwhile.
///
/// This requires knowing the member count (`capacity`) up front, since the
/// group's header -- which includes the full index table -- precedes the
/// members on the wire and must be written before anything else. That is
/// the one piece of information streaming acquisition code always has
/// ahead of time (how many histograms/scalers a run will produce), even
/// when each member's own data is still being collected.
///
/// State machine: `start` (reserve header space) -> `write_member`* (each
/// member appended, index/memSize accumulated) -> `end` (seek back and
/// backpatch the reserved header, then restore the stream position to
/// just past the last member so writing can continue at the parent
/// level).
pub struct GroupWriter {
    header_pos: u64,
    sec_id: u32,
    instance_id: u32,
    capacity: u32,
    index: Vec<IndexEntry>,
    mem_size: u32,
    state: GroupWriterState,
}

impl GroupWriter {
    pub fn start<W: Write + Seek>(
        writer: &mut W,
        sec_id: u32,
        instance_id: u32,
        capacity: u32,
    ) -> Result<Self> {
        let header_pos = writer.stream_position()?;
        let header_len = CoreHeader::WIRE_SIZE + 8 + capacity * IndexEntry::WIRE_SIZE;
        writer.write_all(&vec![0u8; header_len as usize])?;
        log::debug!(
            "writeGrpStart: secID=0x{:08x} instanceID={} capacity={} at {}",
            sec_id,
            instance_id,
            capacity,
            header_pos
        );
        Ok(GroupWriter {
            header_pos,
            sec_id,
            instance_id,
            capacity,
            index: Vec::with_capacity(capacity as usize),
            mem_size: 0,
            state: GroupWriterState::Streaming,
        })
    }

    pub fn write_member<W: Write + Seek>(&mut self, writer: &mut W, member: &mut Section) -> Result<()> {
        if self.state != GroupWriterState::Streaming {
            return Err(Error::StateViolation(
                "writeGrpMem called after writeGrpEnd",
            ));
        }
        if self.index.len() as u32 >= self.capacity {
            return Err(Error::StateViolation(
                "writeGrpMem called more times than the group's declared capacity",
            ));
        }
        let offset = self.mem_size;
        write_section(writer, member)?;
        let total = member.total_size();
        self.index.push(IndexEntry {
            offset,
            sec_id: member.core.sec_id,
            instance_id: member.core.instance_id,
        });
        self.mem_size += total;
        Ok(())
    }

    /// Backpatches the reserved header and returns an index entry
    /// describing this group, so the caller can chain it into its own
    /// parent's index (or a top-level [`GroupWriter`] can ignore it).
    pub fn end<W: Write + Seek>(mut self, writer: &mut W) -> Result<IndexEntry> {
        if self.index.len() as u32 != self.capacity {
            return Err(Error::StateViolation(
                "writeGrpEnd called before every declared member was written",
            ));
        }
        let end_pos = writer.stream_position()?;

        let core = CoreHeader {
            size: CoreHeader::WIRE_SIZE + 8 + self.capacity * IndexEntry::WIRE_SIZE,
            sec_id: self.sec_id,
            instance_id: self.instance_id,
        };
        let mut header = Vec::new();
        core.encode(&mut header);
        write_u32(&mut header, self.capacity);
        write_u32(&mut header, self.mem_size);
        for entry in &self.index {
            entry.encode(&mut header);
        }

        writer.seek(SeekFrom::Start(self.header_pos))?;
        writer.write_all(&header)?;
        writer.seek(SeekFrom::Start(end_pos))?;

        log::debug!(
            "writeGrpEnd: secID=0x{:08x} instanceID={} memSize={}",
            self.sec_id,
            self.instance_id,
            self.mem_size
        );
        self.state = GroupWriterState::Finalized;
        Ok(IndexEntry {
            offset: 0,
            sec_id: self.sec_id,
            instance_id: self.instance_id,
        })
    }
}

/// Constructs an in-memory [`Group`] body out of already-written members'
/// index entries, for callers that streamed a group with [`GroupWriter`]
/// but still want a decoded-looking tree node to hand back to a caller
/// (e.g. a `Section::new(MUD_SEC_GRP_ID, ..)` placeholder they keep around
/// for navigation after writing).
pub fn finish_group_shell(index: Vec<IndexEntry>, mem_size: u32) -> Group {
    Group {
        num: index.len() as u32,
        mem_size,
        index,
        members: Vec::new(),
    }
}
