//! Navigation: locating a section without decoding the whole tree.
//!
//! `search` walks an already-decoded in-memory tree by `(secID,
//! instanceID)` path. `peek_core`/`fseek`/`fseek_first` instead walk a
//! stream directly, the way a caller would locate one histogram in a
//! multi-gigabyte file without materializing the rest of it.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::codec::write_u32;
use crate::error::{Error, Result};
use crate::section::{CoreHeader, IndexEntry, Section};

/// Reads a section's 12-byte core header from `reader` at its current
/// position, then rewinds to that position -- a non-consuming peek, used
/// to identify a section before deciding whether to fully decode or skip
/// it.
pub fn peek_core<R: Read + Seek>(reader: &mut R) -> Result<CoreHeader> {
    let mut buf = [0u8; CoreHeader::WIRE_SIZE as usize];
    reader.read_exact(&mut buf)?;
    reader.seek(SeekFrom::Current(-(CoreHeader::WIRE_SIZE as i64)))?;
    let mut offset = 0usize;
    CoreHeader::decode(&buf, &mut offset)
}

/// Walks an in-memory sibling list by a path of `(secID, instanceID)`
/// pairs, descending into a matched group's members for each subsequent
/// element. Mirrors `MUD_search`.
pub fn search<'a>(siblings: &'a [Section], path: &[(u32, u32)]) -> Option<&'a Section> {
    let (head, rest) = path.split_first()?;
    let found = siblings
        .iter()
        .find(|s| s.core.sec_id == head.0 && s.core.instance_id == head.1)?;
    if rest.is_empty() {
        Some(found)
    } else {
        let group = found.as_group()?;
        search(&group.members, rest)
    }
}

/// Skips the stream past the file's leading `FixedHeader`, positioning it
/// at the first real section. Every MUD file begins with one.
pub fn fseek_first<R: Read + Seek>(reader: &mut R) -> Result<()> {
    reader.seek(SeekFrom::Start(0))?;
    let core = peek_core(reader)?;
    reader.seek(SeekFrom::Current(core.size as i64))?;
    Ok(())
}

/// Seeks `reader` to the start of the section identified by `(sec_id,
/// instance_id)`.
///
/// When `parent_index` is `Some`, the caller already knows the enclosing
/// group's member index (e.g. while walking a decoded group), so this
/// seeks directly to `group_body_start + entry.offset`. Without a cached
/// index (the top-level sibling chain, where there is no enclosing
/// group), this scans linearly: peek each section's core header, and if
/// it isn't the one wanted, skip forward by its total size and try again.
pub fn fseek<R: Read + Seek>(
    reader: &mut R,
    group_body_start: u64,
    parent_index: Option<&[IndexEntry]>,
    sec_id: u32,
    instance_id: u32,
) -> Result<()> {
    if let Some(index) = parent_index {
        let entry = index
            .iter()
            .find(|e| e.sec_id == sec_id && e.instance_id == instance_id)
            .ok_or(Error::NotFound)?;
        reader.seek(SeekFrom::Start(group_body_start + entry.offset as u64))?;
        let core = peek_core(reader)?;
        if core.sec_id != sec_id || core.instance_id != instance_id {
            return Err(Error::NotFound);
        }
        return Ok(());
    }

    reader.seek(SeekFrom::Start(group_body_start))?;
    loop {
        let core = match peek_core(reader) {
            Ok(c) => c,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(Error::NotFound)
            }
            Err(e) => return Err(e),
        };
        if core.sec_id == sec_id && core.instance_id == instance_id {
            return Ok(());
        }
        if core.sec_id == crate::ids::MUD_SEC_EOF_ID {
            return Err(Error::NotFound);
        }
        reader.seek(SeekFrom::Current(core.size as i64))?;
    }
}

/// Writes a single `u32` at an absolute stream position without
/// disturbing the caller's notion of "current position" elsewhere --
/// used by the streaming group writer to backpatch a header it reserved
/// space for earlier. Exposed here since it is nav/seek plumbing, not
/// codec logic.
pub fn patch_u32<W: std::io::Write + Seek>(writer: &mut W, pos: u64, value: u32) -> Result<()> {
    let mut buf = Vec::with_capacity(4);
    write_u32(&mut buf, value);
    let saved = writer.stream_position()?;
    writer.seek(SeekFrom::Start(pos))?;
    writer.write_all(&buf)?;
    writer.seek(SeekFrom::Start(saved))?;
    Ok(())
}
