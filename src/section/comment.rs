//! `Comment`: a threaded annotation section.

use crate::codec::{read_str, read_u32, str_size, write_str, write_u32};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct Comment {
    pub id: u32,
    pub prev_reply_id: u32,
    pub next_reply_id: u32,
    pub time: u32,
    pub author: String,
    pub title: String,
    /// Note: the reference implementation's struct field is named
    /// `comment`; this crate follows the naming of the distilled data
    /// model instead (`body`), since the field's meaning is identical and
    /// `comment` inside a type already named `Comment` reads as stutter.
    pub body: String,
}

impl Comment {
    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let id = read_u32(buf, offset)?;
        let prev_reply_id = read_u32(buf, offset)?;
        let next_reply_id = read_u32(buf, offset)?;
        let time = read_u32(buf, offset)?;
        let author = read_str(buf, offset)?;
        let title = read_str(buf, offset)?;
        let body = read_str(buf, offset)?;
        Ok(Comment {
            id,
            prev_reply_id,
            next_reply_id,
            time,
            author,
            title,
            body,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.id);
        write_u32(out, self.prev_reply_id);
        write_u32(out, self.next_reply_id);
        write_u32(out, self.time);
        write_str(out, &self.author);
        write_str(out, &self.title);
        write_str(out, &self.body);
    }

    pub fn size(&self) -> u32 {
        16 + str_size(&self.author) + str_size(&self.title) + str_size(&self.body)
    }
}
