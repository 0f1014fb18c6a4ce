//! `GenArray`: a generic one-dimensional sample array (e.g. a slow-control
//! trace), optionally paired with a per-sample time array.

use crate::codec::{
    ieee_to_vax_f32, ieee_to_vax_f64, read_u32, vax_to_ieee_f32, vax_to_ieee_f64, write_u32,
};
use crate::error::{Error, Result};
use scroll::Pread;
use scroll::BE;

/// Element encoding for a [`GenArray`]'s payload, mirroring the reference
/// implementation's `type` field: `1` and `3` are both raw byte payloads
/// (the original distinguishes them only for its display routine, which is
/// out of scope here), `2` is VAX floating point sized by `elem_size`.
#[derive(Debug, Clone)]
pub enum ArrayPayload {
    Raw(Vec<u8>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl Default for ArrayPayload {
    fn default() -> Self {
        ArrayPayload::Raw(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenArray {
    pub elem_size: u32,
    pub kind: u32,
    pub payload: ArrayPayload,
    pub time: Option<Vec<u32>>,
}

impl GenArray {
    fn num(&self) -> u32 {
        match &self.payload {
            ArrayPayload::Raw(bytes) => {
                if self.elem_size == 0 {
                    0
                } else {
                    bytes.len() as u32 / self.elem_size
                }
            }
            ArrayPayload::Float32(v) => v.len() as u32,
            ArrayPayload::Float64(v) => v.len() as u32,
        }
    }

    fn payload_bytes(&self) -> u32 {
        match &self.payload {
            ArrayPayload::Raw(bytes) => bytes.len() as u32,
            ArrayPayload::Float32(v) => v.len() as u32 * 4,
            ArrayPayload::Float64(v) => v.len() as u32 * 8,
        }
    }

    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let num = read_u32(buf, offset)?;
        let elem_size = read_u32(buf, offset)?;
        let kind = read_u32(buf, offset)?;
        let has_time = read_u32(buf, offset)? != 0;
        let n_bytes = read_u32(buf, offset)?;

        let payload = match kind {
            2 if elem_size == 4 => {
                let mut v = Vec::with_capacity(num as usize);
                for _ in 0..num {
                    let raw = buf.gread_with::<u32>(offset, BE)?;
                    v.push(vax_to_ieee_f32(raw));
                }
                ArrayPayload::Float32(v)
            }
            2 if elem_size == 8 => {
                let mut v = Vec::with_capacity(num as usize);
                for _ in 0..num {
                    let hi = buf.gread_with::<u32>(offset, BE)?;
                    let lo = buf.gread_with::<u32>(offset, BE)?;
                    v.push(vax_to_ieee_f64(hi, lo));
                }
                ArrayPayload::Float64(v)
            }
            _ => {
                let len = n_bytes as usize;
                if buf.len() < *offset + len {
                    return Err(Error::TruncatedBuffer {
                        needed: *offset + len,
                        available: buf.len(),
                    });
                }
                let bytes = buf[*offset..*offset + len].to_vec();
                *offset += len;
                ArrayPayload::Raw(bytes)
            }
        };

        let time = if has_time {
            let mut t = Vec::with_capacity(num as usize);
            for _ in 0..num {
                t.push(read_u32(buf, offset)?);
            }
            Some(t)
        } else {
            None
        };

        Ok(GenArray {
            elem_size,
            kind,
            payload,
            time,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.num());
        write_u32(out, self.elem_size);
        write_u32(out, self.kind);
        write_u32(out, if self.time.is_some() { 1 } else { 0 });
        write_u32(out, self.payload_bytes());
        match &self.payload {
            ArrayPayload::Raw(bytes) => out.extend_from_slice(bytes),
            ArrayPayload::Float32(v) => {
                for f in v {
                    write_u32(out, ieee_to_vax_f32(*f));
                }
            }
            ArrayPayload::Float64(v) => {
                for d in v {
                    let (hi, lo) = ieee_to_vax_f64(*d);
                    write_u32(out, hi);
                    write_u32(out, lo);
                }
            }
        }
        if let Some(time) = &self.time {
            for t in time {
                write_u32(out, *t);
            }
        }
    }

    pub fn size(&self) -> u32 {
        20 + self.payload_bytes() + self.time.as_ref().map(|t| t.len() as u32 * 4).unwrap_or(0)
    }
}
