//! `GenScaler`: a named pair of event-rate counters.

use crate::codec::{read_str, read_u32, str_size, write_str, write_u32};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct GenScaler {
    pub counts: [u32; 2],
    pub label: String,
}

impl GenScaler {
    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let counts = [read_u32(buf, offset)?, read_u32(buf, offset)?];
        let label = read_str(buf, offset)?;
        Ok(GenScaler { counts, label })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.counts[0]);
        write_u32(out, self.counts[1]);
        write_str(out, &self.label);
    }

    pub fn size(&self) -> u32 {
        8 + str_size(&self.label)
    }
}
