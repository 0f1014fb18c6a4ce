//! Histogram sections: a fixed-field header (`GenHistHdr`) describing bin
//! layout and timing, paired with a data section (`GenHistDat`) holding the
//! (possibly packed, see [`crate::pack`]) bin counts.

use crate::codec::{read_str, read_u32, str_size, write_str, write_u32};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct GenHistHdr {
    pub hist_type: u32,
    pub n_bytes: u32,
    pub n_bins: u32,
    pub bytes_per_bin: u32,
    pub fs_per_bin: u32,
    pub t0_ps: u32,
    pub t0_bin: u32,
    pub good_bin1: u32,
    pub good_bin2: u32,
    pub bkgd1: u32,
    pub bkgd2: u32,
    pub n_events: u32,
    pub title: String,
}

impl GenHistHdr {
    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(GenHistHdr {
            hist_type: read_u32(buf, offset)?,
            n_bytes: read_u32(buf, offset)?,
            n_bins: read_u32(buf, offset)?,
            bytes_per_bin: read_u32(buf, offset)?,
            fs_per_bin: read_u32(buf, offset)?,
            t0_ps: read_u32(buf, offset)?,
            t0_bin: read_u32(buf, offset)?,
            good_bin1: read_u32(buf, offset)?,
            good_bin2: read_u32(buf, offset)?,
            bkgd1: read_u32(buf, offset)?,
            bkgd2: read_u32(buf, offset)?,
            n_events: read_u32(buf, offset)?,
            title: read_str(buf, offset)?,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.hist_type);
        write_u32(out, self.n_bytes);
        write_u32(out, self.n_bins);
        write_u32(out, self.bytes_per_bin);
        write_u32(out, self.fs_per_bin);
        write_u32(out, self.t0_ps);
        write_u32(out, self.t0_bin);
        write_u32(out, self.good_bin1);
        write_u32(out, self.good_bin2);
        write_u32(out, self.bkgd1);
        write_u32(out, self.bkgd2);
        write_u32(out, self.n_events);
        write_str(out, &self.title);
    }

    pub fn size(&self) -> u32 {
        48 + str_size(&self.title)
    }

    /// Bin width in nanoseconds, derived from `fsPerBin` (femtoseconds per
    /// bin). A pure arithmetic convenience: not a façade over a handle
    /// table, just a unit conversion on a value the caller already owns.
    pub fn ns_per_bin(&self) -> f64 {
        self.fs_per_bin as f64 / 1_000_000.0
    }
}

/// The raw (or packed) histogram payload. `n_bytes` names the encoded
/// length on the wire; whether that payload is packed is recorded by the
/// sibling [`GenHistHdr`] and interpreted by [`crate::pack`], not by this
/// type.
#[derive(Debug, Clone, Default)]
pub struct GenHistDat {
    pub data: Vec<u8>,
}

impl GenHistDat {
    pub fn decode(buf: &[u8], offset: &mut usize, core_size: u32) -> Result<Self> {
        let n_bytes = read_u32(buf, offset)?;
        if n_bytes != core_size.saturating_sub(4) {
            log::debug!(
                "GenHistDat nBytes field ({}) disagrees with core size ({}); trusting core size",
                n_bytes,
                core_size
            );
        }
        let len = core_size.saturating_sub(4) as usize;
        if buf.len() < *offset + len {
            return Err(Error::TruncatedBuffer {
                needed: *offset + len,
                available: buf.len(),
            });
        }
        let data = buf[*offset..*offset + len].to_vec();
        *offset += len;
        Ok(GenHistDat { data })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.data.len() as u32);
        out.extend_from_slice(&self.data);
    }

    pub fn size(&self) -> u32 {
        4 + self.data.len() as u32
    }
}
