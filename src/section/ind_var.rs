//! `GenIndVar`: summary statistics for an independent variable recorded
//! during a run (e.g. temperature, field), stored as VAX doubles on the
//! wire.

use crate::codec::{ieee_to_vax_f64, read_str, str_size, vax_to_ieee_f64, write_str, write_u32};
use crate::error::Result;
use scroll::Pread;
use scroll::BE;

#[derive(Debug, Clone, Default)]
pub struct GenIndVar {
    pub low: f64,
    pub high: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub name: String,
    pub description: String,
    pub units: String,
}

fn read_vax_f64(buf: &[u8], offset: &mut usize) -> Result<f64> {
    let hi = buf.gread_with::<u32>(offset, BE)?;
    let lo = buf.gread_with::<u32>(offset, BE)?;
    Ok(vax_to_ieee_f64(hi, lo))
}

fn write_vax_f64(out: &mut Vec<u8>, value: f64) {
    let (hi, lo) = ieee_to_vax_f64(value);
    write_u32(out, hi);
    write_u32(out, lo);
}

impl GenIndVar {
    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(GenIndVar {
            low: read_vax_f64(buf, offset)?,
            high: read_vax_f64(buf, offset)?,
            mean: read_vax_f64(buf, offset)?,
            std_dev: read_vax_f64(buf, offset)?,
            skewness: read_vax_f64(buf, offset)?,
            name: read_str(buf, offset)?,
            description: read_str(buf, offset)?,
            units: read_str(buf, offset)?,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_vax_f64(out, self.low);
        write_vax_f64(out, self.high);
        write_vax_f64(out, self.mean);
        write_vax_f64(out, self.std_dev);
        write_vax_f64(out, self.skewness);
        write_str(out, &self.name);
        write_str(out, &self.description);
        write_str(out, &self.units);
    }

    pub fn size(&self) -> u32 {
        40 + str_size(&self.name) + str_size(&self.description) + str_size(&self.units)
    }
}
