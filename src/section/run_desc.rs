//! Run description sections: the generic (`GenRunDesc`) and TRI-TI
//! (`TriTiRunDesc`) variants. Both share the same leading numeric fields
//! (experiment/run identification and timing) and differ only in which
//! free-text fields follow.

use crate::codec::{read_str, read_u32, str_size, write_str, write_u32};
use crate::error::Result;

/// Numeric fields common to every run description variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunIdentity {
    pub expt_number: u32,
    pub run_number: u32,
    pub time_begin: u32,
    pub time_end: u32,
    pub elapsed_sec: u32,
}

impl RunIdentity {
    fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(RunIdentity {
            expt_number: read_u32(buf, offset)?,
            run_number: read_u32(buf, offset)?,
            time_begin: read_u32(buf, offset)?,
            time_end: read_u32(buf, offset)?,
            elapsed_sec: read_u32(buf, offset)?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_u32(out, self.expt_number);
        write_u32(out, self.run_number);
        write_u32(out, self.time_begin);
        write_u32(out, self.time_end);
        write_u32(out, self.elapsed_sec);
    }

    const WIRE_SIZE: u32 = 20;
}

/// The lab-agnostic generic run description, carried by every acquisition
/// system's GEN-format files.
#[derive(Debug, Clone, Default)]
pub struct GenRunDesc {
    pub identity: RunIdentity,
    pub title: String,
    pub lab: String,
    pub area: String,
    pub method: String,
    pub apparatus: String,
    pub insert: String,
    pub sample: String,
    pub orient: String,
    pub das: String,
    pub experimenter: String,
    pub temperature: String,
    pub field: String,
}

impl GenRunDesc {
    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let identity = RunIdentity::decode(buf, offset)?;
        Ok(GenRunDesc {
            identity,
            title: read_str(buf, offset)?,
            lab: read_str(buf, offset)?,
            area: read_str(buf, offset)?,
            method: read_str(buf, offset)?,
            apparatus: read_str(buf, offset)?,
            insert: read_str(buf, offset)?,
            sample: read_str(buf, offset)?,
            orient: read_str(buf, offset)?,
            das: read_str(buf, offset)?,
            experimenter: read_str(buf, offset)?,
            temperature: read_str(buf, offset)?,
            field: read_str(buf, offset)?,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        self.identity.encode(out);
        for s in self.strings() {
            write_str(out, s);
        }
    }

    pub fn size(&self) -> u32 {
        RunIdentity::WIRE_SIZE + self.strings().iter().map(|s| str_size(s)).sum::<u32>()
    }

    fn strings(&self) -> [&str; 12] {
        [
            &self.title,
            &self.lab,
            &self.area,
            &self.method,
            &self.apparatus,
            &self.insert,
            &self.sample,
            &self.orient,
            &self.das,
            &self.experimenter,
            &self.temperature,
            &self.field,
        ]
    }
}

/// The TRI-TI (TRIUMF time-integrated) format's run description: same
/// numeric header as [`GenRunDesc`], but no temperature/field, and three
/// free-form comment fields plus a subtitle instead.
#[derive(Debug, Clone, Default)]
pub struct TriTiRunDesc {
    pub identity: RunIdentity,
    pub title: String,
    pub lab: String,
    pub area: String,
    pub method: String,
    pub apparatus: String,
    pub insert: String,
    pub sample: String,
    pub orient: String,
    pub das: String,
    pub experimenter: String,
    pub subtitle: String,
    pub comment1: String,
    pub comment2: String,
    pub comment3: String,
}

impl TriTiRunDesc {
    pub fn decode(buf: &[u8], offset: &mut usize) -> Result<Self> {
        let identity = RunIdentity::decode(buf, offset)?;
        Ok(TriTiRunDesc {
            identity,
            title: read_str(buf, offset)?,
            lab: read_str(buf, offset)?,
            area: read_str(buf, offset)?,
            method: read_str(buf, offset)?,
            apparatus: read_str(buf, offset)?,
            insert: read_str(buf, offset)?,
            sample: read_str(buf, offset)?,
            orient: read_str(buf, offset)?,
            das: read_str(buf, offset)?,
            experimenter: read_str(buf, offset)?,
            subtitle: read_str(buf, offset)?,
            comment1: read_str(buf, offset)?,
            comment2: read_str(buf, offset)?,
            comment3: read_str(buf, offset)?,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        self.identity.encode(out);
        for s in self.strings() {
            write_str(out, s);
        }
    }

    pub fn size(&self) -> u32 {
        RunIdentity::WIRE_SIZE + self.strings().iter().map(|s| str_size(s)).sum::<u32>()
    }

    fn strings(&self) -> [&str; 14] {
        [
            &self.title,
            &self.lab,
            &self.area,
            &self.method,
            &self.apparatus,
            &self.insert,
            &self.sample,
            &self.orient,
            &self.das,
            &self.experimenter,
            &self.subtitle,
            &self.comment1,
            &self.comment2,
            &self.comment3,
        ]
    }
}
