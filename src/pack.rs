//! The histogram packer: width conversion between fixed-width bin arrays
//! and a variable-width run-length-style encoding, framed as `{u16
//! runLength, u8 perBinWidth, payload}` runs.
//!
//! Mirrors the reference implementation's `MUD_SEC_GEN_HIST_pack`/`_unpack`
//! (both thin wrappers that just call `dopack` in either direction) and
//! `MUD_SEC_GEN_HIST_dopack`, which take an input bin width and an output
//! bin width: `{1, 2, 4}` means fixed-width, `0` means the framed
//! variable-width encoding. `dopack` covers all three shapes the
//! reference's macro-expanded 9-combination fixed-to-fixed table, its
//! fixed-to-variable packing, and its variable-to-fixed unpacking handle;
//! the fixed-to-fixed case collapses here into one generic byte-width
//! conversion rather than 9 copy-pasted branches, the kind of duplicated
//! boilerplate Rust's generics are suited to collapsing.
//!
//! `perBinWidth` is one of `{0, 1, 2, 4}` bytes per bin in the variable
//! encoding; `0` means a literal run of zero-valued bins and carries no
//! payload at all. A run's length is capped at 65535 bins (the field is a
//! `u16`); longer stretches of uniform width are split across consecutive
//! frames.

use crate::error::{Error, Result};

const FRAME_OVERHEAD: i64 = 3;
const MAX_RUN_LEN: usize = 0xffff;

/// Minimal byte width able to hold `value`: `0` only for `0` itself, else
/// `1`, `2`, or `4`.
pub fn n_bytes_needed(value: u32) -> u8 {
    if value == 0 {
        0
    } else if value <= 0xff {
        1
    } else if value <= 0xffff {
        2
    } else {
        4
    }
}

fn write_bin(out: &mut Vec<u8>, value: u32, width: u8) {
    match width {
        0 => {}
        1 => out.push(value as u8),
        2 => out.extend_from_slice(&(value as u16).to_be_bytes()),
        4 => out.extend_from_slice(&value.to_be_bytes()),
        _ => unreachable!("perBinWidth is always 0, 1, 2, or 4"),
    }
}

fn read_bin(buf: &[u8], pos: &mut usize, width: u8) -> Result<u32> {
    let value = match width {
        0 => 0,
        1 => {
            let b = *buf.get(*pos).ok_or(Error::TruncatedBuffer {
                needed: *pos + 1,
                available: buf.len(),
            })?;
            *pos += 1;
            b as u32
        }
        2 => {
            if buf.len() < *pos + 2 {
                return Err(Error::TruncatedBuffer {
                    needed: *pos + 2,
                    available: buf.len(),
                });
            }
            let v = u16::from_be_bytes([buf[*pos], buf[*pos + 1]]);
            *pos += 2;
            v as u32
        }
        4 => {
            if buf.len() < *pos + 4 {
                return Err(Error::TruncatedBuffer {
                    needed: *pos + 4,
                    available: buf.len(),
                });
            }
            let v = u32::from_be_bytes([buf[*pos], buf[*pos + 1], buf[*pos + 2], buf[*pos + 3]]);
            *pos += 4;
            v
        }
        _ => {
            return Err(Error::PackOverflow(
                "perBinWidth in frame header was not 0, 1, 2, or 4",
            ));
        }
    };
    Ok(value)
}

fn write_frame_header(out: &mut Vec<u8>, run_len: u16, width: u8) {
    out.extend_from_slice(&run_len.to_be_bytes());
    out.push(width);
}

fn read_fixed_bins(buf: &[u8], num: usize, bin_size: u8) -> Result<Vec<u32>> {
    let mut pos = 0usize;
    let mut bins = Vec::with_capacity(num);
    for _ in 0..num {
        bins.push(read_bin(buf, &mut pos, bin_size)?);
    }
    Ok(bins)
}

fn write_fixed_bins(bins: &[u32], bin_size: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(bins.len() * bin_size as usize);
    for &bin in bins {
        // Narrowing (e.g. a 4-byte count written at 1-byte width) truncates
        // to the low-order bytes, matching the reference's plain
        // byte-copy-and-swap fixed-to-fixed conversion; it is the caller's
        // responsibility to pick an output width wide enough for the data.
        write_bin(&mut out, bin, bin_size);
    }
    out
}

/// Converts `num` bins from a fixed-width encoding to another fixed
/// width: each value is reinterpreted at the new width, zero-extending
/// when widening and truncating to the low-order bytes when narrowing.
fn convert_fixed_to_fixed(input: &[u8], num: usize, in_bin_size: u8, out_bin_size: u8) -> Result<Vec<u8>> {
    let bins = read_fixed_bins(input, num, in_bin_size)?;
    Ok(write_fixed_bins(&bins, out_bin_size))
}

/// Packs `bins` into the framed variable-width run encoding.
fn pack_variable(bins: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bins.len() {
        if bins[i] == 0 {
            let start = i;
            while i < bins.len() && bins[i] == 0 && (i - start) < MAX_RUN_LEN {
                i += 1;
            }
            write_frame_header(&mut out, (i - start) as u16, 0);
            continue;
        }

        let start = i;
        let width = n_bytes_needed(bins[i]);
        i += 1;

        // Track the start of a run of narrower-than-`width` values seen
        // while scanning ahead, and the bytes it would save if the wide
        // run were cut right there. Once those savings exceed the cost of
        // a new frame header, the wide run is cut *at the start of that
        // narrower stretch* -- not at the bin where the threshold was
        // crossed -- so none of the narrower values get paid for twice.
        let mut narrow_start: Option<usize> = None;
        let mut savings = 0i64;
        let mut cut_at: Option<usize> = None;

        while i < bins.len() && (i - start) < MAX_RUN_LEN {
            if bins[i] == 0 {
                break; // a zero run always gets its own frame
            }
            let needed = n_bytes_needed(bins[i]);
            if needed > width {
                break; // this value no longer fits the current run's width
            }
            if needed < width {
                if narrow_start.is_none() {
                    narrow_start = Some(i);
                    savings = 0;
                }
                savings += (width - needed) as i64;
                if savings > FRAME_OVERHEAD {
                    cut_at = narrow_start;
                    break;
                }
            } else {
                narrow_start = None;
                savings = 0;
            }
            i += 1;
        }

        let run_end = cut_at.unwrap_or(i);
        write_frame_header(&mut out, (run_end - start) as u16, width);
        for &bin in &bins[start..run_end] {
            write_bin(&mut out, bin, width);
        }
        i = run_end;
    }
    out
}

/// Unpacks a framed variable-width byte stream back into `n_bins` bin
/// values.
fn unpack_variable(buf: &[u8], n_bins: usize) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(n_bins);
    let mut pos = 0usize;
    while out.len() < n_bins {
        if buf.len() < pos + 3 {
            return Err(Error::TruncatedBuffer {
                needed: pos + 3,
                available: buf.len(),
            });
        }
        let run_len = u16::from_be_bytes([buf[pos], buf[pos + 1]]) as usize;
        let width = buf[pos + 2];
        pos += 3;
        if !matches!(width, 0 | 1 | 2 | 4) {
            return Err(Error::PackOverflow(
                "perBinWidth in frame header was not 0, 1, 2, or 4",
            ));
        }
        if out.len() + run_len > n_bins {
            return Err(Error::PackOverflow(
                "frame run length overruns the declared bin count",
            ));
        }
        for _ in 0..run_len {
            out.push(read_bin(buf, &mut pos, width)?);
        }
    }
    Ok(out)
}

fn check_bin_size(bin_size: u8) -> Result<()> {
    if matches!(bin_size, 0 | 1 | 2 | 4) {
        Ok(())
    } else {
        Err(Error::PackOverflow("bin size must be 0, 1, 2, or 4"))
    }
}

/// Converts `num` bins from `in_bin_size` bytes/bin to `out_bin_size`
/// bytes/bin. A size of `0` means the variable framed encoding on that
/// side; `1`, `2`, or `4` means fixed-width raw integers. Mirrors the
/// reference's `dopack`, which both `pack` and `unpack` call through to.
fn dopack(num: usize, in_bin_size: u8, input: &[u8], out_bin_size: u8) -> Result<Vec<u8>> {
    check_bin_size(in_bin_size)?;
    check_bin_size(out_bin_size)?;

    if in_bin_size != 0 && out_bin_size != 0 {
        return convert_fixed_to_fixed(input, num, in_bin_size, out_bin_size);
    }

    let bins = if in_bin_size == 0 {
        unpack_variable(input, num)?
    } else {
        read_fixed_bins(input, num, in_bin_size)?
    };

    if out_bin_size == 0 {
        Ok(pack_variable(&bins))
    } else {
        Ok(write_fixed_bins(&bins, out_bin_size))
    }
}

/// Packs `num` bins from `in_bin_size` bytes/bin down to `out_bin_size`
/// bytes/bin (`0` for the variable framed encoding). Equivalent to
/// [`unpack`]; both exist, matching the reference, because the direction
/// of travel is a caller-facing distinction even though the underlying
/// conversion is symmetric.
pub fn pack(num: usize, in_bin_size: u8, input: &[u8], out_bin_size: u8) -> Result<Vec<u8>> {
    dopack(num, in_bin_size, input, out_bin_size)
}

/// Unpacks `num` bins from `in_bin_size` bytes/bin to `out_bin_size`
/// bytes/bin (`0` for the variable framed encoding). See [`pack`].
pub fn unpack(num: usize, in_bin_size: u8, input: &[u8], out_bin_size: u8) -> Result<Vec<u8>> {
    dopack(num, in_bin_size, input, out_bin_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_bytes(values: &[u32], width: u8) -> Vec<u8> {
        write_fixed_bins(values, width)
    }

    #[test]
    fn round_trips_mixed_widths_through_variable_encoding() {
        let bins: Vec<u32> = vec![0, 0, 0, 5, 6, 7, 300, 301, 70000, 1, 0, 0];
        let fixed = fixed_bytes(&bins, 4);
        let packed = pack(bins.len(), 4, &fixed, 0).unwrap();
        let unpacked = unpack(bins.len(), 0, &packed, 4).unwrap();
        assert_eq!(fixed, unpacked);
    }

    #[test]
    fn all_zero_run_has_no_payload() {
        let bins = vec![0u32; 1000];
        let fixed = fixed_bytes(&bins, 2);
        let packed = pack(bins.len(), 2, &fixed, 0).unwrap();
        // one frame header (3 bytes), no payload
        assert_eq!(packed.len(), 3);
        assert_eq!(unpack(bins.len(), 0, &packed, 2).unwrap(), fixed);
    }

    #[test]
    fn splits_runs_longer_than_max_u16() {
        let bins = vec![7u32; 70_000];
        let fixed = fixed_bytes(&bins, 1);
        let packed = pack(bins.len(), 1, &fixed, 0).unwrap();
        let unpacked = unpack(bins.len(), 0, &packed, 1).unwrap();
        assert_eq!(fixed, unpacked);
        // must have split into at least two frames
        assert!(packed.len() > 3 + 70_000);
    }

    #[test]
    fn run_cuts_before_the_narrower_stretch_not_at_the_payoff_bin() {
        // A wide (2-byte) run followed by enough narrow (1-byte) values to
        // make switching worthwhile. The cut must land exactly at the
        // first narrow value, so none of the narrow run's bytes are
        // doubly represented in the wide frame.
        let bins: Vec<u32> = vec![300, 301, 1, 2, 3, 4, 5];
        let packed = pack_variable(&bins);

        let first_run_len = u16::from_be_bytes([packed[0], packed[1]]) as usize;
        let first_run_width = packed[2];
        assert_eq!(first_run_width, 2);
        assert_eq!(first_run_len, 2, "wide run must end before the narrow stretch begins");

        let unpacked = unpack_variable(&packed, bins.len()).unwrap();
        assert_eq!(bins, unpacked);
    }

    #[test]
    fn n_bytes_needed_boundaries() {
        assert_eq!(n_bytes_needed(0), 0);
        assert_eq!(n_bytes_needed(0xff), 1);
        assert_eq!(n_bytes_needed(0x100), 2);
        assert_eq!(n_bytes_needed(0xffff), 2);
        assert_eq!(n_bytes_needed(0x1_0000), 4);
    }

    #[test]
    fn fixed_to_fixed_covers_every_width_combination() {
        let bins: Vec<u32> = vec![0, 1, 0xff, 0x1234, 0xabcdef];
        for &in_width in &[1u8, 2, 4] {
            for &out_width in &[1u8, 2, 4] {
                let input = fixed_bytes(&bins, in_width);
                let converted = pack(bins.len(), in_width, &input, out_width).unwrap();
                let mask: u32 = match out_width {
                    1 => 0xff,
                    2 => 0xffff,
                    4 => u32::MAX,
                    _ => unreachable!(),
                };
                let expected: Vec<u32> = bins.iter().map(|b| b & mask).collect();
                let expected_bytes = fixed_bytes(&expected, out_width);
                assert_eq!(converted, expected_bytes, "in={in_width} out={out_width}");
            }
        }
    }

    #[test]
    fn fixed_to_variable_and_back_round_trips() {
        let bins: Vec<u32> = vec![10, 20, 0, 0, 300_000, 1, 1, 1];
        let fixed = fixed_bytes(&bins, 4);
        let packed = pack(bins.len(), 4, &fixed, 0).unwrap();
        let back = unpack(bins.len(), 0, &packed, 4).unwrap();
        assert_eq!(fixed, back);
    }
}
