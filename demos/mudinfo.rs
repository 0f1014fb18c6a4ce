//! Prints the section tree of a MUD file: one line per section, indented
//! by nesting depth. A debug aid, not a supported API surface -- the
//! friendly display/dump formatting the reference implementation ships
//! (`MUD_show`/`MUD_heads`) is out of scope for this crate's library API.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use mudfile::section::{Section, SectionBody};
use mudfile::{io as mud_io, ReadOptions};

fn describe(section: &Section, depth: usize) {
    let indent = "  ".repeat(depth);
    let kind = match &section.body {
        SectionBody::FixedHeader { .. } => "FixedHeader",
        SectionBody::Group(_) => "Group",
        SectionBody::Eof => "Eof",
        SectionBody::Comment(_) => "Comment",
        SectionBody::GenRunDesc(_) => "GenRunDesc",
        SectionBody::TriTiRunDesc(_) => "TriTiRunDesc",
        SectionBody::GenHistHdr(_) => "GenHistHdr",
        SectionBody::GenHistDat(_) => "GenHistDat",
        SectionBody::GenScaler(_) => "GenScaler",
        SectionBody::GenIndVar(_) => "GenIndVar",
        SectionBody::GenArray(_) => "GenArray",
        SectionBody::Unknown(_) => "Unknown",
    };
    println!(
        "{indent}{kind} secID=0x{:08x} instanceID={} size={}",
        section.core.sec_id,
        section.core.instance_id,
        section.total_size()
    );
    if let Some(group) = section.as_group() {
        for member in &group.members {
            describe(member, depth + 1);
        }
    }
}

fn main() -> ExitCode {
    let _ = stderrlog::new().verbosity(1).init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: mudinfo <path>");
        return ExitCode::FAILURE;
    };

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut reader = BufReader::new(file);

    match mud_io::read_file(&mut reader, &ReadOptions::new()) {
        Ok((sections, complete)) => {
            for section in &sections {
                describe(section, 0);
            }
            if !complete {
                eprintln!("warning: stream ended before an Eof section was seen");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{path}: {e}");
            ExitCode::FAILURE
        }
    }
}
