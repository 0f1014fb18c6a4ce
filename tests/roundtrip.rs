//! End-to-end scenarios exercising the file I/O driver, tree bookkeeping,
//! and the section codecs together over an in-memory stream.

use std::io::Cursor;

use mudfile::ids::{MUD_FMT_GEN_ID, MUD_SEC_CMT_ID, MUD_SEC_EOF_ID, MUD_SEC_FIXED_ID, MUD_SEC_GRP_ID};
use mudfile::section::{Comment, Section, SectionBody};
use mudfile::{io as mud_io, tree, ReadOptions};

fn fixed_header(format_id: u32) -> Section {
    let mut s = Section::new(MUD_SEC_FIXED_ID, 0);
    if let SectionBody::FixedHeader { format_id: f, .. } = &mut s.body {
        *f = format_id;
    }
    s
}

fn eof() -> Section {
    Section::new(MUD_SEC_EOF_ID, 0)
}

/// S1: a minimal well-formed file -- FixedHeader, one Comment, Eof --
/// round-trips through write_file/read_file byte-for-byte in structure.
#[test]
fn minimal_file_round_trips() {
    let mut comment = Section::new(MUD_SEC_CMT_ID, 1);
    if let SectionBody::Comment(c) = &mut comment.body {
        *c = Comment {
            id: 1,
            prev_reply_id: 0,
            next_reply_id: 0,
            time: 1_700_000_000,
            author: "operator".into(),
            title: "run start".into(),
            body: "beam tuned, starting acquisition".into(),
        };
    }

    let mut tree = vec![fixed_header(MUD_FMT_GEN_ID), comment, eof()];

    let mut out = Cursor::new(Vec::new());
    mud_io::write_file(&mut out, &mut tree).unwrap();

    let mut reader = Cursor::new(out.into_inner());
    let (sections, complete) = mud_io::read_file(&mut reader, &ReadOptions::new()).unwrap();

    assert!(complete);
    assert_eq!(sections.len(), 3);
    assert!(matches!(sections[0].body, SectionBody::FixedHeader { .. }));
    match &sections[1].body {
        SectionBody::Comment(c) => {
            assert_eq!(c.author, "operator");
            assert_eq!(c.body, "beam tuned, starting acquisition");
        }
        _ => panic!("expected Comment"),
    }
    assert!(matches!(sections[2].body, SectionBody::Eof));
}

/// S2: a group with two members has its index/memSize recomputed by
/// `set_sizes` and both members survive a write/read round trip in order.
#[test]
fn grouped_members_round_trip_with_correct_offsets() {
    let mut group_section = Section::new(MUD_SEC_GRP_ID, 0);
    {
        let group = group_section.as_group_mut().unwrap();
        let mut c1 = Section::new(MUD_SEC_CMT_ID, 1);
        if let SectionBody::Comment(c) = &mut c1.body {
            c.title = "first".into();
        }
        let mut c2 = Section::new(MUD_SEC_CMT_ID, 2);
        if let SectionBody::Comment(c) = &mut c2.body {
            c.title = "second, somewhat longer than the first".into();
        }
        tree::add_to_group(group, c1);
        tree::add_to_group(group, c2);
    }
    tree::set_sizes(&mut group_section);

    let mut siblings = vec![fixed_header(MUD_FMT_GEN_ID), group_section, eof()];
    let mut out = Cursor::new(Vec::new());
    mud_io::write_file(&mut out, &mut siblings).unwrap();

    let mut reader = Cursor::new(out.into_inner());
    let (sections, complete) = mud_io::read_file(&mut reader, &ReadOptions::new()).unwrap();
    assert!(complete);

    let group = sections[1].as_group().unwrap();
    assert_eq!(group.members.len(), 2);
    assert_eq!(group.index.len(), 2);
    assert_eq!(group.index[0].offset, 0);
    assert_eq!(group.index[1].offset, group.members[0].total_size());
    match &group.members[0].body {
        SectionBody::Comment(c) => assert_eq!(c.title, "first"),
        _ => panic!("expected Comment"),
    }
    match &group.members[1].body {
        SectionBody::Comment(c) => assert_eq!(c.title, "second, somewhat longer than the first"),
        _ => panic!("expected Comment"),
    }
}

/// Boundary: a zero-member group still round-trips (num == 0, empty
/// index, memSize == 0).
#[test]
fn empty_group_round_trips() {
    let mut group_section = Section::new(MUD_SEC_GRP_ID, 7);
    tree::set_sizes(&mut group_section);

    let mut siblings = vec![fixed_header(MUD_FMT_GEN_ID), group_section, eof()];
    let mut out = Cursor::new(Vec::new());
    mud_io::write_file(&mut out, &mut siblings).unwrap();

    let mut reader = Cursor::new(out.into_inner());
    let (sections, _) = mud_io::read_file(&mut reader, &ReadOptions::new()).unwrap();
    let group = sections[1].as_group().unwrap();
    assert_eq!(group.num, 0);
    assert!(group.index.is_empty());
    assert_eq!(group.mem_size, 0);
}

/// Boundary: an unrecognized secID decodes as Unknown and, by default,
/// is not preserved across a round trip -- matching the reference
/// implementation's documented behaviour.
#[test]
fn unknown_section_is_dropped_by_default_but_kept_when_opted_in() {
    let bogus_sec_id = 0x0000_dead;
    let mut raw = Vec::new();
    mudfile::codec::write_u32(&mut raw, 4); // core.size
    mudfile::codec::write_u32(&mut raw, bogus_sec_id);
    mudfile::codec::write_u32(&mut raw, 0); // instanceID
    raw.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);

    let mut offset = 0usize;
    let default_opts = ReadOptions::new();
    let section = Section::decode(&raw, &mut offset, &default_opts).unwrap();
    match &section.body {
        SectionBody::Unknown(u) => assert!(u.raw.is_none()),
        _ => panic!("expected Unknown"),
    }

    let mut offset2 = 0usize;
    let preserving = ReadOptions::new().preserve_unknown_bodies(true);
    let section2 = Section::decode(&raw, &mut offset2, &preserving).unwrap();
    match &section2.body {
        SectionBody::Unknown(u) => assert_eq!(u.raw.as_deref(), Some(&[0xaa, 0xbb, 0xcc, 0xdd][..])),
        _ => panic!("expected Unknown"),
    }
}

/// `fseek_first` lands exactly at the first post-header section.
#[test]
fn fseek_first_skips_the_fixed_header() {
    let mut siblings = vec![fixed_header(MUD_FMT_GEN_ID), eof()];
    let mut out = Cursor::new(Vec::new());
    mud_io::write_file(&mut out, &mut siblings).unwrap();

    let mut reader = Cursor::new(out.into_inner());
    mudfile::nav::fseek_first(&mut reader).unwrap();
    let core = mudfile::nav::peek_core(&mut reader).unwrap();
    assert_eq!(core.sec_id, MUD_SEC_EOF_ID);
}

/// The streaming `GroupWriter` protocol produces the same bytes as
/// building the tree up-front and calling `write_file`.
#[test]
fn streaming_group_writer_matches_batch_write() {
    use mudfile::io::GroupWriter;

    let mut c1 = Section::new(MUD_SEC_CMT_ID, 1);
    if let SectionBody::Comment(c) = &mut c1.body {
        c.title = "alpha".into();
    }
    let mut c2 = Section::new(MUD_SEC_CMT_ID, 2);
    if let SectionBody::Comment(c) = &mut c2.body {
        c.title = "beta".into();
    }

    let mut streamed = Cursor::new(Vec::new());
    let mut writer = GroupWriter::start(&mut streamed, MUD_SEC_GRP_ID, 0, 2).unwrap();
    writer.write_member(&mut streamed, &mut c1.clone()).unwrap();
    writer.write_member(&mut streamed, &mut c2.clone()).unwrap();
    writer.end(&mut streamed).unwrap();

    let mut group_section = Section::new(MUD_SEC_GRP_ID, 0);
    {
        let group = group_section.as_group_mut().unwrap();
        tree::add_to_group(group, c1);
        tree::add_to_group(group, c2);
    }
    tree::set_sizes(&mut group_section);
    let mut batch = Cursor::new(Vec::new());
    mud_io::write_section(&mut batch, &mut group_section).unwrap();

    assert_eq!(streamed.into_inner(), batch.into_inner());
}
