//! Tree construction and the `setSizes` bookkeeping pass.
//!
//! Sibling chains and group member lists are both `Vec<Section>` here
//! rather than the reference implementation's singly linked `pNext`/`pMem`
//! chains -- the natural Rust rendition of an owned, ordered sequence.
//! Dropping such a tree falls out of `Vec`'s own `Drop` (each element is
//! dropped in a loop, not via one recursive call per sibling), so no
//! explicit `free` walk is needed beyond `drop`; [`free_tree`] exists only
//! for API parity with the reference's `MUD_free`.

use crate::section::{Group, IndexEntry, Section};

/// Appends `section` to a sibling list (top-level or otherwise).
pub fn add(siblings: &mut Vec<Section>, section: Section) {
    siblings.push(section);
}

/// Appends `member` to `group`'s member list, and a placeholder index
/// entry for it; [`set_sizes`] must be called afterward to fix up offsets
/// and `memSize` throughout the tree.
pub fn add_to_group(group: &mut Group, member: Section) {
    let entry = IndexEntry {
        offset: 0,
        sec_id: member.core.sec_id,
        instance_id: member.core.instance_id,
    };
    group.members.push(member);
    group.index.push(entry);
    group.num = group.members.len() as u32;
}

/// Recomputes every offset and `memSize` in the subtree rooted at
/// `section`, bottom-up. Returns the `memSize` contribution `section`
/// itself makes to its parent, i.e. `0` for anything that isn't a group
/// (a plain section never "contains" bytes beyond its own body) and the
/// freshly recomputed `memSize` for a group.
///
/// Mirrors `MUD_setSizes`: nested groups are fixed up first (so their
/// `memSize` is correct before we measure them), then each member's
/// index entry is matched to it by `(secID, instanceID)` and its offset
/// set to the running total of `totalSize` over the preceding members.
pub fn set_sizes(section: &mut Section) -> u32 {
    let group = match section.as_group_mut() {
        Some(g) => g,
        None => return 0,
    };

    let mut running_offset = 0u32;
    let mut mem_size = 0u32;
    for member in group.members.iter_mut() {
        set_sizes(member);
        let total = member.total_size();

        let sec_id = member.core.sec_id;
        let instance_id = member.core.instance_id;
        if let Some(entry) = group
            .index
            .iter_mut()
            .find(|e| e.sec_id == sec_id && e.instance_id == instance_id)
        {
            entry.offset = running_offset;
        }

        running_offset += total;
        mem_size += total;
    }
    group.num = group.members.len() as u32;
    group.mem_size = mem_size;
    mem_size
}

/// Drops a tree. Provided for API-surface parity with `MUD_free`; in Rust
/// this is just `drop`, see the module docs for why no recursive walk is
/// needed.
pub fn free_tree(section: Section) {
    drop(section);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{MUD_SEC_CMT_ID, MUD_SEC_GRP_ID};
    use crate::section::SectionBody;

    fn comment(instance_id: u32) -> Section {
        Section::new(MUD_SEC_CMT_ID, instance_id)
    }

    #[test]
    fn set_sizes_computes_offsets_and_mem_size() {
        let mut group_section = Section::new(MUD_SEC_GRP_ID, 0);
        let group = group_section.as_group_mut().unwrap();
        add_to_group(group, comment(1));
        add_to_group(group, comment(2));

        set_sizes(&mut group_section);

        let SectionBody::Group(g) = &group_section.body else {
            panic!("expected group");
        };
        assert_eq!(g.num, 2);
        assert_eq!(g.index.len(), 2);
        assert_eq!(g.index[0].offset, 0);
        let first_total = g.members[0].total_size();
        assert_eq!(g.index[1].offset, first_total);
        assert_eq!(g.mem_size, first_total + g.members[1].total_size());
    }

    #[test]
    fn non_group_contributes_zero() {
        let mut c = comment(1);
        assert_eq!(set_sizes(&mut c), 0);
    }
}
