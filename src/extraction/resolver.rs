/*!
 * Conflict detection and canonical entry selection.
 *
 * Entries from every scanned file are grouped by `code` in first-seen order.
 * A group whose members disagree on their translatable content is reported
 * once; regardless of conflicts, the canonical entry is the first member,
 * promoted to the first later member that brings a description when the
 * current pick has none.
 */

use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::entry::Entry;

/// Entries sharing one code whose content disagrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The shared code
    pub code: String,
    /// Every member of the group, in first-seen order
    pub entries: Vec<Entry>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conflicting translations for key {:?}:", self.code)?;
        for entry in &self.entries {
            write!(f, "\n  - {}", entry)?;
        }
        Ok(())
    }
}

/// Outcome of resolving all scanned entries
#[derive(Debug, Default)]
pub struct Resolution {
    /// Chosen entry per code, ordered by code
    pub canonical: BTreeMap<String, Entry>,
    /// Groups with divergent content, in first-seen order of their code
    pub conflicts: Vec<Conflict>,
}

/// Group entries by code, report conflicts and pick canonical entries
pub fn resolve(entries: Vec<Entry>) -> Resolution {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Entry>> = HashMap::new();

    for entry in entries {
        match groups.get_mut(&entry.code) {
            Some(group) => group.push(entry),
            None => {
                order.push(entry.code.clone());
                groups.insert(entry.code.clone(), vec![entry]);
            }
        }
    }

    let mut resolution = Resolution::default();

    for code in order {
        let Some(group) = groups.remove(&code) else {
            continue;
        };

        if let Some(conflict) = find_conflict(&code, &group) {
            warn!("{}", conflict);
            resolution.conflicts.push(conflict);
        }

        if let Some(best) = select_canonical(group) {
            resolution.canonical.insert(code, best);
        }
    }

    resolution
}

/// Compare every member against the first; stop at the first mismatch
fn find_conflict(code: &str, group: &[Entry]) -> Option<Conflict> {
    let (first, rest) = group.split_first()?;
    if rest.iter().all(|entry| entry.content_eq(first)) {
        return None;
    }
    Some(Conflict {
        code: code.to_string(),
        entries: group.to_vec(),
    })
}

fn select_canonical(group: Vec<Entry>) -> Option<Entry> {
    let mut members = group.into_iter();
    let mut best = members.next()?;
    for entry in members {
        if best.description.is_empty() && !entry.description.is_empty() {
            best = entry;
        }
    }
    Some(best)
}
