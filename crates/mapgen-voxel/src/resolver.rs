//! Deferred node-name resolution.
//!
//! Registration code hands out [`NodeSlot`]s and [`NodeListSlot`]s that start
//! empty and enqueues the wanted names on a [`NodeResolver`]. Once the content
//! table is closed for modification the resolver is flushed exactly once; the
//! flush consumes it, so a second flush does not typecheck.
//!
//! The resolver keeps only weak handles to the slots. Records that were
//! dropped before the flush are skipped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::content::{ContentId, ContentTable};

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// A single content id written by the resolver. Reads [`ContentId::IGNORE`]
/// until flushed.
#[derive(Clone)]
pub struct NodeSlot(Rc<Cell<ContentId>>);

impl NodeSlot {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(ContentId::IGNORE)))
    }

    /// A slot that already holds `id`, for records built without a resolver.
    pub fn resolved(id: ContentId) -> Self {
        Self(Rc::new(Cell::new(id)))
    }

    pub fn get(&self) -> ContentId {
        self.0.get()
    }

    fn downgrade(&self) -> Weak<Cell<ContentId>> {
        Rc::downgrade(&self.0)
    }
}

impl Default for NodeSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeSlot").field(&self.get()).finish()
    }
}

/// A growable list of content ids; each resolved name is appended.
#[derive(Clone, Default)]
pub struct NodeListSlot(Rc<RefCell<Vec<ContentId>>>);

impl NodeListSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the ids appended so far.
    pub fn to_vec(&self) -> Vec<ContentId> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, id: ContentId) -> bool {
        self.0.borrow().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn downgrade(&self) -> Weak<RefCell<Vec<ContentId>>> {
        Rc::downgrade(&self.0)
    }
}

impl fmt::Debug for NodeListSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeListSlot").field(&*self.0.borrow()).finish()
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A name that did not resolve to itself during a flush. Never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionIssue {
    /// `name` was missing; `fallback` was used instead.
    UsedFallback { name: String, fallback: String },
    /// Neither `name` nor `fallback` exist; the default id was written.
    UsedDefault {
        name: String,
        fallback: String,
        default: ContentId,
    },
    /// A list entry named a missing node and was left out.
    ListEntryMissing { name: String },
}

impl fmt::Display for ResolutionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsedFallback { name, fallback } => {
                write!(f, "node '{name}' not found, using fallback '{fallback}'")
            }
            Self::UsedDefault {
                name,
                fallback,
                default,
            } => write!(
                f,
                "node '{name}' not found and fallback '{fallback}' not found, using id {}",
                default.0
            ),
            Self::ListEntryMissing { name } => {
                write!(f, "node '{name}' not found, dropped from list")
            }
        }
    }
}

/// Summary of a flush.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Entries whose wanted name was found.
    pub resolved: usize,
    /// Entries that used their fallback name.
    pub fell_back: usize,
    /// Entries that got their default id, plus dropped list entries.
    pub defaulted: usize,
    /// Entries whose owning record was dropped before the flush.
    pub skipped: usize,
    pub issues: Vec<ResolutionIssue>,
}

impl ResolveReport {
    /// Total entries processed.
    pub fn total(&self) -> usize {
        self.resolved + self.fell_back + self.defaulted + self.skipped
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: ResolveReport) {
        self.resolved += other.resolved;
        self.fell_back += other.fell_back;
        self.defaulted += other.defaulted;
        self.skipped += other.skipped;
        self.issues.extend(other.issues);
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

enum Target {
    Single {
        fallback: String,
        default: ContentId,
        slot: Weak<Cell<ContentId>>,
    },
    List(Weak<RefCell<Vec<ContentId>>>),
}

struct PendingEntry {
    name: String,
    target: Target,
}

/// Queue of pending name lookups, flushed once against a [`ContentTable`].
#[derive(Default)]
pub struct NodeResolver {
    pending: Vec<PendingEntry>,
}

impl NodeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a scalar lookup: `name`, else `fallback`, else `default`.
    /// An empty `fallback` means "no fallback".
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        fallback: impl Into<String>,
        default: ContentId,
        slot: &NodeSlot,
    ) {
        self.pending.push(PendingEntry {
            name: name.into(),
            target: Target::Single {
                fallback: fallback.into(),
                default,
                slot: slot.downgrade(),
            },
        });
    }

    /// Enqueues a list lookup; a found id is appended to `list`.
    pub fn add_node_list(&mut self, name: impl Into<String>, list: &NodeListSlot) {
        self.pending.push(PendingEntry {
            name: name.into(),
            target: Target::List(list.downgrade()),
        });
    }

    /// Number of entries waiting for the flush.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Moves every pending entry of `other` to the end of this queue.
    pub fn append(&mut self, other: &mut NodeResolver) {
        self.pending.append(&mut other.pending);
    }

    /// Resolves every pending entry in registration order and consumes the
    /// resolver.
    pub fn flush(self, table: &dyn ContentTable) -> ResolveReport {
        let mut report = ResolveReport::default();

        for entry in self.pending {
            match entry.target {
                Target::Single {
                    fallback,
                    default,
                    slot,
                } => {
                    let Some(slot) = slot.upgrade() else {
                        report.skipped += 1;
                        continue;
                    };
                    if let Some(id) = table.lookup(&entry.name) {
                        slot.set(id);
                        report.resolved += 1;
                        continue;
                    }
                    let fallback_id = if fallback.is_empty() {
                        None
                    } else {
                        table.lookup(&fallback)
                    };
                    match fallback_id {
                        Some(id) => {
                            slot.set(id);
                            report.fell_back += 1;
                            if !entry.name.is_empty() {
                                let issue = ResolutionIssue::UsedFallback {
                                    name: entry.name,
                                    fallback,
                                };
                                tracing::warn!("{}", issue);
                                report.issues.push(issue);
                            }
                        }
                        None => {
                            slot.set(default);
                            report.defaulted += 1;
                            if !entry.name.is_empty() || !fallback.is_empty() {
                                let issue = ResolutionIssue::UsedDefault {
                                    name: entry.name,
                                    fallback,
                                    default,
                                };
                                tracing::warn!("{}", issue);
                                report.issues.push(issue);
                            }
                        }
                    }
                }
                Target::List(list) => {
                    let Some(list) = list.upgrade() else {
                        report.skipped += 1;
                        continue;
                    };
                    match table.lookup(&entry.name) {
                        Some(id) => {
                            list.borrow_mut().push(id);
                            report.resolved += 1;
                        }
                        None => {
                            report.defaulted += 1;
                            let issue = ResolutionIssue::ListEntryMissing { name: entry.name };
                            tracing::warn!("{}", issue);
                            report.issues.push(issue);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            "node resolver flushed: {} resolved, {} fallback, {} default, {} skipped",
            report.resolved,
            report.fell_back,
            report.defaulted,
            report.skipped
        );
        report
    }
}

impl fmt::Debug for NodeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeResolver")
            .field("pending", &self.pending.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NodeDefTable;

    fn table() -> NodeDefTable {
        let mut t = NodeDefTable::new();
        t.register_name("default:stone").unwrap();
        t.register_name("mapgen_dirt_with_grass").unwrap();
        t.register_name("default:dirt").unwrap();
        t
    }

    #[test]
    fn test_slot_starts_ignore() {
        assert_eq!(NodeSlot::new().get(), ContentId::IGNORE);
    }

    #[test]
    fn test_wanted_name_found() {
        let t = table();
        let slot = NodeSlot::new();
        let mut r = NodeResolver::new();
        r.add_node("default:stone", "mapgen_dirt_with_grass", ContentId::AIR, &slot);
        let report = r.flush(&t);
        assert_eq!(slot.get(), t.lookup("default:stone").unwrap());
        assert_eq!(report.resolved, 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_fallback_used_when_wanted_missing() {
        let t = table();
        let slot = NodeSlot::new();
        let mut r = NodeResolver::new();
        r.add_node("grass", "mapgen_dirt_with_grass", ContentId::AIR, &slot);
        let report = r.flush(&t);
        assert_eq!(slot.get(), t.lookup("mapgen_dirt_with_grass").unwrap());
        assert_eq!(report.fell_back, 1);
        assert_eq!(
            report.issues,
            vec![ResolutionIssue::UsedFallback {
                name: "grass".into(),
                fallback: "mapgen_dirt_with_grass".into(),
            }]
        );
    }

    #[test]
    fn test_default_used_when_both_missing() {
        let t = table();
        let slot = NodeSlot::new();
        let mut r = NodeResolver::new();
        r.add_node("grass", "mapgen_sand", ContentId(42), &slot);
        let report = r.flush(&t);
        assert_eq!(slot.get(), ContentId(42));
        assert_eq!(report.defaulted, 1);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_empty_fallback_is_not_looked_up() {
        let mut t = table();
        // A node literally named "" must not be picked as fallback.
        t.register_name("").unwrap();
        let slot = NodeSlot::new();
        let mut r = NodeResolver::new();
        r.add_node("missing", "", ContentId::AIR, &slot);
        r.flush(&t);
        assert_eq!(slot.get(), ContentId::AIR);
    }

    #[test]
    fn test_list_appends_in_registration_order_and_skips_missing() {
        let t = table();
        let list = NodeListSlot::new();
        let mut r = NodeResolver::new();
        r.add_node_list("default:dirt", &list);
        r.add_node_list("nope", &list);
        r.add_node_list("default:stone", &list);
        let report = r.flush(&t);
        assert_eq!(
            list.to_vec(),
            vec![t.lookup("default:dirt").unwrap(), t.lookup("default:stone").unwrap()]
        );
        assert_eq!(report.resolved, 2);
        assert_eq!(
            report.issues,
            vec![ResolutionIssue::ListEntryMissing { name: "nope".into() }]
        );
    }

    #[test]
    fn test_dropped_slot_is_skipped() {
        let t = table();
        let mut r = NodeResolver::new();
        {
            let slot = NodeSlot::new();
            r.add_node("default:stone", "", ContentId::AIR, &slot);
        }
        let report = r.flush(&t);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_append_preserves_order() {
        let t = table();
        let list = NodeListSlot::new();
        let mut a = NodeResolver::new();
        let mut b = NodeResolver::new();
        a.add_node_list("default:stone", &list);
        b.add_node_list("default:dirt", &list);
        a.append(&mut b);
        assert_eq!(b.pending_len(), 0);
        a.flush(&t);
        assert_eq!(
            list.to_vec(),
            vec![t.lookup("default:stone").unwrap(), t.lookup("default:dirt").unwrap()]
        );
    }
}
