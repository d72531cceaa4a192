//! Mutation observers keyed by purpose.
//!
//! Records are queued to an observer when they are taken from the tree, and
//! only observers connected at that moment receive them. Disconnecting drops
//! whatever was queued, so an observer that disconnects before patching never
//! sees its own writes.

use core_types::ObserverKind;
use dom::{HostTree, MutationRecord, NodeKey, TreeWalk};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub character_data: bool,
    pub subtree: bool,
    /// `None` means attribute changes are not observed; an empty filter
    /// observes every attribute.
    pub attributes: Option<Vec<&'static str>>,
}

impl ObserveOptions {
    pub fn child_list() -> Self {
        Self {
            child_list: true,
            ..Self::default()
        }
    }

    pub fn child_list_subtree() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Self::default()
        }
    }

    pub fn attributes(filter: &[&'static str]) -> Self {
        Self {
            attributes: Some(filter.to_vec()),
            ..Self::default()
        }
    }

    fn wants(&self, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::ChildList { .. } => self.child_list,
            MutationRecord::CharacterData { .. } => self.character_data,
            MutationRecord::Attributes { name, .. } => self
                .attributes
                .as_ref()
                .is_some_and(|filter| filter.is_empty() || filter.iter().any(|f| f == name)),
        }
    }
}

#[derive(Default)]
struct Registration {
    targets: Vec<(NodeKey, ObserveOptions)>,
    queue: Vec<MutationRecord>,
}

impl Registration {
    fn interested<T: TreeWalk>(&self, tree: &T, record: &MutationRecord) -> bool {
        let target = record.target();
        self.targets.iter().any(|(node, options)| {
            options.wants(record)
                && (target == *node || (options.subtree && tree.contains(*node, target)))
        })
    }
}

#[derive(Default)]
pub struct ObserverRegistry {
    observers: BTreeMap<ObserverKind, Registration>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `node`; repeated calls for the same kind add targets.
    pub fn observe<T: HostTree>(
        &mut self,
        tree: &mut T,
        kind: ObserverKind,
        node: NodeKey,
        options: ObserveOptions,
    ) {
        self.sync(tree);
        let registration = self.observers.entry(kind).or_default();
        if !registration.targets.iter().any(|(n, o)| *n == node && *o == options) {
            registration.targets.push((node, options));
        }
    }

    pub fn disconnect<T: HostTree>(&mut self, tree: &mut T, kind: ObserverKind) {
        self.sync(tree);
        if self.observers.remove(&kind).is_some() {
            log::trace!(target: "rebrand.watcher", "{kind:?} observer disconnected");
        }
    }

    /// Queue the tree's pending records to the observers connected now.
    pub fn sync<T: HostTree>(&mut self, tree: &mut T) {
        let records = tree.take_records();
        if records.is_empty() {
            return;
        }
        for registration in self.observers.values_mut() {
            for record in &records {
                if registration.interested(&*tree, record) {
                    registration.queue.push(record.clone());
                }
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.observers.values().any(|r| !r.queue.is_empty())
    }

    /// Drain every non-empty queue, in `ObserverKind` order.
    pub fn take_batches<T: HostTree>(&mut self, tree: &mut T) -> Vec<(ObserverKind, Vec<MutationRecord>)> {
        self.sync(tree);
        self.observers
            .iter_mut()
            .filter(|(_, r)| !r.queue.is_empty())
            .map(|(kind, r)| (*kind, std::mem::take(&mut r.queue)))
            .collect()
    }
}
