use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::utils::FastHashMap;

use super::id::ResourceId;

/// The life-cycle of a resource.
///
/// ```sh
/// Queued -> Loading -> PendingFinalize -> Active | Failed
///                  \                          |
///                   -> PendingDestroy         -> (file changed) -> Queued
/// ```
///
/// A destroyed resource is simply removed from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// A load job has been pushed and is waiting for a worker.
    Queued,
    /// The load callback is running on a worker.
    Loading,
    /// The load callback returned, waiting for `poll` to finalize it.
    PendingFinalize,
    /// The latest load attempt succeeded.
    Active,
    /// The latest load attempt failed.
    Failed,
    /// Removed while loading, waiting for `poll` to destroy it.
    PendingDestroy,
}

impl ResourceState {
    /// Returns true if the resource still requires a job or a `poll`.
    #[inline]
    pub fn is_pending(self) -> bool {
        match self {
            ResourceState::Active | ResourceState::Failed => false,
            _ => true,
        }
    }

    /// Returns true if the file watcher should track this resource.
    #[inline]
    pub fn is_watched(self) -> bool {
        self == ResourceState::Active || self == ResourceState::Failed
    }
}

#[derive(Debug, Clone)]
pub struct Record {
    pub name: Arc<Path>,
    pub state: ResourceState,
    pub result: i32,
    pub load_count: u32,
    pub modified: Option<SystemTime>,
}

/// The authoritative mapping from id to resource record, indexed by name too.
#[derive(Debug, Default)]
pub struct ResourceTable {
    records: FastHashMap<ResourceId, Record>,
    names: FastHashMap<PathBuf, ResourceId>,
    next: u64,
}

impl ResourceTable {
    pub fn new() -> Self {
        ResourceTable::default()
    }

    /// Returns the id of resource `name` and false if it exists already. Otherwise a
    /// `Queued` record is created, and its id is returned with true.
    pub fn insert(&mut self, name: &Path) -> (ResourceId, bool) {
        if let Some(&id) = self.names.get(name) {
            return (id, false);
        }

        let id = ResourceId::new(self.next);
        self.next += 1;

        let record = Record {
            name: Arc::from(name),
            state: ResourceState::Queued,
            result: 0,
            load_count: 0,
            modified: None,
        };

        self.records.insert(id, record);
        self.names.insert(name.to_owned(), id);
        (id, true)
    }

    #[inline]
    pub fn find(&self, name: &Path) -> Option<ResourceId> {
        self.names.get(name).cloned()
    }

    #[inline]
    pub fn get(&self, id: ResourceId) -> Option<&Record> {
        self.records.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    #[inline]
    pub fn state(&self, id: ResourceId) -> Option<ResourceState> {
        self.records.get(&id).map(|v| v.state)
    }

    pub fn remove(&mut self, id: ResourceId) -> Option<Record> {
        let record = self.records.remove(&id)?;
        self.names.remove(&*record.name);
        Some(record)
    }

    /// Returns the number of resources which still require a job or a `poll`.
    pub fn pending(&self) -> usize {
        self.records.values().filter(|v| v.state.is_pending()).count()
    }

    /// Returns the id, name and recorded modification time of watched resources.
    pub fn watched(&self) -> Vec<(ResourceId, Arc<Path>, Option<SystemTime>)> {
        self.records
            .iter()
            .filter(|(_, v)| v.state.is_watched())
            .map(|(&id, v)| (id, v.name.clone(), v.modified))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert() {
        let mut table = ResourceTable::new();
        let (a, created) = table.insert(Path::new("a.txt"));
        assert!(created);

        let (b, created) = table.insert(Path::new("a.txt"));
        assert!(!created);
        assert_eq!(a, b);

        let (c, created) = table.insert(Path::new("c.txt"));
        assert!(created);
        assert_ne!(a, c);

        assert_eq!(table.pending(), 2);
        assert_eq!(table.find(Path::new("a.txt")), Some(a));
        assert_eq!(table.find(Path::new("b.txt")), None);
        assert_eq!(table.state(a), Some(ResourceState::Queued));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut table = ResourceTable::new();
        let (a, _) = table.insert(Path::new("a.txt"));
        assert!(table.remove(a).is_some());
        assert!(table.remove(a).is_none());
        assert_eq!(table.find(Path::new("a.txt")), None);

        let (b, created) = table.insert(Path::new("a.txt"));
        assert!(created);
        assert!(b > a);
    }

    #[test]
    fn counters() {
        let mut table = ResourceTable::new();
        let (a, _) = table.insert(Path::new("a.txt"));
        let (b, _) = table.insert(Path::new("b.txt"));
        let (c, _) = table.insert(Path::new("c.txt"));

        table.get_mut(a).unwrap().state = ResourceState::PendingDestroy;
        table.get_mut(b).unwrap().state = ResourceState::PendingFinalize;
        table.get_mut(c).unwrap().state = ResourceState::Active;

        assert_eq!(table.pending(), 2);

        let watched = table.watched();
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].0, c);
        assert_eq!(&*watched[0].1, Path::new("c.txt"));
    }
}
