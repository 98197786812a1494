use std::fmt;

/// The identifier of a resource. Ids are assigned monotonically by a `ResourceManager`
/// and never reused during its lifetime, so a stale id could never alias a
/// resource that was added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    #[inline]
    pub(crate) fn new(index: u64) -> Self {
        ResourceId(index)
    }

    /// Returns the raw integer value.
    #[inline]
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Resource ({})", self.0)
    }
}

impl From<ResourceId> for u64 {
    fn from(id: ResourceId) -> u64 {
        id.0
    }
}
