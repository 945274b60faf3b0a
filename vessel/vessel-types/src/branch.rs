//! Branch type.

/// An ordered path of node indices.
///
/// A branch references nodes by index and never owns them. Its logical
/// endpoints are the first and last indices; in a corrected graph every
/// interior index has degree exactly 2. A well-formed branch has at
/// least one index.
///
/// # Example
///
/// ```
/// use vessel_types::Branch;
///
/// let mut branch = Branch::from_indices(vec![3, 1, 4]);
/// assert_eq!(branch.first(), Some(3));
/// assert_eq!(branch.last(), Some(4));
///
/// branch.reverse();
/// assert_eq!(branch.first(), Some(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branch {
    /// Node indices along the path, in order.
    pub nodes: Vec<u32>,
}

impl Branch {
    /// Creates an empty branch.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates a branch over the given node indices.
    #[must_use]
    pub fn from_indices(nodes: Vec<u32>) -> Self {
        Self { nodes }
    }

    /// Number of node references in the branch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the branch has no node references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node index, if any.
    #[must_use]
    pub fn first(&self) -> Option<u32> {
        self.nodes.first().copied()
    }

    /// Last node index, if any.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.nodes.last().copied()
    }

    /// Reverses the path in place.
    pub fn reverse(&mut self) {
        self.nodes.reverse();
    }

    /// Whether `index` is the first or last reference of this branch.
    #[must_use]
    pub fn has_endpoint(&self, index: u32) -> bool {
        self.first() == Some(index) || self.last() == Some(index)
    }
}
