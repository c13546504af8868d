use super::vertex::VertexId;

/// An undirected edge, identified by its two end vertices.
///
/// The pair is stored sorted so that `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: VertexId,
    hi: VertexId,
}

impl EdgeKey {
    /// Creates the key for the edge between `a` and `b`.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Returns both end vertices, smaller key first.
    #[must_use]
    pub fn vertices(&self) -> (VertexId, VertexId) {
        (self.lo, self.hi)
    }
}
