//! Spatial index for nearest-neighbor queries over identified points.
//!
//! The index is built once from a reference set and queried many times; it
//! is never mutated after construction, so concurrent reads need no locking.
//!
//! Positions are embedded on the unit sphere ([`crate::geodesic::unit_vector`])
//! and stored in a k-d tree queried with squared Euclidean distance. Chordal
//! ordering matches great-circle ordering, so the tree answers geodesic
//! nearest-neighbor queries with cheap Euclidean comparisons; callers
//! recompute the reported distance with the true geodesic formula.

use std::collections::HashMap;

use kiddo::{ImmutableKdTree, SquaredEuclidean};

use crate::geodesic::unit_vector;

/// Error type for spatial index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Two reference points share an identifier.
    #[error("duplicate identifier {0} in reference set")]
    DuplicateIdentifier(i64),
    /// No indexed point satisfies the query (empty set, or the set reduced
    /// to nothing after self-exclusion).
    #[error("no indexed point satisfies the query")]
    EmptyIndex,
    /// An identifier was looked up that the index never contained.
    #[error("identifier {0} is not in the index")]
    UnknownIdentifier(i64),
}

/// An identified position in a reference set.
///
/// Identifier uniqueness within one reference set is required; the index
/// re-validates it at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub identifier: i64,
    /// Degrees north, -90 to 90.
    pub latitude: f64,
    /// Degrees east, -180 to 180.
    pub longitude: f64,
}

/// Immutable nearest-neighbor index over a reference set.
///
/// Owns its points (arena plus identifier table); queries return
/// identifiers, and [`SpatialIndex::coordinates_of`] resolves them back to
/// coordinates in O(1).
pub struct SpatialIndex {
    /// `None` iff the reference set is empty.
    tree: Option<ImmutableKdTree<f64, 3>>,
    points: Vec<Point>,
    by_id: HashMap<i64, usize>,
}

impl SpatialIndex {
    /// Build an index from a reference set.
    ///
    /// An empty set is legal and produces an index that fails every query
    /// with [`IndexError::EmptyIndex`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateIdentifier`] if two points share an
    /// identifier.
    pub fn build(points: Vec<Point>) -> Result<Self, IndexError> {
        let mut by_id = HashMap::with_capacity(points.len());
        for (position, point) in points.iter().enumerate() {
            if by_id.insert(point.identifier, position).is_some() {
                return Err(IndexError::DuplicateIdentifier(point.identifier));
            }
        }

        let tree = if points.is_empty() {
            None
        } else {
            let entries: Vec<[f64; 3]> = points
                .iter()
                .map(|p| unit_vector(p.latitude, p.longitude))
                .collect();
            Some(ImmutableKdTree::new_from_slice(&entries))
        };

        tracing::debug!(count = points.len(), "built spatial index");

        Ok(Self {
            tree,
            points,
            by_id,
        })
    }

    /// Find the identifier of the indexed point closest to a query position.
    ///
    /// When `exclude` is set, any point with that identifier is skipped.
    /// Exclusion is by identifier, not coordinate equality, so a query point
    /// that is itself a member of the index still finds its true nearest
    /// neighbor, including a distinct point at the exact same coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::EmptyIndex`] if no candidate remains after
    /// exclusion.
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        exclude: Option<i64>,
    ) -> Result<i64, IndexError> {
        let tree = self.tree.as_ref().ok_or(IndexError::EmptyIndex)?;

        let query = unit_vector(latitude, longitude);
        // Identifiers are unique, so at most one candidate can be excluded:
        // two is always enough to guarantee an answer.
        let wanted = if exclude.is_some() { 2 } else { 1 };
        let wanted = std::num::NonZero::new(wanted).expect("wanted is 1 or 2");

        tree.nearest_n::<SquaredEuclidean>(&query, wanted)
            .into_iter()
            .map(|n| self.points[n.item as usize].identifier)
            .find(|&identifier| Some(identifier) != exclude)
            .ok_or(IndexError::EmptyIndex)
    }

    /// Coordinates of a previously indexed point, O(1).
    ///
    /// Returns `None` if the identifier was never indexed.
    pub fn coordinates_of(&self, identifier: i64) -> Option<(f64, f64)> {
        let point = self.points.get(*self.by_id.get(&identifier)?)?;
        Some((point.latitude, point.longitude))
    }

    /// Returns the number of points in the index.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
