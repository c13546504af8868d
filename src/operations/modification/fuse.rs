use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::error::{OperationError, Result};
use crate::topology::{EdgeKey, FaceId, MeshStore, VertexId};

/// Merges a set of faces into as few polygons as possible by deleting every
/// edge whose two incident faces both belong to the set.
///
/// Fusing edges are collected up front, then each is re-validated right before
/// deletion: an earlier deletion may already have removed it (spike cleanup)
/// or made both of its sides the same face. Such edges are skipped. A deletion
/// that would leave a self-touching loop (a group wrapped around a face that
/// is not in it) is retried after the other deletions and skipped if it still
/// pinches, so every surviving face stays a simple polygon.
pub struct FuseFaces {
    faces: Vec<FaceId>,
}

/// Outcome of a [`FuseFaces`] run.
#[derive(Debug, Clone, Default)]
pub struct FuseReport {
    /// Faces left after fusion, in the order of their first member. A fully
    /// fused group leaves exactly one face: the first input face.
    pub surviving: Vec<FaceId>,
    /// Input faces merged into each surviving face, parallel to `surviving`.
    pub members: Vec<Vec<FaceId>>,
    /// Edges that were deleted.
    pub deleted: Vec<EdgeKey>,
    /// Fusing edges that were stale by the time they were reached.
    pub skipped: Vec<EdgeKey>,
    /// Vertices removed because no face used them any more.
    pub removed_vertices: Vec<VertexId>,
}

impl FuseFaces {
    /// Creates a new `FuseFaces` operation. The first face has priority: it
    /// keeps its handle whenever it takes part in a merge.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }

    /// Executes the fusion, editing the store in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a face handle is stale.
    pub fn execute(&self, store: &mut MeshStore) -> Result<FuseReport> {
        let rank: HashMap<FaceId, usize> = self
            .faces
            .iter()
            .enumerate()
            .map(|(i, &f)| (f, i))
            .collect();
        let mut live: HashSet<FaceId> = self.faces.iter().copied().collect();
        let mut owner: HashMap<FaceId, FaceId> = self.faces.iter().map(|&f| (f, f)).collect();

        let mut candidates = Vec::new();
        let mut seen = HashSet::new();
        for &face in &self.faces {
            for key in store.face(face)?.edge_keys() {
                if seen.insert(key) && is_fusing(store, key, &live) {
                    candidates.push(key);
                }
            }
        }

        let mut report = FuseReport::default();
        let mut pending = candidates;
        loop {
            let mut deferred = Vec::new();
            let mut progress = false;
            for key in pending {
                if !is_fusing(store, key, &live) {
                    trace!(?key, "skipping stale fusing edge");
                    report.skipped.push(key);
                    continue;
                }
                let incident = store.edge_faces(key);
                let (f, g) = (incident[0], incident[1]);
                let (keep, absorb) = if rank[&f] <= rank[&g] { (f, g) } else { (g, f) };

                let Some(removed) = delete_edge(store, key, keep, absorb)? else {
                    deferred.push(key);
                    continue;
                };
                live.remove(&absorb);
                for face_owner in owner.values_mut() {
                    if *face_owner == absorb {
                        *face_owner = keep;
                    }
                }
                report.deleted.push(key);
                report.removed_vertices.extend(removed);
                progress = true;
            }
            // retry pinching edges once the rest of the group has merged
            if deferred.is_empty() || !progress {
                for key in &deferred {
                    trace!(?key, "skipping fusing edge that would pinch the loop");
                }
                report.skipped.extend(deferred);
                break;
            }
            pending = deferred;
        }

        report.surviving = self
            .faces
            .iter()
            .copied()
            .filter(|f| live.contains(f))
            .collect();
        report.members = report
            .surviving
            .iter()
            .map(|s| {
                self.faces
                    .iter()
                    .copied()
                    .filter(|f| owner.get(f) == Some(s))
                    .collect()
            })
            .collect();
        Ok(report)
    }
}

/// An edge is fusing if exactly two distinct live group faces share it.
fn is_fusing(store: &MeshStore, key: EdgeKey, live: &HashSet<FaceId>) -> bool {
    match store.edge_faces(key) {
        [f, g] => f != g && live.contains(f) && live.contains(g),
        _ => false,
    }
}

/// Deletes `key`, merging `absorb` into `keep`. Returns the vertices that
/// became unused and were removed, or `None` without editing anything if the
/// merged loop would touch itself or collapse below three vertices.
fn delete_edge(
    store: &mut MeshStore,
    key: EdgeKey,
    keep: FaceId,
    absorb: FaceId,
) -> Result<Option<Vec<VertexId>>> {
    let (a, b) = key.vertices();
    let keep_loop = store.face(keep)?.vertices.clone();
    let absorb_loop = store.face(absorb)?.vertices.clone();
    let merged = merge_loops(&keep_loop, &absorb_loop, a, b)?;
    if merged.len() < 3 || is_pinched(&merged) {
        return Ok(None);
    }

    let touched: HashSet<VertexId> = keep_loop.iter().chain(&absorb_loop).copied().collect();

    store.remove_face(absorb)?;
    store.set_face_vertices(keep, merged)?;

    let mut removed: Vec<VertexId> = touched
        .into_iter()
        .filter(|&v| store.is_orphan(v))
        .collect();
    removed.sort_unstable();
    for &v in &removed {
        store.remove_vertex(v)?;
    }
    Ok(Some(removed))
}

/// A loop is pinched when it visits some vertex more than once.
fn is_pinched(face_loop: &[VertexId]) -> bool {
    let mut seen = HashSet::with_capacity(face_loop.len());
    !face_loop.iter().all(|v| seen.insert(*v))
}

/// Joins two loops that share the edge `a-b` into one loop without that edge.
///
/// `keep` runs along the edge in one direction and `absorb` is expected to run
/// along it in the other; if both run the same way `absorb` is reversed first.
fn merge_loops(
    keep: &[VertexId],
    absorb: &[VertexId],
    a: VertexId,
    b: VertexId,
) -> Result<Vec<VertexId>> {
    let missing = || OperationError::Failed("fusing edge not found in face loop".into());

    let (u, v, i) = directed_position(keep, a, b).ok_or_else(missing)?;
    let mut absorb = absorb.to_vec();
    let j = match find_directed(&absorb, v, u) {
        Some(j) => j,
        None => {
            absorb.reverse();
            find_directed(&absorb, v, u).ok_or_else(missing)?
        }
    };

    // keep: u -> v at i. Walk from v all the way round to u.
    let n = keep.len();
    let mut merged: Vec<VertexId> = (1..=n).map(|k| keep[(i + k) % n]).collect();
    // absorb: v -> u at j. Walk from u round to v, skipping both endpoints.
    let m = absorb.len();
    merged.extend((2..m).map(|k| absorb[(j + k) % m]));

    Ok(remove_spikes(merged))
}

/// Finds the edge `a-b` in a loop in either direction. Returns the directed
/// pair as it appears and the index of its first vertex.
fn directed_position(
    face_loop: &[VertexId],
    a: VertexId,
    b: VertexId,
) -> Option<(VertexId, VertexId, usize)> {
    find_directed(face_loop, a, b)
        .map(|i| (a, b, i))
        .or_else(|| find_directed(face_loop, b, a).map(|i| (b, a, i)))
}

fn find_directed(face_loop: &[VertexId], from: VertexId, to: VertexId) -> Option<usize> {
    let n = face_loop.len();
    (0..n).find(|&i| face_loop[i] == from && face_loop[(i + 1) % n] == to)
}

/// Collapses back-and-forth runs (`x, u, v, u, y` -> `x, u, y`) and repeated
/// consecutive vertices left where two faces shared a chain of edges.
fn remove_spikes(mut face_loop: Vec<VertexId>) -> Vec<VertexId> {
    loop {
        let n = face_loop.len();
        if n < 3 {
            return face_loop;
        }
        if let Some(i) = (0..n).find(|&i| face_loop[i] == face_loop[(i + 1) % n]) {
            face_loop.remove(i);
            continue;
        }
        let Some(i) = (0..n).find(|&i| face_loop[(i + n - 1) % n] == face_loop[(i + 1) % n]) else {
            return face_loop;
        };
        // drop the spike tip and the repeated vertex after it
        let next = (i + 1) % n;
        let (first, second) = if i > next { (i, next) } else { (next, i) };
        face_loop.remove(first);
        face_loop.remove(second);
    }
}
