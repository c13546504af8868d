use std::collections::{BTreeSet, VecDeque};

use rand::Rng;
use tracing::{debug, trace};

use super::{FaceGroup, SimilarityPolicy, DEFAULT_MAX_FACES_PER_GROUP};
use crate::operations::query::MeshAdjacency;

/// Partitions an eligible face set into connected, orientation-similar groups.
///
/// Faces are scanned in ascending index order; the first face not yet claimed
/// seeds a new group, which grows breadth-first over the adjacency graph. A
/// neighbor joins only if the [`SimilarityPolicy`] holds against the seed's
/// normal. Growth stops at the size cap or when no admissible neighbor is
/// left. Rejected neighbors stay available as later seeds.
pub struct RegionGrower<'a> {
    adjacency: &'a MeshAdjacency,
    max_faces: usize,
    policy: SimilarityPolicy,
    traverse_rings: Option<(usize, usize)>,
}

impl<'a> RegionGrower<'a> {
    /// Creates a grower over `adjacency`. A `max_faces` below 1 is clamped to 1.
    #[must_use]
    pub fn new(adjacency: &'a MeshAdjacency, max_faces: usize) -> Self {
        Self {
            adjacency,
            max_faces: max_faces.max(1),
            policy: SimilarityPolicy::default(),
            traverse_rings: None,
        }
    }

    /// Creates a grower with the default group size cap.
    #[must_use]
    pub fn with_defaults(adjacency: &'a MeshAdjacency) -> Self {
        Self::new(adjacency, DEFAULT_MAX_FACES_PER_GROUP)
    }

    /// Sets the normal-similarity policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SimilarityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Limits each group to a random number of adjacency rings around its
    /// seed, drawn uniformly from `[min, max]` per group.
    #[must_use]
    pub fn with_traverse_rings(mut self, rings: Option<(usize, usize)>) -> Self {
        self.traverse_rings = rings.map(|(a, b)| (a.min(b), a.max(b)));
        self
    }

    /// Grows groups covering every eligible, non-degenerate face exactly once.
    ///
    /// Indices in `eligible` beyond the adjacency's face count are ignored.
    /// The RNG is only consulted when a ring limit is configured.
    pub fn grow<R: Rng + ?Sized>(&self, eligible: &BTreeSet<usize>, rng: &mut R) -> Vec<FaceGroup> {
        let face_count = self.adjacency.face_count();
        let mut visited = vec![true; face_count];
        for &face in eligible.range(..face_count) {
            visited[face] = self.adjacency.is_degenerate(face);
        }

        let mut groups = Vec::new();
        for seed in 0..face_count {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            let group = self.grow_from(seed, &mut visited, rng);
            trace!(seed, faces = group.len(), "grew face group");
            groups.push(group);
        }

        debug!(
            groups = groups.len(),
            eligible = eligible.len(),
            policy = ?self.policy,
            "partitioned eligible faces"
        );
        groups
    }

    fn grow_from<R: Rng + ?Sized>(
        &self,
        seed: usize,
        visited: &mut [bool],
        rng: &mut R,
    ) -> FaceGroup {
        let seed_normal = self.adjacency.normal(seed);
        let ring_limit = self
            .traverse_rings
            .map(|(min, max)| rng.random_range(min..=max));

        let mut group = FaceGroup::new(seed, self.adjacency.area(seed));
        let mut frontier = VecDeque::from([(seed, 0_usize)]);

        'grow: while let Some((face, depth)) = frontier.pop_front() {
            if ring_limit.is_some_and(|limit| depth >= limit) {
                continue;
            }
            for &candidate in self.adjacency.neighbors(face) {
                if group.len() >= self.max_faces {
                    break 'grow;
                }
                if visited[candidate]
                    || !self
                        .policy
                        .admits(&seed_normal, &self.adjacency.normal(candidate))
                {
                    continue;
                }
                visited[candidate] = true;
                group.push(candidate, self.adjacency.area(candidate));
                frontier.push_back((candidate, depth + 1));
            }
        }

        group
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::mesh::Mesh;
    use crate::test_meshes::{cube, grid, hinge, unit_quad};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_faces(mesh: &Mesh) -> BTreeSet<usize> {
        (0..mesh.face_count()).collect()
    }

    /// A grid whose vertices get random heights, so normals vary.
    fn bumpy_grid(n: usize, seed: u64) -> Mesh {
        let mut mesh = grid(n, n);
        let mut rng = StdRng::seed_from_u64(seed);
        for p in &mut mesh.positions {
            *p = Point3::new(p.x, p.y, rng.random_range(-0.8..0.8));
        }
        mesh
    }

    fn assert_partition(groups: &[FaceGroup], eligible: &BTreeSet<usize>) {
        let mut seen = BTreeSet::new();
        for group in groups {
            for &face in group.faces() {
                assert!(seen.insert(face), "face {face} in two groups");
            }
        }
        assert_eq!(&seen, eligible);
    }

    fn assert_connected(group: &FaceGroup, adjacency: &MeshAdjacency) {
        let mut reached = BTreeSet::from([group.seed()]);
        let mut stack = vec![group.seed()];
        while let Some(face) = stack.pop() {
            for &n in adjacency.neighbors(face) {
                if group.contains(n) && reached.insert(n) {
                    stack.push(n);
                }
            }
        }
        assert_eq!(reached.len(), group.len(), "group {group:?} is not connected");
    }

    #[test]
    fn single_quad_is_one_group() {
        let mesh = unit_quad();
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::with_defaults(&adj)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(0));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].faces(), &[0]);
    }

    #[test]
    fn coplanar_grid_forms_one_group() {
        let mesh = grid(3, 3);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::new(&adj, 20)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(7));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 9);
        assert_eq!(groups[0].seed(), 0);
        assert!((groups[0].total_area() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn max_one_gives_singletons() {
        let mesh = grid(3, 3);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::new(&adj, 1)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(7));
        assert_eq!(groups.len(), 9);
        for (i, group) in groups.iter().enumerate() {
            assert_eq!(group.faces(), &[i]);
        }
    }

    #[test]
    fn zero_max_is_clamped_to_one() {
        let mesh = grid(2, 2);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::new(&adj, 0)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(1));
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn size_cap_splits_grid_in_bfs_order() {
        let mesh = grid(3, 3);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::new(&adj, 4)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(1));
        assert_eq!(groups[0].faces(), &[0, 1, 3, 2]);
        for group in &groups {
            assert!(group.len() <= 4);
            assert_connected(group, &adj);
        }
        assert_partition(&groups, &all_faces(&mesh));
    }

    #[test]
    fn perpendicular_cube_faces_stay_apart() {
        let mesh = cube();
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::with_defaults(&adj)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(3));
        assert_eq!(groups.len(), 6);
    }

    #[test]
    fn hinge_policy_decides_grouping() {
        let mesh = hinge(std::f64::consts::FRAC_PI_3);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let eligible = all_faces(&mesh);
        let mut rng = StdRng::seed_from_u64(3);

        let positive = RegionGrower::with_defaults(&adj).grow(&eligible, &mut rng);
        assert_eq!(positive.len(), 1);

        let parallel = RegionGrower::with_defaults(&adj)
            .with_policy(SimilarityPolicy::Parallel)
            .grow(&eligible, &mut rng);
        assert_eq!(parallel.len(), 2);
    }

    #[test]
    fn gating_compares_against_seed_not_last_face() {
        // Three quads each folded 60 degrees from the previous one: face 1 is
        // within 90 degrees of both neighbors, but face 2 is 120 degrees from
        // the seed.
        let (s, c) = std::f64::consts::FRAC_PI_3.sin_cos();
        let (s2, c2) = (2.0 * std::f64::consts::FRAC_PI_3).sin_cos();
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0 + c, 0.0, s),
                Point3::new(1.0 + c, 1.0, s),
                Point3::new(1.0 + c + c2, 0.0, s + s2),
                Point3::new(1.0 + c + c2, 1.0, s + s2),
            ],
            vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2], vec![4, 6, 7, 5]],
        );
        let adj = MeshAdjacency::build(&mesh).unwrap();
        assert!(adj.normal(1).dot(&adj.normal(2)) > 0.0);
        assert!(adj.normal(0).dot(&adj.normal(2)) < 0.0);

        let groups = RegionGrower::with_defaults(&adj)
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(0));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].faces(), &[0, 1]);
        assert_eq!(groups[1].faces(), &[2]);
    }

    #[test]
    fn ineligible_faces_are_never_grouped() {
        let mesh = grid(3, 3);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        // checkerboard: eligible faces touch only at corners
        let eligible: BTreeSet<usize> = [0, 2, 4, 6, 8].into_iter().collect();
        let groups = RegionGrower::with_defaults(&adj)
            .grow(&eligible, &mut StdRng::seed_from_u64(0));
        assert_eq!(groups.len(), 5);
        assert_partition(&groups, &eligible);
    }

    #[test]
    fn ineligible_faces_split_a_group() {
        let mesh = grid(3, 1);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let eligible: BTreeSet<usize> = [0, 2].into_iter().collect();
        let groups = RegionGrower::with_defaults(&adj)
            .grow(&eligible, &mut StdRng::seed_from_u64(0));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn out_of_range_eligible_indices_are_ignored() {
        let mesh = unit_quad();
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let eligible: BTreeSet<usize> = [0, 5].into_iter().collect();
        let groups = RegionGrower::with_defaults(&adj)
            .grow(&eligible, &mut StdRng::seed_from_u64(0));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn ring_limit_bounds_growth() {
        let mesh = grid(5, 1);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let groups = RegionGrower::with_defaults(&adj)
            .with_traverse_rings(Some((1, 1)))
            .grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(0));
        // each seed takes exactly one ring: [0,1], [2,3], [4]
        let sizes: Vec<usize> = groups.iter().map(FaceGroup::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn random_meshes_satisfy_partition_properties() {
        for seed in 0..8 {
            let mesh = bumpy_grid(6, seed);
            let adj = MeshAdjacency::build(&mesh).unwrap();
            let eligible: BTreeSet<usize> = (0..mesh.face_count()).filter(|f| f % 7 != 3).collect();
            for policy in [SimilarityPolicy::Positive, SimilarityPolicy::Parallel] {
                for max in [1, 3, 20] {
                    let groups = RegionGrower::new(&adj, max)
                        .with_policy(policy)
                        .with_traverse_rings(if seed % 2 == 0 { None } else { Some((1, 3)) })
                        .grow(&eligible, &mut StdRng::seed_from_u64(seed));
                    assert_partition(&groups, &eligible);
                    for group in &groups {
                        assert!(group.len() <= max);
                        assert_connected(group, &adj);
                        let seed_normal = adj.normal(group.seed());
                        for &face in &group.faces()[1..] {
                            assert!(policy.admits(&seed_normal, &adj.normal(face)));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_gives_same_partition() {
        let mesh = bumpy_grid(5, 11);
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let grower = RegionGrower::new(&adj, 5).with_traverse_rings(Some((1, 3)));
        let a = grower.grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(42));
        let b = grower.grow(&all_faces(&mesh), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
