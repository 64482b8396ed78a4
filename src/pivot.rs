// pivot.rs - Pivot moves with an outward, early-exit collision search
//
// The shorter side of the walk (relative to the pivot) is rotated; the other
// side stays put. Sites are hashed in lockstep moving away from the pivot, one
// rotated site then one fixed site per round, so that the typical rejected
// pivot, which collides close to the pivot, is found after a handful of probes.

use std::collections::HashSet;

use rand::Rng;

use crate::lattice::{site_key, SiteKey, Walk};
use crate::symmetry::{SymmetryGroup, SymmetryTransform, MAX_DIM};

/// Returned by `attempt_pivot`, lets drivers track acceptance rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotOutcome {
    pub accepted: bool,
    pub intersections: usize, // 0 iff accepted
}

/// Try to pivot `walk` about site `j` with `transform`.
///
/// On success the walk is rewritten in place; on failure it is left exactly as
/// it was. Panics if `j` is not a site index or the transform's dimension does
/// not match the walk.
pub fn attempt_pivot(walk: &mut Walk, j: usize, transform: &SymmetryTransform) -> PivotOutcome {
    let dim = walk.dim();
    let n_sites = walk.num_sites();
    assert_eq!(
        transform.dim(),
        dim,
        "pivot transform is {}-dimensional but the walk lives in d={}",
        transform.dim(),
        dim
    );
    assert!(j < n_sites, "pivot index {j} out of range for a walk with {n_sites} sites");

    let rotate_lower = 2 * j < n_sites;
    let n_rot = if rotate_lower { j } else { n_sites - 1 - j };
    let n_fix = n_sites - 1 - n_rot;
    // k-th site away from the pivot on either side
    let rotated_index = |k: usize| if rotate_lower { j - 1 - k } else { j + 1 + k };
    let fixed_index = |k: usize| if rotate_lower { j + 1 + k } else { j - 1 - k };

    // Rotated sites, stored in outward order. Both the buffer and the set grow
    // with the scan, so a collision k sites out costs O(k) whatever the length.
    let mut rotated: Vec<i32> = Vec::new();
    let mut seen: HashSet<SiteKey> = HashSet::new();
    let pivot = walk.site(j);
    seen.insert(site_key(pivot));

    let mut site = [0i32; MAX_DIM];
    for k in 0..n_rot.max(n_fix) {
        if k < n_rot {
            transform.apply_about(pivot, walk.site(rotated_index(k)), &mut site[..dim]);
            if !seen.insert(site) {
                return PivotOutcome { accepted: false, intersections: 1 };
            }
            rotated.extend_from_slice(&site[..dim]);
        }
        if k < n_fix && !seen.insert(site_key(walk.site(fixed_index(k)))) {
            return PivotOutcome { accepted: false, intersections: 1 };
        }
    }

    for (k, site) in rotated.chunks_exact(dim).enumerate() {
        walk.site_mut(rotated_index(k)).copy_from_slice(site);
    }
    PivotOutcome { accepted: true, intersections: 0 }
}

/// One pivot attempt at a uniform site with a uniform non-identity symmetry.
pub fn random_pivot<R: Rng + ?Sized>(
    walk: &mut Walk,
    group: &SymmetryGroup,
    rng: &mut R,
) -> PivotOutcome {
    let j = rng.gen_range(0..walk.num_sites());
    let transform = group.sample(rng);
    attempt_pivot(walk, j, transform)
}
