// merge.rs - Joining two walks end-to-start

use std::collections::HashSet;

use crate::lattice::{site_key, SiteKey, Walk};

fn junction_offset(left: &Walk, right: &Walk) -> Vec<i32> {
    assert_eq!(
        left.dim(),
        right.dim(),
        "cannot join a d={} walk to a d={} walk",
        left.dim(),
        right.dim()
    );
    left.last().iter().zip(right.first()).map(|(a, b)| a - b).collect()
}

/// Concatenate `left` and `right`, translating `right` so that its first site
/// lands on the last site of `left`. The junction appears once, so the result
/// has `left.len() + right.len()` steps.
///
/// The result is only self-avoiding if [`cross_valid`] holds for the pair.
pub fn merge(left: &Walk, right: &Walk) -> Walk {
    let offset = junction_offset(left, right);
    let dim = left.dim();
    let mut coords = Vec::with_capacity(left.coords().len() + right.len() * dim);
    coords.extend_from_slice(left.coords());
    for site in right.sites().skip(1) {
        coords.extend(site.iter().zip(&offset).map(|(x, o)| x + o));
    }
    Walk::from_raw(dim, coords)
}

/// True if `left` and `right` (translated as in [`merge`]) share no site other
/// than the junction.
///
/// Both walks must already be self-avoiding. The search starts at the junction
/// and moves outward along both walks at once, stopping at the first shared site.
pub fn cross_valid(left: &Walk, right: &Walk) -> bool {
    let offset = junction_offset(left, right);
    let n_left = left.num_sites();
    let n_right = right.len(); // right sites after the junction

    let mut seen: HashSet<SiteKey> = HashSet::new();
    for k in 0..n_left.max(n_right) {
        if k < n_left && !seen.insert(site_key(left.site(n_left - 1 - k))) {
            return false;
        }
        if k < n_right {
            let mut shifted = site_key(right.site(k + 1));
            for (s, o) in shifted.iter_mut().zip(&offset) {
                *s += o;
            }
            if !seen.insert(shifted) {
                return false;
            }
        }
    }
    true
}
