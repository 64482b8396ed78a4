// lattice.rs - Sites and walks on the hypercubic lattice Z^d

use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, SawError};
use crate::symmetry::MAX_DIM;

/// Fixed-size copy of a site, zero-padded past `dim`. Used as a hash key by the
/// collision searches so that sites can be recorded without borrowing a buffer.
pub(crate) type SiteKey = [i32; MAX_DIM];

#[inline(always)]
pub(crate) fn site_key(site: &[i32]) -> SiteKey {
    let mut key = [0; MAX_DIM];
    key[..site.len()].copy_from_slice(site);
    key
}

/// A walk on `Z^dim` stored as a flat, site-major coordinate buffer.
///
/// Site `i` occupies `coords[i*dim .. (i+1)*dim]`. A walk with `N` steps has
/// `N + 1` sites; its *length* is `N`. Every walk handed out by this crate is
/// self-avoiding and made of unit steps.
#[derive(Clone, PartialEq, Eq)]
pub struct Walk {
    dim: usize,
    coords: Vec<i32>,
}

impl Walk {
    /// Single-site walk at the origin (length 0).
    pub fn origin(dim: usize) -> Self {
        assert!((1..=MAX_DIM).contains(&dim), "walk dimension {dim} outside 1..={MAX_DIM}");
        Self { dim, coords: vec![0; dim] }
    }

    /// Straight rod of `n` steps along `+axis 0`, starting at the origin.
    pub fn rod(n: usize, dim: usize) -> Self {
        assert!((1..=MAX_DIM).contains(&dim), "walk dimension {dim} outside 1..={MAX_DIM}");
        let mut coords = vec![0; (n + 1) * dim];
        for (i, site) in coords.chunks_exact_mut(dim).enumerate() {
            site[0] = i as i32;
        }
        Self { dim, coords }
    }

    /// Build a walk from a site-major coordinate buffer, checking the step law
    /// and self-avoidance.
    pub fn from_sites(dim: usize, coords: Vec<i32>) -> Result<Self> {
        if !(1..=MAX_DIM).contains(&dim) {
            return Err(SawError::InvalidWalk(format!("dimension {dim} outside 1..={MAX_DIM}")));
        }
        if coords.is_empty() || coords.len() % dim != 0 {
            return Err(SawError::InvalidWalk(format!(
                "{} coordinates do not form whole sites in d={dim}",
                coords.len()
            )));
        }
        let walk = Self { dim, coords };
        if let Some(i) = walk.first_bad_step() {
            return Err(SawError::InvalidWalk(format!(
                "sites {} and {} are not lattice neighbours",
                i,
                i + 1
            )));
        }
        if !walk.is_self_avoiding() {
            return Err(SawError::InvalidWalk("walk visits a site twice".into()));
        }
        Ok(walk)
    }

    /// Build a walk from a list of sites; see [`Walk::from_sites`].
    pub fn from_points<S: AsRef<[i32]>>(points: &[S]) -> Result<Self> {
        let dim = points.first().map(|p| p.as_ref().len()).unwrap_or(0);
        let mut coords = Vec::with_capacity(points.len() * dim);
        for p in points {
            let p = p.as_ref();
            if p.len() != dim {
                return Err(SawError::InvalidWalk(format!(
                    "mixed site dimensions {} and {}",
                    dim,
                    p.len()
                )));
            }
            coords.extend_from_slice(p);
        }
        Self::from_sites(dim, coords)
    }

    /// Lattice dimension.
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of steps `N`.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.num_sites() - 1
    }

    /// True for the single-site walk.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sites `N + 1`.
    #[inline(always)]
    pub fn num_sites(&self) -> usize {
        self.coords.len() / self.dim
    }

    #[inline(always)]
    pub fn site(&self, i: usize) -> &[i32] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    #[inline(always)]
    pub(crate) fn site_mut(&mut self, i: usize) -> &mut [i32] {
        &mut self.coords[i * self.dim..(i + 1) * self.dim]
    }

    #[inline(always)]
    pub fn first(&self) -> &[i32] {
        self.site(0)
    }

    #[inline(always)]
    pub fn last(&self) -> &[i32] {
        self.site(self.len())
    }

    /// Iterate over sites in walk order.
    pub fn sites(&self) -> impl ExactSizeIterator<Item = &[i32]> + DoubleEndedIterator + '_ {
        self.coords.chunks_exact(self.dim)
    }

    /// Raw site-major coordinates.
    pub fn coords(&self) -> &[i32] {
        &self.coords
    }

    /// Translate the walk so that its first site is the origin.
    pub fn shift_to_origin(&mut self) {
        let offset = self.first().to_vec();
        self.translate_by(&offset, -1);
    }

    /// Add `sign * offset` to every site.
    pub fn translate_by(&mut self, offset: &[i32], sign: i32) {
        assert_eq!(offset.len(), self.dim, "offset dimension mismatch");
        for site in self.coords.chunks_exact_mut(self.dim) {
            for (x, o) in site.iter_mut().zip(offset) {
                *x += sign * o;
            }
        }
    }

    /// Check that no site is visited twice.
    pub fn is_self_avoiding(&self) -> bool {
        let mut seen: HashSet<&[i32]> = HashSet::with_capacity(self.num_sites());
        self.sites().all(|s| seen.insert(s))
    }

    /// Check that every step changes exactly one coordinate by ±1.
    pub fn has_unit_steps(&self) -> bool {
        self.first_bad_step().is_none()
    }

    fn first_bad_step(&self) -> Option<usize> {
        (0..self.len()).find(|&i| !is_unit_step(self.site(i), self.site(i + 1)))
    }

    /// Append a site without checks. Used by the base-case generator, which
    /// guarantees the invariants itself.
    pub(crate) fn push_site(&mut self, site: &[i32]) {
        debug_assert_eq!(site.len(), self.dim);
        self.coords.extend_from_slice(site);
    }

    pub(crate) fn from_raw(dim: usize, coords: Vec<i32>) -> Self {
        debug_assert!((1..=MAX_DIM).contains(&dim) && coords.len() % dim == 0 && !coords.is_empty());
        Self { dim, coords }
    }
}

impl fmt::Debug for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("dim", &self.dim)
            .field("sites", &self.sites().collect::<Vec<_>>())
            .finish()
    }
}

/// True if `a` and `b` differ by a single unit step along one axis.
#[inline]
pub fn is_unit_step(a: &[i32], b: &[i32]) -> bool {
    let mut moved = 0;
    for (x, y) in a.iter().zip(b) {
        match (x - y).abs() {
            0 => {}
            1 => moved += 1,
            _ => return false,
        }
    }
    moved == 1
}

/// All `2*dim` unit steps: `-e_0 .. -e_{d-1}`, then `+e_{d-1} .. +e_0`.
pub fn unit_steps(dim: usize) -> Vec<Vec<i32>> {
    let mut steps = Vec::with_capacity(2 * dim);
    for axis in 0..dim {
        let mut s = vec![0; dim];
        s[axis] = -1;
        steps.push(s);
    }
    for axis in (0..dim).rev() {
        let mut s = vec![0; dim];
        s[axis] = 1;
        steps.push(s);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rod_has_expected_shape() {
        let w = Walk::rod(5, 3);
        assert_eq!(w.len(), 5);
        assert_eq!(w.num_sites(), 6);
        assert_eq!(w.last(), &[5, 0, 0]);
        assert!(w.is_self_avoiding());
        assert!(w.has_unit_steps());
    }

    #[test]
    fn from_points_rejects_revisits_and_jumps() {
        let back = Walk::from_points(&[[0, 0], [1, 0], [0, 0]]);
        assert!(matches!(back, Err(SawError::InvalidWalk(_))));

        let jump = Walk::from_points(&[[0, 0], [2, 0]]);
        assert!(matches!(jump, Err(SawError::InvalidWalk(_))));

        let diagonal = Walk::from_points(&[[0, 0], [1, 1]]);
        assert!(matches!(diagonal, Err(SawError::InvalidWalk(_))));
    }

    #[test]
    fn shift_to_origin_translates_every_site() {
        let mut w = Walk::from_points(&[[3, -2], [3, -1], [4, -1]]).unwrap();
        w.shift_to_origin();
        assert_eq!(w.coords(), &[0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn site_keys_pad_with_zeros() {
        assert_eq!(site_key(&[3, -1]), [3, -1, 0, 0, 0, 0]);
        assert_ne!(site_key(&[1, 0]), site_key(&[0, 1]));
    }

    #[test]
    fn oversized_dimension_is_rejected() {
        let coords = vec![0; MAX_DIM + 1];
        assert!(matches!(Walk::from_sites(MAX_DIM + 1, coords), Err(SawError::InvalidWalk(_))));
    }

    #[test]
    fn unit_steps_cover_both_directions() {
        let steps = unit_steps(2);
        assert_eq!(steps, vec![vec![-1, 0], vec![0, -1], vec![0, 1], vec![1, 0]]);
    }
}
