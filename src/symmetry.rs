// symmetry.rs - Point symmetries of Z^d used as pivot transforms
//
// The hyperoctahedral group B_d: every signed permutation of the d axes.
// Enumerated exactly (d! permutations x 2^d sign vectors) and cached per
// dimension for the life of the process.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use nalgebra::DMatrix;
use rand::Rng;

use crate::error::{Result, SawError};

/// Largest supported lattice dimension. B_6 already has 46 080 elements.
pub const MAX_DIM: usize = 6;

/// A signed permutation matrix, stored compactly.
///
/// Row `i` has its single nonzero entry `sign[i]` in column `perm[i]`, so
/// `(S x)_i = sign[i] * x[perm[i]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymmetryTransform {
    perm: Vec<usize>,
    sign: Vec<i32>,
}

impl SymmetryTransform {
    /// Build from a permutation and a sign vector, validating both.
    pub fn new(perm: Vec<usize>, sign: Vec<i32>) -> Result<Self> {
        let dim = perm.len();
        if dim == 0 || dim > MAX_DIM || sign.len() != dim {
            return Err(SawError::InvalidTransform(format!(
                "permutation of length {} with {} signs",
                dim,
                sign.len()
            )));
        }
        let mut hit = vec![false; dim];
        for &p in &perm {
            if p >= dim || hit[p] {
                return Err(SawError::InvalidTransform(format!("{perm:?} is not a permutation")));
            }
            hit[p] = true;
        }
        if sign.iter().any(|&s| s != 1 && s != -1) {
            return Err(SawError::InvalidTransform(format!("signs {sign:?} must be ±1")));
        }
        Ok(Self { perm, sign })
    }

    /// Identity transform of dimension `dim`.
    pub fn identity(dim: usize) -> Self {
        assert!((1..=MAX_DIM).contains(&dim), "transform dimension {dim} outside 1..={MAX_DIM}");
        Self { perm: (0..dim).collect(), sign: vec![1; dim] }
    }

    /// Parse a dense integer matrix; every row and column must carry exactly
    /// one ±1.
    pub fn from_matrix(m: &DMatrix<i32>) -> Result<Self> {
        if m.nrows() != m.ncols() {
            return Err(SawError::InvalidTransform(format!(
                "{}x{} matrix is not square",
                m.nrows(),
                m.ncols()
            )));
        }
        let dim = m.nrows();
        let mut perm = Vec::with_capacity(dim);
        let mut sign = Vec::with_capacity(dim);
        for i in 0..dim {
            let nonzero: Vec<usize> = (0..dim).filter(|&j| m[(i, j)] != 0).collect();
            match nonzero.as_slice() {
                [j] => {
                    perm.push(*j);
                    sign.push(m[(i, *j)]);
                }
                _ => {
                    return Err(SawError::InvalidTransform(format!(
                        "row {i} has {} nonzero entries",
                        nonzero.len()
                    )))
                }
            }
        }
        Self::new(perm, sign)
    }

    /// Dense matrix form.
    pub fn matrix(&self) -> DMatrix<i32> {
        let dim = self.dim();
        DMatrix::from_fn(dim, dim, |i, j| if self.perm[i] == j { self.sign[i] } else { 0 })
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.perm.len()
    }

    pub fn is_identity(&self) -> bool {
        self.perm.iter().enumerate().all(|(i, &p)| i == p) && self.sign.iter().all(|&s| s == 1)
    }

    /// `out = S * (x - pivot) + pivot`.
    #[inline(always)]
    pub fn apply_about(&self, pivot: &[i32], x: &[i32], out: &mut [i32]) {
        for i in 0..self.perm.len() {
            let p = self.perm[i];
            out[i] = pivot[i] + self.sign[i] * (x[p] - pivot[p]);
        }
    }

    /// `S * x`.
    pub fn apply(&self, x: &[i32]) -> Vec<i32> {
        self.perm.iter().zip(&self.sign).map(|(&p, &s)| s * x[p]).collect()
    }
}

/// All non-identity elements of B_d in a fixed order.
#[derive(Debug)]
pub struct SymmetryGroup {
    dim: usize,
    transforms: Vec<SymmetryTransform>,
}

impl SymmetryGroup {
    /// Enumerate B_d \ {I}: permutations in lexicographic order, and for each
    /// permutation every sign vector (bit `i` set means row `i` is negated).
    fn enumerate(dim: usize) -> Self {
        let mut transforms = Vec::with_capacity(factorial(dim) * (1 << dim) - 1);
        let mut perm: Vec<usize> = (0..dim).collect();
        loop {
            for mask in 0u32..(1 << dim) {
                let sign = (0..dim).map(|i| if mask >> i & 1 == 1 { -1 } else { 1 }).collect();
                let t = SymmetryTransform { perm: perm.clone(), sign };
                if !t.is_identity() {
                    transforms.push(t);
                }
            }
            if !next_permutation(&mut perm) {
                break;
            }
        }
        Self { dim, transforms }
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymmetryTransform> {
        self.transforms.iter()
    }

    /// Uniform draw from the group.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &SymmetryTransform {
        &self.transforms[rng.gen_range(0..self.transforms.len())]
    }
}

static GROUPS: OnceLock<Mutex<HashMap<usize, &'static SymmetryGroup>>> = OnceLock::new();

/// The cached symmetry group for `dim`, built on first request.
pub fn transforms_for(dim: usize) -> Result<&'static SymmetryGroup> {
    check_dim(dim)?;
    let cache = GROUPS.get_or_init(|| Mutex::new(HashMap::new()));
    // A poisoned lock can only mean a panic mid-insert; the map itself is still consistent.
    let mut groups = cache.lock().unwrap_or_else(|e| e.into_inner());
    let group = groups.entry(dim).or_insert_with(|| {
        tracing::debug!(dim, "enumerating lattice symmetry group");
        let leaked: &'static SymmetryGroup = Box::leak(Box::new(SymmetryGroup::enumerate(dim)));
        leaked
    });
    Ok(*group)
}

/// Uniform random non-identity symmetry of `Z^dim`.
pub fn sample<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<SymmetryTransform> {
    Ok(transforms_for(dim)?.sample(rng).clone())
}

pub(crate) fn check_dim(dim: usize) -> Result<()> {
    match dim {
        0 => Err(SawError::InvalidDimension { dim }),
        d if d > MAX_DIM => Err(SawError::UnsupportedDimension { dim }),
        _ => Ok(()),
    }
}

fn factorial(n: usize) -> usize {
    (1..=n).product()
}

/// Advance `p` to the next lexicographic permutation; false once `p` was the last.
fn next_permutation(p: &mut [usize]) -> bool {
    if p.len() < 2 {
        return false;
    }
    let mut i = p.len() - 1;
    while i > 0 && p[i - 1] >= p[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = p.len() - 1;
    while p[j] <= p[i - 1] {
        j -= 1;
    }
    p.swap(i - 1, j);
    p[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_are_lexicographic() {
        let mut p = vec![0, 1, 2];
        let mut seen = vec![p.clone()];
        while next_permutation(&mut p) {
            seen.push(p.clone());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1], vec![0, 2, 1]);
        assert_eq!(seen[5], vec![2, 1, 0]);
    }

    #[test]
    fn one_dimensional_group_is_the_reflection() {
        let g = transforms_for(1).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g.iter().next().unwrap().apply(&[3]), vec![-3]);
    }

    #[test]
    fn apply_about_fixes_the_pivot() {
        let rot = SymmetryTransform::new(vec![1, 0], vec![-1, 1]).unwrap();
        let mut out = [0; 2];
        rot.apply_about(&[2, 5], &[2, 5], &mut out);
        assert_eq!(out, [2, 5]);
        rot.apply_about(&[2, 5], &[3, 5], &mut out);
        assert_eq!(out, [2, 6]);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(transforms_for(0), Err(SawError::InvalidDimension { dim: 0 })));
        assert!(matches!(
            transforms_for(MAX_DIM + 1),
            Err(SawError::UnsupportedDimension { dim }) if dim == MAX_DIM + 1
        ));
    }
}
