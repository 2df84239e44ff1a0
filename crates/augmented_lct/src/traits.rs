//! Trait-based API for dynamic forest operations.

use crate::LinkCutError;

pub trait DynamicForest: Sized {
    type Value: Copy;

    fn new(values: &[Self::Value]) -> Self;
    fn len(&self) -> usize;
    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Link `u` and `v` if they are in different components.
    fn link(&mut self, u: usize, v: usize) -> Result<(), LinkCutError>;

    /// Cut edge `(u, v)` if it exists.
    fn cut(&mut self, u: usize, v: usize) -> Result<(), LinkCutError>;

    fn connected(&mut self, u: usize, v: usize) -> bool;
}

pub trait VertexOps: DynamicForest {
    fn vertex_get(&mut self, v: usize) -> Self::Value;
    fn vertex_set(&mut self, v: usize, x: Self::Value);

    /// Replace the value `y` of `v` with `y ⊕ x`.
    fn vertex_multiply(&mut self, v: usize, x: Self::Value);
}

pub trait PathOps: DynamicForest {
    type Act: Copy;

    fn evert(&mut self, v: usize);
    fn find_root(&mut self, v: usize) -> usize;

    /// LCA under the current rooting, `None` if disconnected.
    fn lca(&mut self, u: usize, v: usize) -> Option<usize>;

    /// Fold of the path values ordered from `u` to `v`.
    fn path_fold(&mut self, u: usize, v: usize) -> Option<Self::Value>;
    fn path_apply(&mut self, u: usize, v: usize, act: Self::Act) -> bool;

    fn path_len(&mut self, u: usize, v: usize) -> Option<usize>;
    fn path_kth(&mut self, u: usize, v: usize, k: usize) -> Option<usize>;
}

pub trait SubtreeOps: DynamicForest {
    type Act: Copy;

    /// Fold the subtree on the `child` side of the edge `(child, parent)`.
    fn subtree_fold(&mut self, child: usize, parent: usize) -> Self::Value;

    /// Apply to the subtree on the `child` side of the edge `(child, parent)`.
    fn subtree_apply(&mut self, child: usize, parent: usize, act: Self::Act);

    fn subtree_size(&mut self, child: usize, parent: usize) -> usize;
}
