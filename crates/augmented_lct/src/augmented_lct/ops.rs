use super::{Action, AugmentedLinkCutTree, Id, X, id};
use crate::LinkCutError;
use crate::algebra::{ActedMonoid, CommutativeMonoid, Monoid};
use crate::traits::{DynamicForest, PathOps, SubtreeOps, VertexOps};

impl<A: ActedMonoid> AugmentedLinkCutTree<A> {
    /// Whether `x` hangs below the exposed vertex `y`, i.e. they share a tree.
    #[inline(always)]
    fn joined(&self, x: Id, y: Id) -> bool {
        x == y || !self.node(x).p.is_nil()
    }

    /// Add the edge `(u, v)`.
    ///
    /// Fails with [`LinkCutError::AlreadyConnected`], leaving the forest and its rooting
    /// untouched, if `u` and `v` already share a tree.
    pub fn link(&mut self, u: usize, v: usize) -> Result<(), LinkCutError> {
        if self.is_connected(u, v) {
            return Err(LinkCutError::AlreadyConnected { u, v });
        }
        let x = id(u);
        let y = id(v);
        self.reroot(x);
        self.expose(y);
        self.add(y, x);
        Ok(())
    }

    /// Remove the edge `(u, v)`.
    ///
    /// On [`LinkCutError::InvalidEdge`] the forest is unchanged but `u`'s tree is re-rooted at
    /// `u`.
    pub fn cut(&mut self, u: usize, v: usize) -> Result<(), LinkCutError> {
        debug_assert!(u < self.len() && v < self.len());
        if u == v {
            return Err(LinkCutError::InvalidEdge { u, v });
        }
        let x = id(u);
        let y = id(v);
        self.reroot(x);
        self.expose(y);

        // After `reroot(u); expose(v)` the heavy path is exactly `u, v` iff they are adjacent.
        if self.node(y).h[0] != x || self.node(x).h != [Id::NIL; 2] {
            return Err(LinkCutError::InvalidEdge { u, v });
        }
        self.node_mut(y).h[0] = Id::NIL;
        self.node_mut(x).p = Id::NIL;
        self.update(y);
        Ok(())
    }

    /// Re-root the tree containing `v` at `v`.
    pub fn evert(&mut self, v: usize) {
        debug_assert!(v < self.len());
        self.reroot(id(v));
    }

    pub fn is_connected(&mut self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.len() && v < self.len());
        let x = id(u);
        let y = id(v);
        self.expose(x);
        self.expose(y);
        self.joined(x, y)
    }

    /// Lowest common ancestor under the current rooting.
    pub fn lca(&mut self, u: usize, v: usize) -> Option<usize> {
        debug_assert!(u < self.len() && v < self.len());
        let x = id(u);
        let y = id(v);
        self.expose(x);
        let w = self.expose(y);
        self.joined(x, y).then_some(w.idx())
    }

    /// Current root of the tree containing `v`.
    pub fn find_root(&mut self, v: usize) -> usize {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        let mut y = x;
        self.push(y);
        while !self.node(y).h[0].is_nil() {
            y = self.node(y).h[0];
            self.push(y);
        }
        self.splay_heavy(y);
        y.idx()
    }

    pub fn get(&mut self, v: usize) -> X<A> {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        self.node(x).val
    }

    pub fn set(&mut self, v: usize, value: X<A>) {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        self.node_mut(x).val = value;
        self.update(x);
    }

    /// Replace the value `y` of `v` with `y ⊕ value`.
    pub fn multiply(&mut self, v: usize, value: X<A>) {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        let nx = self.node_mut(x);
        nx.val = A::MX::op(&nx.val, &value);
        self.update(x);
    }

    /// Fold of the values on the path, ordered from `u` to `v`. `None` if disconnected.
    ///
    /// Re-roots the tree at `u`.
    pub fn prod_path(&mut self, u: usize, v: usize) -> Option<X<A>> {
        debug_assert!(u < self.len() && v < self.len());
        let x = id(u);
        let y = id(v);
        self.reroot(x);
        self.expose(y);
        self.joined(x, y).then(|| self.node(y).hsum)
    }

    /// Apply `a` to every value on the path between `u` and `v`.
    ///
    /// Returns `false` (and does nothing) if they are disconnected. Re-roots the tree at `u`.
    pub fn apply_path(&mut self, u: usize, v: usize, a: Action<A>) -> bool {
        debug_assert!(u < self.len() && v < self.len());
        let x = id(u);
        let y = id(v);
        self.reroot(x);
        self.expose(y);
        if !self.joined(x, y) {
            return false;
        }
        self.push_heavy(y, &a);
        true
    }

    /// Number of vertices on the path between `u` and `v`.
    pub fn path_len(&mut self, u: usize, v: usize) -> Option<usize> {
        debug_assert!(u < self.len() && v < self.len());
        let x = id(u);
        let y = id(v);
        self.reroot(x);
        self.expose(y);
        self.joined(x, y).then(|| self.node(y).hsz as usize)
    }

    /// The `k`-th vertex (0-based) on the path from `u` to `v`.
    pub fn path_kth(&mut self, u: usize, v: usize, k: usize) -> Option<usize> {
        debug_assert!(u < self.len() && v < self.len());
        let x = id(u);
        let y = id(v);
        self.reroot(x);
        self.expose(y);
        if !self.joined(x, y) || k >= self.node(y).hsz as usize {
            return None;
        }
        Some(self.kth_on_exposed_path(y, k))
    }

    /// The `k`-th ancestor of `v` under the current rooting (`jump(v, 0) == v`).
    pub fn jump(&mut self, v: usize, k: usize) -> Option<usize> {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        let depth = self.node(x).hsz as usize - 1;
        if k > depth {
            return None;
        }
        Some(self.kth_on_exposed_path(x, depth - k))
    }

    /// Walk the heavy splay tree topped by the exposed vertex `top` to its `k`-th vertex in
    /// depth order.
    fn kth_on_exposed_path(&mut self, top: Id, mut k: usize) -> usize {
        let mut x = top;
        loop {
            self.push(x);
            let l = self.node(x).h[0];
            let lsz = self.hsz(l) as usize;
            if k < lsz {
                x = l;
                continue;
            }
            if k == lsz {
                self.splay_heavy(x);
                return x.idx();
            }
            k -= lsz + 1;
            x = self.node(x).h[1];
        }
    }

    /// Apply `a` to every value in the subtree of `v` under the current rooting.
    pub fn apply_subtree(&mut self, v: usize, a: Action<A>) {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        let l = self.node(x).l;
        {
            let nx = self.node_mut(x);
            nx.val = A::act(&nx.val, &a, 1);
        }
        self.push_light(l[0], true, &a);
        self.push_light(l[1], true, &a);
        self.update(x);
    }

    /// [`apply_subtree`](Self::apply_subtree) with the tree rooted at `root` first.
    pub fn apply_subtree_from(&mut self, v: usize, root: usize, a: Action<A>) {
        debug_assert!(root < self.len());
        self.reroot(id(root));
        self.apply_subtree(v, a);
    }

    /// Number of vertices in the subtree of `v` under the current rooting.
    pub fn subtree_size(&mut self, v: usize) -> usize {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        let l = self.node(x).l;
        1 + self.asz(l[0]) as usize + self.asz(l[1]) as usize
    }

    /// [`subtree_size`](Self::subtree_size) with the tree rooted at `root` first.
    pub fn subtree_size_from(&mut self, v: usize, root: usize) -> usize {
        debug_assert!(root < self.len());
        self.reroot(id(root));
        self.subtree_size(v)
    }

    /// Number of vertices in the tree containing `v`.
    pub fn component_size(&mut self, v: usize) -> usize {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose(x);
        self.node(x).asz as usize
    }

    /// Runtime-checked subtree fold, usable with any value monoid.
    pub fn try_prod_subtree(&mut self, v: usize) -> Result<X<A>, LinkCutError> {
        debug_assert!(v < self.len());
        if !A::MX::COMMUTATIVE {
            return Err(LinkCutError::NonCommutativeSubtreeQuery);
        }
        Ok(self.fold_subtree(id(v)))
    }

    fn fold_subtree(&mut self, x: Id) -> X<A> {
        self.expose(x);
        let (l, val) = {
            let nx = self.node(x);
            (nx.l, nx.val)
        };
        A::MX::op(&A::MX::op(&self.asum(l[0]), &val), &self.asum(l[1]))
    }

    /// Debug-only check that `child` is adjacent to the current root `parent`, to be called
    /// right after `reroot(parent); expose(child)`.
    #[cfg(debug_assertions)]
    fn debug_assert_edge(&mut self, child: Id, parent: Id) {
        let mut y = self.node(child).h[0];
        debug_assert!(!y.is_nil(), "edge query requires an existing edge");
        self.push(y);
        while !self.node(y).h[1].is_nil() {
            y = self.node(y).h[1];
            self.push(y);
        }
        debug_assert_eq!(y, parent, "edge query requires an existing edge");
    }

    /// `reroot(parent); expose(child)` with the adjacency checked in debug builds.
    fn expose_edge(&mut self, child: usize, parent: usize) -> Id {
        debug_assert!(child < self.len() && parent < self.len());
        debug_assert_ne!(child, parent);
        let x = id(child);
        self.reroot(id(parent));
        self.expose(x);
        #[cfg(debug_assertions)]
        self.debug_assert_edge(x, id(parent));
        x
    }
}

impl<A: ActedMonoid> AugmentedLinkCutTree<A>
where
    A::MX: CommutativeMonoid,
{
    /// Fold of the subtree of `v` under the current rooting.
    pub fn prod_subtree(&mut self, v: usize) -> X<A> {
        debug_assert!(v < self.len());
        const { assert!(A::MX::COMMUTATIVE, "CommutativeMonoid requires COMMUTATIVE = true") };
        self.fold_subtree(id(v))
    }

    /// [`prod_subtree`](Self::prod_subtree) with the tree rooted at `root` first.
    pub fn prod_subtree_from(&mut self, v: usize, root: usize) -> X<A> {
        debug_assert!(root < self.len());
        self.reroot(id(root));
        self.prod_subtree(v)
    }

    /// Fold of every value in the tree containing `v`.
    pub fn component_prod(&mut self, v: usize) -> X<A> {
        debug_assert!(v < self.len());
        const { assert!(A::MX::COMMUTATIVE, "CommutativeMonoid requires COMMUTATIVE = true") };
        let x = id(v);
        self.expose(x);
        self.node(x).asum
    }
}

impl<A: ActedMonoid> DynamicForest for AugmentedLinkCutTree<A> {
    type Value = X<A>;

    fn new(values: &[Self::Value]) -> Self {
        Self::new(values)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn link(&mut self, u: usize, v: usize) -> Result<(), LinkCutError> {
        self.link(u, v)
    }

    fn cut(&mut self, u: usize, v: usize) -> Result<(), LinkCutError> {
        self.cut(u, v)
    }

    fn connected(&mut self, u: usize, v: usize) -> bool {
        self.is_connected(u, v)
    }
}

impl<A: ActedMonoid> VertexOps for AugmentedLinkCutTree<A> {
    fn vertex_get(&mut self, v: usize) -> Self::Value {
        self.get(v)
    }

    fn vertex_set(&mut self, v: usize, x: Self::Value) {
        self.set(v, x)
    }

    fn vertex_multiply(&mut self, v: usize, x: Self::Value) {
        self.multiply(v, x)
    }
}

impl<A: ActedMonoid> PathOps for AugmentedLinkCutTree<A> {
    type Act = Action<A>;

    fn evert(&mut self, v: usize) {
        self.evert(v)
    }

    fn find_root(&mut self, v: usize) -> usize {
        self.find_root(v)
    }

    fn lca(&mut self, u: usize, v: usize) -> Option<usize> {
        self.lca(u, v)
    }

    fn path_fold(&mut self, u: usize, v: usize) -> Option<Self::Value> {
        self.prod_path(u, v)
    }

    fn path_apply(&mut self, u: usize, v: usize, act: Self::Act) -> bool {
        self.apply_path(u, v, act)
    }

    fn path_len(&mut self, u: usize, v: usize) -> Option<usize> {
        self.path_len(u, v)
    }

    fn path_kth(&mut self, u: usize, v: usize, k: usize) -> Option<usize> {
        self.path_kth(u, v, k)
    }
}

impl<A: ActedMonoid> SubtreeOps for AugmentedLinkCutTree<A>
where
    A::MX: CommutativeMonoid,
{
    type Act = Action<A>;

    fn subtree_fold(&mut self, child: usize, parent: usize) -> Self::Value {
        const { assert!(A::MX::COMMUTATIVE, "CommutativeMonoid requires COMMUTATIVE = true") };
        let x = self.expose_edge(child, parent);
        self.fold_subtree(x)
    }

    fn subtree_apply(&mut self, child: usize, parent: usize, act: Self::Act) {
        self.expose_edge(child, parent);
        self.apply_subtree(child, act)
    }

    fn subtree_size(&mut self, child: usize, parent: usize) -> usize {
        self.expose_edge(child, parent);
        self.subtree_size(child)
    }
}
