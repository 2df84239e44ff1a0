use crate::algebra::{ActedMonoid, Monoid, NoAction};

mod ops;

type X<A> = <<A as ActedMonoid>::MX as Monoid>::Value;
type Action<A> = <<A as ActedMonoid>::MA as Monoid>::Value;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Id(u32);

impl Id {
    const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[inline(always)]
fn id(v: usize) -> Id {
    debug_assert!(v < u32::MAX as usize);
    Id(v as u32)
}

struct Node<A: ActedMonoid> {
    // Heavy (preferred-path) splay children, ordered by depth.
    h: [Id; 2],
    // Light children: heavy-tree roots of non-preferred subtrees, or fake aggregators.
    l: [Id; 2],
    p: Id,

    val: X<A>,

    // Heavy splay subtree folded root-to-leaf (`hsum`) and leaf-to-root (`hmus`).
    // `hmus` is only kept up to date for non-commutative monoids.
    hsum: X<A>,
    hmus: X<A>,

    // Everything hanging off the heavy splay subtree through light edges.
    lsum: X<A>,

    // `hsum ⊕ lsum`: every vertex represented below this node.
    asum: X<A>,

    // Pending action for the heavy values (`val`/`hsum`) of both heavy children.
    hlz: Action<A>,
    // Pending action for everything reachable through light edges below this node.
    llz: Action<A>,

    hsz: u32,
    lsz: u32,
    asz: u32,

    rev: bool,
    fake: bool,
    hlz_pending: bool,
    llz_pending: bool,
}

impl<A: ActedMonoid> Node<A> {
    fn fake() -> Self {
        Self {
            h: [Id::NIL; 2],
            l: [Id::NIL; 2],
            p: Id::NIL,
            val: A::MX::unit(),
            hsum: A::MX::unit(),
            hmus: A::MX::unit(),
            lsum: A::MX::unit(),
            asum: A::MX::unit(),
            hlz: A::MA::unit(),
            llz: A::MA::unit(),
            hsz: 0,
            lsz: 0,
            asz: 0,
            rev: false,
            fake: true,
            hlz_pending: false,
            llz_pending: false,
        }
    }

    fn new(x: X<A>) -> Self {
        Self {
            val: x,
            hsum: x,
            hmus: x,
            asum: x,
            hsz: 1,
            asz: 1,
            fake: false,
            ..Self::fake()
        }
    }
}

/// Link-cut tree with subtree aggregation (top-tree-like "augmented" LCT).
///
/// Every preferred path is a splay tree over `h` links (the heavy forest). The non-preferred
/// children of a vertex hang off its `l` links; when a vertex has more than two of them, the
/// extra ones are grouped under *fake* aggregator nodes that form a second splay forest over
/// `l` links (the light forest). Each node therefore knows the fold of its whole represented
/// subtree, which gives subtree queries and subtree-wide lazy actions on top of the usual path
/// operations.
///
/// The arena holds `2n + 5` slots: `n` real vertices created by
/// [`make_node`](Self::make_node) followed by the pool of fake nodes, recycled through an
/// explicit free-list so that steady-state operation never allocates.
///
/// Path folds are exact for non-commutative monoids. Subtree and component folds require
/// [`CommutativeMonoid`](crate::algebra::CommutativeMonoid).
pub struct AugmentedLinkCutTree<A: ActedMonoid> {
    nodes: Vec<Node<A>>,
    // Number of real slots (`n`).
    capacity: usize,
    // Number of real vertices created so far.
    len: usize,
    free: Vec<Id>,
    stack: Vec<Id>,
}

/// Augmented link-cut tree over a plain monoid (no range actions).
pub type MonoidLinkCutTree<M> = AugmentedLinkCutTree<NoAction<M>>;

impl<A: ActedMonoid> AugmentedLinkCutTree<A> {
    /// Empty forest with room for `n` vertices.
    pub fn with_capacity(n: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            capacity: 0,
            len: 0,
            free: Vec::new(),
            stack: Vec::new(),
        };
        tree.build(n);
        tree
    }

    /// Forest of isolated vertices `0..values.len()` carrying `values`.
    pub fn new(values: &[X<A>]) -> Self {
        let mut tree = Self::with_capacity(values.len());
        for &x in values {
            tree.nodes[tree.len] = Node::new(x);
            tree.len += 1;
        }
        tree
    }

    /// Drop the current forest and allocate a fresh arena for `n` vertices.
    pub fn build(&mut self, n: usize) {
        self.reset();

        let total = 2 * n + 5;
        debug_assert!(total < u32::MAX as usize);
        self.nodes.reserve_exact(total);
        self.nodes.extend((0..total).map(|_| Node::fake()));
        self.capacity = n;
        self.free.reserve(n + 5);
        self.free.extend((n..total).map(id));
        self.stack.reserve(n);
    }

    /// Release the arena. Every vertex handle becomes invalid.
    pub fn reset(&mut self) {
        self.nodes = Vec::new();
        self.free = Vec::new();
        self.stack.clear();
        self.capacity = 0;
        self.len = 0;
    }

    /// Create an isolated vertex carrying `x` and return its index.
    pub fn make_node(&mut self, x: X<A>) -> Result<usize, crate::LinkCutError> {
        if self.len == self.capacity {
            return Err(crate::LinkCutError::OutOfCapacity {
                capacity: self.capacity,
            });
        }
        let v = self.len;
        self.nodes[v] = Node::new(x);
        self.len += 1;
        Ok(v)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of fake aggregator nodes currently spliced into the light forest.
    pub fn fake_nodes_in_use(&self) -> usize {
        let pool = if self.nodes.is_empty() {
            0
        } else {
            self.capacity + 5
        };
        pool - self.free.len()
    }

    #[inline(always)]
    fn node(&self, x: Id) -> &Node<A> {
        debug_assert!(!x.is_nil());
        debug_assert!(x.idx() < self.nodes.len());
        if cfg!(debug_assertions) {
            &self.nodes[x.idx()]
        } else {
            // SAFETY: `Id` values are only created from valid indices and `NIL` is checked.
            unsafe { self.nodes.get_unchecked(x.idx()) }
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node<A> {
        debug_assert!(!x.is_nil());
        debug_assert!(x.idx() < self.nodes.len());
        if cfg!(debug_assertions) {
            &mut self.nodes[x.idx()]
        } else {
            // SAFETY: `Id` values are only created from valid indices and `NIL` is checked.
            unsafe { self.nodes.get_unchecked_mut(x.idx()) }
        }
    }

    #[inline(always)]
    fn hsz(&self, x: Id) -> u32 {
        if x.is_nil() { 0 } else { self.node(x).hsz }
    }

    #[inline(always)]
    fn lsz(&self, x: Id) -> u32 {
        if x.is_nil() { 0 } else { self.node(x).lsz }
    }

    #[inline(always)]
    fn asz(&self, x: Id) -> u32 {
        if x.is_nil() { 0 } else { self.node(x).asz }
    }

    #[inline(always)]
    fn hsum(&self, x: Id) -> X<A> {
        if x.is_nil() {
            A::MX::unit()
        } else {
            self.node(x).hsum
        }
    }

    #[inline(always)]
    fn hmus(&self, x: Id) -> X<A> {
        if x.is_nil() {
            A::MX::unit()
        } else {
            self.node(x).hmus
        }
    }

    #[inline(always)]
    fn lsum(&self, x: Id) -> X<A> {
        if x.is_nil() {
            A::MX::unit()
        } else {
            self.node(x).lsum
        }
    }

    #[inline(always)]
    fn asum(&self, x: Id) -> X<A> {
        if x.is_nil() {
            A::MX::unit()
        } else {
            self.node(x).asum
        }
    }

    #[inline(always)]
    fn is_heavy_root(&self, x: Id) -> bool {
        let p = self.node(x).p;
        if p.is_nil() {
            return true;
        }
        let np = self.node(p);
        np.h[0] != x && np.h[1] != x
    }

    #[inline(always)]
    fn is_light_root(&self, x: Id) -> bool {
        let p = self.node(x).p;
        if p.is_nil() {
            return true;
        }
        let np = self.node(p);
        (np.l[0] != x && np.l[1] != x) || !np.fake
    }

    fn update(&mut self, x: Id) {
        let (h, l, fake, val) = {
            let nx = self.node(x);
            (nx.h, nx.l, nx.fake, nx.val)
        };

        let (hsz, hsum, hmus) = if fake {
            (0, A::MX::unit(), A::MX::unit())
        } else {
            let hsz = 1 + self.hsz(h[0]) + self.hsz(h[1]);
            let hsum = A::MX::op(&A::MX::op(&self.hsum(h[0]), &val), &self.hsum(h[1]));
            let hmus = if A::MX::COMMUTATIVE {
                hsum
            } else {
                A::MX::op(&A::MX::op(&self.hmus(h[1]), &val), &self.hmus(h[0]))
            };
            (hsz, hsum, hmus)
        };

        let lsz = self.lsz(h[0]) + self.lsz(h[1]) + self.asz(l[0]) + self.asz(l[1]);
        let lsum = A::MX::op(
            &A::MX::op(&self.asum(l[0]), &self.lsum(h[0])),
            &A::MX::op(&self.lsum(h[1]), &self.asum(l[1])),
        );

        let nx = self.node_mut(x);
        nx.hsz = hsz;
        nx.hsum = hsum;
        nx.hmus = hmus;
        nx.lsz = lsz;
        nx.lsum = lsum;
        nx.asz = hsz + lsz;
        nx.asum = A::MX::op(&hsum, &lsum);
    }

    /// Reverse the heavy splay subtree rooted at `x`.
    fn toggle(&mut self, x: Id) {
        if x.is_nil() {
            return;
        }
        let nx = self.node_mut(x);
        nx.h.swap(0, 1);
        if !A::MX::COMMUTATIVE {
            std::mem::swap(&mut nx.hsum, &mut nx.hmus);
        }
        nx.rev ^= true;
    }

    /// Apply `a` to every heavy value in the splay subtree of `x`.
    fn push_heavy(&mut self, x: Id, a: &Action<A>) {
        if x.is_nil() || self.node(x).fake {
            return;
        }
        let nx = self.node_mut(x);
        let hsz = nx.hsz as usize;
        nx.val = A::act(&nx.val, a, 1);
        nx.hsum = A::act(&nx.hsum, a, hsz);
        if !A::MX::COMMUTATIVE {
            nx.hmus = A::act(&nx.hmus, a, hsz);
        }
        nx.hlz = if nx.hlz_pending {
            A::MA::op(&nx.hlz, a)
        } else {
            *a
        };
        nx.hlz_pending = true;
        nx.asum = A::MX::op(&nx.hsum, &nx.lsum);
    }

    /// Apply `a` to everything hanging below `x` through light edges, and to the heavy values
    /// of `x`'s splay subtree as well when `with_heavy` is set.
    fn push_light(&mut self, x: Id, with_heavy: bool, a: &Action<A>) {
        if x.is_nil() {
            return;
        }
        let nx = self.node_mut(x);
        if nx.lsz > 0 {
            nx.lsum = A::act(&nx.lsum, a, nx.lsz as usize);
            nx.llz = if nx.llz_pending {
                A::MA::op(&nx.llz, a)
            } else {
                *a
            };
            nx.llz_pending = true;
        }
        if with_heavy && !nx.fake {
            self.push_heavy(x, a);
        } else {
            nx.asum = A::MX::op(&nx.hsum, &nx.lsum);
        }
    }

    fn push(&mut self, x: Id) {
        let (h, l, rev, hlz, hlz_pending, llz, llz_pending) = {
            let nx = self.node(x);
            (
                nx.h,
                nx.l,
                nx.rev,
                nx.hlz,
                nx.hlz_pending,
                nx.llz,
                nx.llz_pending,
            )
        };

        if hlz_pending {
            self.push_heavy(h[0], &hlz);
            self.push_heavy(h[1], &hlz);
            let nx = self.node_mut(x);
            nx.hlz = A::MA::unit();
            nx.hlz_pending = false;
        }

        if llz_pending {
            self.push_light(h[0], false, &llz);
            self.push_light(h[1], false, &llz);
            self.push_light(l[0], true, &llz);
            self.push_light(l[1], true, &llz);
            let nx = self.node_mut(x);
            nx.llz = A::MA::unit();
            nx.llz_pending = false;
        }

        if rev {
            self.toggle(h[0]);
            self.toggle(h[1]);
            self.node_mut(x).rev = false;
        }
    }

    /// Point whichever link of `g` referenced `old` at `new`.
    #[inline(always)]
    fn replace_child(&mut self, g: Id, old: Id, new: Id) {
        let ng = self.node_mut(g);
        for c in ng.h.iter_mut().chain(ng.l.iter_mut()) {
            if *c == old {
                *c = new;
                return;
            }
        }
    }

    fn rotate_heavy(&mut self, x: Id) {
        let p = self.node(x).p;
        let g = self.node(p).p;

        let dir = usize::from(self.node(p).h[1] == x);
        let b = self.node(x).h[dir ^ 1];

        self.node_mut(p).h[dir] = b;
        if !b.is_nil() {
            self.node_mut(b).p = p;
        }
        self.node_mut(x).h[dir ^ 1] = p;
        self.node_mut(p).p = x;

        // `g` is either the heavy parent or, at the top of a heavy tree, the light parent that
        // holds this tree in one of its `l` slots. Its heavy fold is unchanged by the rotation.
        // Its `lsum`/`asum` is unchanged only up to the order of light children, which matters
        // just for non-commutative monoids, whose light folds are never read.
        self.node_mut(x).p = g;
        if !g.is_nil() {
            self.replace_child(g, p, x);
        }

        self.update(p);
        self.update(x);
    }

    fn rotate_light(&mut self, x: Id) {
        let p = self.node(x).p;
        let g = self.node(p).p;

        let dir = usize::from(self.node(p).l[1] == x);
        let b = self.node(x).l[dir ^ 1];

        self.node_mut(p).l[dir] = b;
        if !b.is_nil() {
            self.node_mut(b).p = p;
        }
        self.node_mut(x).l[dir ^ 1] = p;
        self.node_mut(p).p = x;

        self.node_mut(x).p = g;
        if !g.is_nil() {
            self.replace_child(g, p, x);
        }

        self.update(p);
        self.update(x);
    }

    fn push_path_heavy(&mut self, x: Id) {
        self.stack.clear();
        let mut y = x;
        self.stack.push(y);
        while !self.is_heavy_root(y) {
            y = self.node(y).p;
            self.stack.push(y);
        }
        while let Some(v) = self.stack.pop() {
            self.push(v);
        }
    }

    fn push_path_light(&mut self, x: Id) {
        self.stack.clear();
        let mut y = x;
        self.stack.push(y);
        while !self.is_light_root(y) {
            y = self.node(y).p;
            self.stack.push(y);
        }
        while let Some(v) = self.stack.pop() {
            self.push(v);
        }
    }

    /// Push pending tags from the real vertex owning `x`'s light tree down to `x`.
    fn push_light_chain(&mut self, x: Id) {
        self.stack.clear();
        let mut y = x;
        self.stack.push(y);
        while self.node(y).fake {
            y = self.node(y).p;
            self.stack.push(y);
        }
        while let Some(v) = self.stack.pop() {
            self.push(v);
        }
    }

    fn splay_heavy(&mut self, x: Id) {
        self.push_path_heavy(x);

        while !self.is_heavy_root(x) {
            let p = self.node(x).p;
            if !self.is_heavy_root(p) {
                let g = self.node(p).p;
                let zigzig = (self.node(g).h[0] == p) == (self.node(p).h[0] == x);
                if zigzig {
                    self.rotate_heavy(p);
                } else {
                    self.rotate_heavy(x);
                }
            }
            self.rotate_heavy(x);
        }
    }

    fn splay_light(&mut self, x: Id) {
        self.push_path_light(x);

        while !self.is_light_root(x) {
            let p = self.node(x).p;
            if !self.is_light_root(p) {
                let g = self.node(p).p;
                let zigzig = (self.node(g).l[0] == p) == (self.node(p).l[0] == x);
                if zigzig {
                    self.rotate_light(p);
                } else {
                    self.rotate_light(x);
                }
            }
            self.rotate_light(x);
        }
    }

    /// Hang `v` (a heavy-tree root) below `u` as an extra light child.
    ///
    /// `u` must have no pending tags.
    fn add(&mut self, u: Id, v: Id) {
        if v.is_nil() {
            return;
        }

        for slot in 0..2 {
            if self.node(u).l[slot].is_nil() {
                self.node_mut(u).l[slot] = v;
                self.node_mut(v).p = u;
                self.update(u);
                return;
            }
        }

        let Some(w) = self.free.pop() else {
            unreachable!("fake node pool exhausted");
        };
        let old = self.node(u).l[0];
        *self.node_mut(w) = Node::fake();
        {
            let nw = self.node_mut(w);
            nw.l = [old, v];
            nw.p = u;
        }
        self.node_mut(old).p = w;
        self.node_mut(v).p = w;
        self.node_mut(u).l[0] = w;

        self.update(w);
        self.update(u);
    }

    /// Detach the heavy-tree root `u` from its light parent, splicing out the fake node that
    /// held it, if any.
    fn rem(&mut self, u: Id) {
        let v = self.node(u).p;
        self.push_light_chain(v);

        if self.node(v).fake {
            let w = self.node(v).p;
            let vl = self.node(v).l;
            let sibling = if vl[0] == u { vl[1] } else { vl[0] };
            let slot = usize::from(self.node(w).l[1] == v);

            self.node_mut(w).l[slot] = sibling;
            self.node_mut(sibling).p = w;
            self.update(w);

            if self.node(w).fake {
                self.splay_light(w);
                let owner = self.node(w).p;
                self.update(owner);
            }

            self.free.push(v);
        } else {
            let slot = usize::from(self.node(v).l[1] == u);
            self.node_mut(v).l[slot] = Id::NIL;
            self.update(v);
        }

        self.node_mut(u).p = Id::NIL;
    }

    /// The real vertex whose light forest holds the heavy-tree root `u`.
    fn light_parent(&mut self, u: Id) -> Id {
        let v = self.node(u).p;
        if !self.node(v).fake {
            return v;
        }
        self.splay_light(v);
        self.node(v).p
    }

    /// Make the root-to-`x` path preferred, ending at `x`, with `x` at the top of the whole
    /// structure.
    ///
    /// Returns the last vertex where the path switched from a light edge (or `x` itself), which
    /// is the LCA with the previously exposed vertex.
    fn expose(&mut self, x: Id) -> Id {
        let mut last = x;
        self.splay_heavy(x);

        let r = self.node(x).h[1];
        self.node_mut(x).h[1] = Id::NIL;
        self.add(x, r);
        self.update(x);

        while !self.node(x).p.is_nil() {
            let v = self.light_parent(x);
            self.splay_heavy(v);
            self.rem(x);

            let r = self.node(v).h[1];
            self.node_mut(v).h[1] = Id::NIL;
            self.add(v, r);

            self.node_mut(v).h[1] = x;
            self.node_mut(x).p = v;
            self.update(v);

            self.splay_heavy(x);
            last = v;
        }

        last
    }

    /// Re-root `x`'s tree at `x`.
    fn reroot(&mut self, x: Id) {
        self.expose(x);
        self.toggle(x);
        self.push(x);
    }
}
