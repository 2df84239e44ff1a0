//! Algebraic capabilities (monoid + acted monoid) consumed by the augmented link-cut tree.
//!
//! `Copy`-oriented in the same way as the rest of the crate: values and actions are small
//! plain-old-data types that are freely duplicated inside the arena.

use std::marker::PhantomData;

/// An associative `op` with a neutral `unit`.
pub trait Monoid {
    type Value: Copy;

    /// Whether `op(a, b) == op(b, a)` for all values.
    ///
    /// Non-commutative monoids make the tree maintain reverse heavy aggregates (`hmus`) and are
    /// rejected by subtree/component folds.
    const COMMUTATIVE: bool;

    fn unit() -> Self::Value;
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value;
}

/// Marker for monoids whose `op` is commutative.
///
/// Implementors must set [`Monoid::COMMUTATIVE`] to `true`; the tree rejects the pair at compile
/// time otherwise.
pub trait CommutativeMonoid: Monoid {}

/// A value monoid `MX` acted on by an action monoid `MA`.
///
/// `MA::op(earlier, later)` composes actions in application order: the result applies
/// `earlier` first, then `later`.
pub trait ActedMonoid {
    type MX: Monoid;
    type MA: Monoid;

    /// Apply `a` to an aggregate `x` covering `size` values.
    fn act(
        x: &<Self::MX as Monoid>::Value,
        a: &<Self::MA as Monoid>::Value,
        size: usize,
    ) -> <Self::MX as Monoid>::Value;
}

/// The one-element monoid, used as the action monoid of trees without range updates.
#[derive(Clone, Copy, Debug)]
pub enum Trivial {}

impl Monoid for Trivial {
    type Value = ();

    const COMMUTATIVE: bool = true;

    #[inline(always)]
    fn unit() -> Self::Value {}

    #[inline(always)]
    fn op(_a: &Self::Value, _b: &Self::Value) -> Self::Value {}
}

impl CommutativeMonoid for Trivial {}

/// Adapts a plain monoid `M` into an acted monoid whose only action is the identity.
pub struct NoAction<M>(PhantomData<fn() -> M>);

impl<M: Monoid> ActedMonoid for NoAction<M> {
    type MX = M;
    type MA = Trivial;

    #[inline(always)]
    fn act(x: &M::Value, _a: &(), _size: usize) -> M::Value {
        *x
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Sum {}

impl Monoid for Sum {
    type Value = i64;

    const COMMUTATIVE: bool = true;

    #[inline(always)]
    fn unit() -> Self::Value {
        0
    }

    #[inline(always)]
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value {
        a.wrapping_add(*b)
    }
}

impl CommutativeMonoid for Sum {}

#[derive(Clone, Copy, Debug)]
pub enum Min {}

impl Monoid for Min {
    type Value = i64;

    const COMMUTATIVE: bool = true;

    #[inline(always)]
    fn unit() -> Self::Value {
        i64::MAX
    }

    #[inline(always)]
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value {
        *a.min(b)
    }
}

impl CommutativeMonoid for Min {}

#[derive(Clone, Copy, Debug)]
pub enum Max {}

impl Monoid for Max {
    type Value = i64;

    const COMMUTATIVE: bool = true;

    #[inline(always)]
    fn unit() -> Self::Value {
        i64::MIN
    }

    #[inline(always)]
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value {
        *a.max(b)
    }
}

impl CommutativeMonoid for Max {}

#[derive(Clone, Copy, Debug)]
pub enum Xor {}

impl Monoid for Xor {
    type Value = i64;

    const COMMUTATIVE: bool = true;

    #[inline(always)]
    fn unit() -> Self::Value {
        0
    }

    #[inline(always)]
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value {
        a ^ b
    }
}

impl CommutativeMonoid for Xor {}

/// The affine map `x -> a * x + b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affine {
    pub a: i64,
    pub b: i64,
}

impl Affine {
    pub const IDENTITY: Self = Self { a: 1, b: 0 };

    #[inline(always)]
    pub fn eval(self, x: i64) -> i64 {
        self.a.wrapping_mul(x).wrapping_add(self.b)
    }

    /// `self` followed by `then`.
    #[inline(always)]
    pub fn then(self, then: Self) -> Self {
        // then(self(x)) = a2 * (a1 * x + b1) + b2
        Self {
            a: self.a.wrapping_mul(then.a),
            b: self.b.wrapping_mul(then.a).wrapping_add(then.b),
        }
    }
}

/// Composition of affine maps in sequence order (non-commutative).
///
/// Folding a path `x0, x1, ..., xk` yields the map that applies `x0` first and `xk` last.
#[derive(Clone, Copy, Debug)]
pub enum AffineComposite {}

impl Monoid for AffineComposite {
    type Value = Affine;

    const COMMUTATIVE: bool = false;

    #[inline(always)]
    fn unit() -> Self::Value {
        Affine::IDENTITY
    }

    #[inline(always)]
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value {
        a.then(*b)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum SumAdd {}

impl ActedMonoid for SumAdd {
    type MX = Sum;
    type MA = Sum;

    #[inline(always)]
    fn act(x: &i64, a: &i64, size: usize) -> i64 {
        x.wrapping_add(a.wrapping_mul(size as i64))
    }
}

#[derive(Clone, Copy, Debug)]
pub enum SumAffine {}

impl ActedMonoid for SumAffine {
    type MX = Sum;
    type MA = AffineComposite;

    #[inline(always)]
    fn act(x: &i64, f: &Affine, size: usize) -> i64 {
        f.a.wrapping_mul(*x)
            .wrapping_add(f.b.wrapping_mul(size as i64))
    }
}

#[derive(Clone, Copy, Debug)]
pub enum MinAdd {}

impl ActedMonoid for MinAdd {
    type MX = Min;
    type MA = Sum;

    #[inline(always)]
    fn act(x: &i64, a: &i64, size: usize) -> i64 {
        if size == 0 { *x } else { x.wrapping_add(*a) }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum MaxAdd {}

impl ActedMonoid for MaxAdd {
    type MX = Max;
    type MA = Sum;

    #[inline(always)]
    fn act(x: &i64, a: &i64, size: usize) -> i64 {
        if size == 0 { *x } else { x.wrapping_add(*a) }
    }
}
