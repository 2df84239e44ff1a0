use std::collections::VecDeque;
use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SIZES: [usize; 4] = [1_024, 4_096, 16_384, 65_536];
pub const OPS_PER_SIZE: usize = 5_000;
pub const VALUE_RANGE: std::ops::RangeInclusive<i64> = -1_000_000_000..=1_000_000_000;
pub const DELTA_RANGE: std::ops::RangeInclusive<i64> = -1_000..=1_000;

const SAMPLE_SIZE: usize = 15;
const WARM_UP_MS: u64 = 100;
const MEASURE_MS: u64 = 200;

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

pub fn apply_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEASURE_MS));
}

fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn rng_for(kind: u64, size: usize) -> StdRng {
    let seed = 0x5EED_2026
        ^ (kind.wrapping_mul(SEED_MIX))
        ^ (size as u64).wrapping_mul(SEED_MIX.rotate_left(17));
    StdRng::seed_from_u64(mix_seed(seed))
}

fn generate_values(rng: &mut impl Rng, n: usize) -> Vec<i64> {
    (0..n).map(|_| rng.random_range(VALUE_RANGE)).collect()
}

fn generate_random_tree_edges(rng: &mut impl Rng, n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (i, rng.random_range(0..i))).collect()
}

/// Every parent is drawn from the first `hubs` vertices, so a handful of vertices carry
/// thousands of light children.
fn generate_bushy_tree_edges(rng: &mut impl Rng, n: usize, hubs: usize) -> Vec<(usize, usize)> {
    (1..n)
        .map(|i| (i, rng.random_range(0..i.min(hubs))))
        .collect()
}

#[derive(Clone, Copy, Debug)]
pub enum ConnOp {
    Link { u: usize, v: usize },
    Cut { u: usize, v: usize },
    Connected { u: usize, v: usize },
}

#[derive(Clone, Copy, Debug)]
pub enum PathOp {
    PathApply {
        u: usize,
        v: usize,
        delta: i64,
    },
    PathFold {
        u: usize,
        v: usize,
    },
    VertexAdd {
        v: usize,
        delta: i64,
    },
    EdgeSwap {
        cut_u: usize,
        cut_v: usize,
        link_u: usize,
        link_v: usize,
    },
}

#[derive(Clone, Copy, Debug)]
pub enum SubtreeOp {
    SubtreeApply {
        v: usize,
        root: usize,
        delta: i64,
    },
    SubtreeFold {
        v: usize,
        root: usize,
    },
    EdgeSwap {
        cut_u: usize,
        cut_v: usize,
        link_u: usize,
        link_v: usize,
    },
}

#[derive(Clone, Debug)]
pub struct ConnectivityCase {
    pub values: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub ops: Vec<ConnOp>,
}

#[derive(Clone, Debug)]
pub struct PathCase {
    pub values: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub ops: Vec<PathOp>,
}

#[derive(Clone, Debug)]
pub struct SubtreeCase {
    pub values: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub ops: Vec<SubtreeOp>,
}

struct ForestState {
    n: usize,
    adj: Vec<Vec<usize>>,
    comp_id: Vec<usize>,
    comps: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    mark: Vec<u32>,
    mark_gen: u32,
    comp_cnt: usize,
}

impl ForestState {
    fn new(n: usize) -> Self {
        Self {
            n,
            adj: vec![Vec::new(); n],
            comp_id: (0..n).collect(),
            comps: (0..n).map(|i| vec![i]).collect(),
            edges: Vec::new(),
            mark: vec![0; n],
            mark_gen: 1,
            comp_cnt: n,
        }
    }

    fn with_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut state = Self::new(n);
        for &(u, v) in edges {
            state.link(u, v);
        }
        state
    }

    fn remove_adj_one(vec: &mut Vec<usize>, x: usize) {
        if let Some(pos) = vec.iter().position(|&y| y == x) {
            vec.swap_remove(pos);
        } else {
            debug_assert!(false, "edge not found in adjacency");
        }
    }

    fn link(&mut self, u: usize, v: usize) {
        debug_assert!(self.comp_id[u] != self.comp_id[v]);
        self.adj[u].push(v);
        self.adj[v].push(u);
        self.edges.push((u, v));

        let mut a = self.comp_id[u];
        let mut b = self.comp_id[v];
        if self.comps[a].len() < self.comps[b].len() {
            std::mem::swap(&mut a, &mut b);
        }
        let moved = std::mem::take(&mut self.comps[b]);
        for x in moved {
            self.comp_id[x] = a;
            self.comps[a].push(x);
        }
        self.comp_cnt -= 1;
    }

    fn mark_component(&mut self, start: usize) -> u32 {
        let tag = self.mark_gen;
        self.mark_gen = self.mark_gen.wrapping_add(1);
        let mut q = VecDeque::new();
        q.push_back(start);
        self.mark[start] = tag;
        while let Some(v) = q.pop_front() {
            for &to in &self.adj[v] {
                if self.mark[to] == tag {
                    continue;
                }
                self.mark[to] = tag;
                q.push_back(to);
            }
        }
        tag
    }

    fn cut_by_index(&mut self, idx: usize) -> (usize, usize) {
        let (u, v) = self.edges.swap_remove(idx);
        let old = self.comp_id[u];
        debug_assert_eq!(old, self.comp_id[v]);
        Self::remove_adj_one(&mut self.adj[u], v);
        Self::remove_adj_one(&mut self.adj[v], u);

        let tag = self.mark_component(u);
        let (a, b): (Vec<_>, Vec<_>) = std::mem::take(&mut self.comps[old])
            .into_iter()
            .partition(|&x| self.mark[x] == tag);
        debug_assert!(!a.is_empty() && !b.is_empty());

        self.comps[old] = a;
        let new_id = self.comps.len();
        for &x in &b {
            self.comp_id[x] = new_id;
        }
        self.comps.push(b);
        self.comp_cnt += 1;

        (u, v)
    }

    /// Cut a random edge and reconnect the two halves through random endpoints.
    fn swap_random_edge(&mut self, rng: &mut impl Rng) -> (usize, usize, usize, usize) {
        let idx = rng.random_range(0..self.edges.len());
        let (cut_u, cut_v) = self.cut_by_index(idx);
        let link_u = self.random_vertex_in_comp(rng, self.comp_id[cut_u]);
        let link_v = self.random_vertex_in_comp(rng, self.comp_id[cut_v]);
        self.link(link_u, link_v);
        (cut_u, cut_v, link_u, link_v)
    }

    fn random_vertex_in_comp(&self, rng: &mut impl Rng, comp: usize) -> usize {
        let list = &self.comps[comp];
        list[rng.random_range(0..list.len())]
    }

    fn pick_two_components(&self, rng: &mut impl Rng) -> Option<(usize, usize)> {
        if self.comp_cnt <= 1 {
            return None;
        }
        let ca = self.comp_id[rng.random_range(0..self.n)];
        for _ in 0..100 {
            let cb = self.comp_id[rng.random_range(0..self.n)];
            if ca != cb {
                return Some((ca, cb));
            }
        }
        (0..self.n)
            .map(|b| self.comp_id[b])
            .find(|&cb| cb != ca)
            .map(|cb| (ca, cb))
    }
}

pub fn generate_connectivity_case(n: usize) -> ConnectivityCase {
    let mut rng = rng_for(1, n);
    let values = vec![0_i64; n];
    let mut state = ForestState::with_edges(n, &generate_random_tree_edges(&mut rng, n));
    for _ in 0..n / 4 {
        let idx = rng.random_range(0..state.edges.len());
        state.cut_by_index(idx);
    }
    let edges = state.edges.clone();

    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let roll = rng.random_range(0..100_u32);
        if roll < 50 {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            ops.push(ConnOp::Connected { u, v });
        } else if roll < 75 {
            if let Some((ca, cb)) = state.pick_two_components(&mut rng) {
                let u = state.random_vertex_in_comp(&mut rng, ca);
                let v = state.random_vertex_in_comp(&mut rng, cb);
                state.link(u, v);
                ops.push(ConnOp::Link { u, v });
            }
        } else if !state.edges.is_empty() {
            let idx = rng.random_range(0..state.edges.len());
            let (u, v) = state.cut_by_index(idx);
            ops.push(ConnOp::Cut { u, v });
        }
    }

    ConnectivityCase { values, edges, ops }
}

pub fn generate_path_case(n: usize) -> PathCase {
    let mut rng = rng_for(2, n);
    let values = generate_values(&mut rng, n);
    let mut state = ForestState::with_edges(n, &generate_random_tree_edges(&mut rng, n));
    let edges = state.edges.clone();

    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let roll = rng.random_range(0..100_u32);
        if roll < 30 {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            let delta = rng.random_range(DELTA_RANGE);
            ops.push(PathOp::PathApply { u, v, delta });
        } else if roll < 70 {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            ops.push(PathOp::PathFold { u, v });
        } else if roll < 85 {
            let v = rng.random_range(0..n);
            let delta = rng.random_range(DELTA_RANGE);
            ops.push(PathOp::VertexAdd { v, delta });
        } else {
            let (cut_u, cut_v, link_u, link_v) = state.swap_random_edge(&mut rng);
            ops.push(PathOp::EdgeSwap {
                cut_u,
                cut_v,
                link_u,
                link_v,
            });
        }
    }

    PathCase { values, edges, ops }
}

fn generate_subtree_ops(
    rng: &mut StdRng,
    state: &mut ForestState,
    n: usize,
) -> Vec<SubtreeOp> {
    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let roll = rng.random_range(0..100_u32);
        if roll < 80 {
            // Every case below keeps a single spanning tree, so any root works.
            let v = rng.random_range(0..n);
            let root = rng.random_range(0..n);
            if roll < 40 {
                let delta = rng.random_range(DELTA_RANGE);
                ops.push(SubtreeOp::SubtreeApply { v, root, delta });
            } else {
                ops.push(SubtreeOp::SubtreeFold { v, root });
            }
        } else {
            let (cut_u, cut_v, link_u, link_v) = state.swap_random_edge(rng);
            ops.push(SubtreeOp::EdgeSwap {
                cut_u,
                cut_v,
                link_u,
                link_v,
            });
        }
    }
    ops
}

pub fn generate_subtree_case(n: usize) -> SubtreeCase {
    let mut rng = rng_for(3, n);
    let values = generate_values(&mut rng, n);
    let mut state = ForestState::with_edges(n, &generate_random_tree_edges(&mut rng, n));
    let edges = state.edges.clone();
    let ops = generate_subtree_ops(&mut rng, &mut state, n);
    SubtreeCase { values, edges, ops }
}

/// Subtree workload on a tree whose vertices hang off a few hubs.
pub fn generate_bushy_subtree_case(n: usize) -> SubtreeCase {
    let mut rng = rng_for(4, n);
    let values = generate_values(&mut rng, n);
    let mut state = ForestState::with_edges(n, &generate_bushy_tree_edges(&mut rng, n, 8));
    let edges = state.edges.clone();
    let ops = generate_subtree_ops(&mut rng, &mut state, n);
    SubtreeCase { values, edges, ops }
}
