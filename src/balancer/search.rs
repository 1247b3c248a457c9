//! Partition search strategies
//!
//! Balanced partition is NP-hard in general, but the pools this product
//! sees are small, so the reference strategy enumerates every ⌊n/2⌋-subset
//! and is exact. The greedy strategy trades optimality for bounded time on
//! pools too large to enumerate.

use crate::error::LeagueError;
use crate::types::BalancedPartition;
use std::time::Instant;

/// One player in a balancing pool, with their snapshotted rating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMember {
    pub name: String,
    pub rating: i32,
}

/// A strategy for splitting a pool into two near-equal sides.
///
/// Implementations must be deterministic for a fixed pool and must honor
/// the deadline by failing rather than returning a partition they cannot
/// vouch for.
pub trait PartitionStrategy: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Split the pool, which arrives sorted by player name.
    ///
    /// The two sides differ in size by at most one, team A taking the
    /// smaller half when the pool is odd.
    fn partition(
        &self,
        pool: &[PoolMember],
        deadline: Option<Instant>,
    ) -> crate::error::Result<BalancedPartition>;
}

/// Exact search over all ⌊n/2⌋-subsets.
///
/// Subsets are enumerated in lexicographic index order and only a strict
/// improvement replaces the incumbent, so ties resolve to the
/// lexicographically first subset and results are fully deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustiveSearch;

/// How many subsets to examine between deadline checks
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

impl PartitionStrategy for ExhaustiveSearch {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn partition(
        &self,
        pool: &[PoolMember],
        deadline: Option<Instant>,
    ) -> crate::error::Result<BalancedPartition> {
        let started = Instant::now();
        let n = pool.len();
        let k = n / 2;
        let total: i64 = pool.iter().map(|member| member.rating as i64).sum();

        let mut indices: Vec<usize> = (0..k).collect();
        let mut best_diff = i64::MAX;
        let mut best_indices = indices.clone();
        let mut examined: u64 = 0;

        loop {
            examined += 1;
            if examined % DEADLINE_CHECK_INTERVAL == 0 {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        return Err(LeagueError::BalancerTimeout {
                            elapsed_ms: started.elapsed().as_millis() as u64,
                        }
                        .into());
                    }
                }
            }

            let sum_a: i64 = indices.iter().map(|&i| pool[i].rating as i64).sum();
            let diff = (2 * sum_a - total).abs();
            if diff < best_diff {
                best_diff = diff;
                best_indices.copy_from_slice(&indices);
                if diff == 0 {
                    // Nothing can beat a perfect split, and later ties
                    // would lose the lexicographic tie-break anyway
                    break;
                }
            }

            if !next_combination(&mut indices, n) {
                break;
            }
        }

        Ok(build_partition(pool, &best_indices))
    }
}

/// Greedy sorted-alternation heuristic for oversized pools.
///
/// Players are taken in descending rating order and each joins the side
/// with the smaller running sum, capped at ⌈n/2⌉ members per side.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAlternation;

impl PartitionStrategy for GreedyAlternation {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn partition(
        &self,
        pool: &[PoolMember],
        _deadline: Option<Instant>,
    ) -> crate::error::Result<BalancedPartition> {
        let cap = pool.len().div_ceil(2);

        let mut by_rating: Vec<&PoolMember> = pool.iter().collect();
        by_rating.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));

        let mut side_a: Vec<&PoolMember> = Vec::with_capacity(cap);
        let mut side_b: Vec<&PoolMember> = Vec::with_capacity(cap);
        let mut sum_a: i64 = 0;
        let mut sum_b: i64 = 0;

        for member in by_rating {
            let join_a = if side_a.len() >= cap {
                false
            } else if side_b.len() >= cap {
                true
            } else if sum_a != sum_b {
                sum_a < sum_b
            } else {
                // Equal sums: prefer the emptier side, then side A
                side_a.len() <= side_b.len()
            };

            if join_a {
                sum_a += member.rating as i64;
                side_a.push(member);
            } else {
                sum_b += member.rating as i64;
                side_b.push(member);
            }
        }

        let mut team_a: Vec<String> = side_a.iter().map(|m| m.name.clone()).collect();
        let mut team_b: Vec<String> = side_b.iter().map(|m| m.name.clone()).collect();
        team_a.sort();
        team_b.sort();

        Ok(BalancedPartition {
            team_a,
            team_b,
            rating_sum_a: sum_a,
            rating_sum_b: sum_b,
            difference: (sum_a - sum_b).abs(),
        })
    }
}

/// Advance `indices` to the next k-combination of `0..n` in lexicographic
/// order; returns false once the last combination has been visited.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if indices[i] != i + n - k {
            indices[i] += 1;
            for j in i + 1..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

fn build_partition(pool: &[PoolMember], team_a_indices: &[usize]) -> BalancedPartition {
    let mut in_team_a = vec![false; pool.len()];
    for &i in team_a_indices {
        in_team_a[i] = true;
    }

    let mut team_a = Vec::with_capacity(team_a_indices.len());
    let mut team_b = Vec::with_capacity(pool.len() - team_a_indices.len());
    let mut rating_sum_a: i64 = 0;
    let mut rating_sum_b: i64 = 0;

    for (i, member) in pool.iter().enumerate() {
        if in_team_a[i] {
            team_a.push(member.name.clone());
            rating_sum_a += member.rating as i64;
        } else {
            team_b.push(member.name.clone());
            rating_sum_b += member.rating as i64;
        }
    }

    BalancedPartition {
        team_a,
        team_b,
        rating_sum_a,
        rating_sum_b,
        difference: (rating_sum_a - rating_sum_b).abs(),
    }
}
