//! Cluster module - connected same-token groups
//!
//! A cluster is the set of cells reachable from a start cell through
//! orthogonal steps onto equal tokens. Flood fill is iterative (explicit stack)
//! with a visited set local to each call, so every cell is visited at most once
//! and deep boards cannot overflow the call stack.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Coord, Token};

/// Coordinates of one cluster, sorted row-major.
pub type Cluster = Vec<Coord>;

/// In-bounds orthogonal neighbours of `c` (up, down, left, right).
fn neighbours(grid: &Grid, c: Coord) -> ArrayVec<Coord, 4> {
    let mut out = ArrayVec::new();
    if c.row > 0 {
        out.push(Coord::new(c.row - 1, c.col));
    }
    if c.row + 1 < grid.height() {
        out.push(Coord::new(c.row + 1, c.col));
    }
    if c.col > 0 {
        out.push(Coord::new(c.row, c.col - 1));
    }
    if c.col + 1 < grid.width() {
        out.push(Coord::new(c.row, c.col + 1));
    }
    out
}

/// Flood from `start`, marking `visited` (flat, row-major) as it goes.
fn flood(grid: &Grid, start: Coord, token: Token, visited: &mut [bool]) -> Cluster {
    let width = grid.width();
    let mut cluster = Vec::new();
    let mut stack = vec![start];
    visited[start.row * width + start.col] = true;

    while let Some(c) = stack.pop() {
        cluster.push(c);
        for n in neighbours(grid, c) {
            let idx = n.row * width + n.col;
            if !visited[idx] && grid.token(n.row, n.col) == Some(token) {
                visited[idx] = true;
                stack.push(n);
            }
        }
    }

    cluster.sort_unstable();
    cluster
}

/// Find the cluster containing (row, col).
///
/// Returns an empty cluster when the start cell is empty or out of bounds.
///
/// ```
/// use autumn_burst_core::{cluster::find_cluster, Grid};
///
/// let grid: Grid = "AAB\nABB\nCCB".parse().unwrap();
/// assert_eq!(find_cluster(&grid, 0, 0).len(), 3);
/// assert_eq!(find_cluster(&grid, 0, 2).len(), 4);
/// assert!(find_cluster(&grid, 5, 5).is_empty());
/// ```
pub fn find_cluster(grid: &Grid, row: usize, col: usize) -> Cluster {
    let mut visited = Vec::new();
    find_cluster_in(grid, row, col, &mut visited)
}

/// [`find_cluster`] with a caller-provided visited buffer, reset on entry.
pub(crate) fn find_cluster_in(
    grid: &Grid,
    row: usize,
    col: usize,
    visited: &mut Vec<bool>,
) -> Cluster {
    let Some(token) = grid.token(row, col) else {
        return Vec::new();
    };
    visited.clear();
    visited.resize(grid.width() * grid.height(), false);
    flood(grid, Coord::new(row, col), token, visited)
}

/// Find every cluster of at least `min_size` cells.
///
/// Each cell is examined once, in row-major order; clusters come back ordered
/// by their first cell.
pub fn find_all_clusters(grid: &Grid, min_size: usize) -> Vec<Cluster> {
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut found = Vec::new();
    for c in grid.coords() {
        if visited[c.row * grid.width() + c.col] {
            continue;
        }
        let Some(token) = grid.token(c.row, c.col) else {
            continue;
        };
        let cluster = flood(grid, c, token, &mut visited);
        if cluster.len() >= min_size {
            found.push(cluster);
        }
    }
    found
}

/// Whether any cluster of at least `min_size` cells exists.
pub fn has_qualifying_cluster(grid: &Grid, min_size: usize) -> bool {
    let mut visited = vec![false; grid.width() * grid.height()];
    grid.coords().any(|c| {
        if visited[c.row * grid.width() + c.col] {
            return false;
        }
        match grid.token(c.row, c.col) {
            Some(token) => flood(grid, c, token, &mut visited).len() >= min_size,
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn test_single_cell_cluster() {
        let g = grid("AB\nCD");
        assert_eq!(find_cluster(&g, 0, 0), vec![Coord::new(0, 0)]);
    }

    #[test]
    fn test_empty_start_returns_empty() {
        let g = grid("A.\nAA");
        assert!(find_cluster(&g, 0, 1).is_empty());
    }

    #[test]
    fn test_diagonals_do_not_connect() {
        let g = grid("AB\nBA");
        assert_eq!(find_cluster(&g, 0, 0).len(), 1);
        assert_eq!(find_cluster(&g, 0, 1).len(), 1);
    }

    #[test]
    fn test_cluster_does_not_cross_empty_cells() {
        let g = grid("AA.AA");
        assert_eq!(find_cluster(&g, 0, 0), vec![Coord::new(0, 0), Coord::new(0, 1)]);
    }

    #[test]
    fn test_winding_cluster_sorted_row_major() {
        let g = grid(
            "AAAB
             BBAB
             AAAB",
        );
        let cluster = find_cluster(&g, 2, 0);
        assert_eq!(cluster.len(), 7);
        assert_eq!(cluster[0], Coord::new(0, 0));
        assert_eq!(cluster[6], Coord::new(2, 2));
        assert!(cluster.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_find_all_clusters_filters_and_orders() {
        let g = grid(
            "AABB
             AACB
             DCCB
             DDDD",
        );
        let all = find_all_clusters(&g, 4);
        let firsts: Vec<Coord> = all.iter().map(|c| c[0]).collect();
        assert_eq!(
            firsts,
            vec![Coord::new(0, 0), Coord::new(0, 2), Coord::new(2, 0)]
        );
        assert_eq!(all.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 5]);
        // C cells form a cluster of 3 and are filtered out.
        assert!(find_all_clusters(&g, 6).is_empty());
    }

    #[test]
    fn test_has_qualifying_cluster() {
        let g = grid("ABAB\nBABA");
        assert!(!has_qualifying_cluster(&g, 2));
        let g = grid("AABB\nCDBB");
        assert!(has_qualifying_cluster(&g, 4));
        assert!(!has_qualifying_cluster(&g, 5));
    }

    #[test]
    fn test_reused_buffer_is_reset() {
        let g = grid("AA\nAA");
        let mut visited = Vec::new();
        assert_eq!(find_cluster_in(&g, 0, 0, &mut visited).len(), 4);
        assert_eq!(find_cluster_in(&g, 1, 1, &mut visited).len(), 4);
    }
}
