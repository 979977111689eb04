use rand::{thread_rng, Rng};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::puzzle::{Move, PuzzleState};

/// One A* node. `parent` indexes into the owning frontier's arena.
struct SearchNode {
    state: Rc<PuzzleState>,
    moves: usize,
    parent: Option<usize>,
    priority: usize,
}

impl SearchNode {
    fn new(state: Rc<PuzzleState>, moves: usize, parent: Option<usize>) -> Self {
        let priority = state.manhattan() + moves;
        Self {
            state,
            moves,
            parent,
            priority,
        }
    }
}

/// Heap entry. Orders by `(priority, manhattan, hamming)`, smallest first.
#[derive(PartialEq, Eq)]
struct QueueEntry {
    priority: usize,
    manhattan: usize,
    hamming: usize,
    index: usize,
}

impl QueueEntry {
    fn key(&self) -> (usize, usize, usize, usize) {
        (self.priority, self.manhattan, self.hamming, self.index)
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Frontier {
    nodes: Vec<SearchNode>,
    queue: BinaryHeap<QueueEntry>,
    expanded: usize,
}

impl Frontier {
    fn new(root: Rc<PuzzleState>) -> Self {
        let mut frontier = Self {
            nodes: Vec::new(),
            queue: BinaryHeap::new(),
            expanded: 0,
        };
        frontier.push(SearchNode::new(root, 0, None));
        frontier
    }

    fn push(&mut self, node: SearchNode) {
        let index = self.nodes.len();
        self.queue.push(QueueEntry {
            priority: node.priority,
            manhattan: node.state.manhattan(),
            hamming: node.state.hamming(),
            index,
        });
        self.nodes.push(node);
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop().map(|entry| entry.index)
    }

    fn is_goal(&self, index: usize) -> bool {
        self.nodes[index].state.is_goal()
    }

    fn expand(&mut self, index: usize) {
        self.expanded += 1;

        let node = &self.nodes[index];
        let state = Rc::clone(&node.state);
        let parent = node.parent.map(|p| Rc::clone(&self.nodes[p].state));
        let moves = node.moves + 1;

        // Successors are built with `apply` rather than the memoized
        // `neighbors`, so expanded states hold no links to their children.
        for neighbor in Move::ALL.iter().filter_map(|&dir| state.apply(dir)) {
            if parent.as_deref() == Some(&neighbor) {
                continue;
            }
            self.push(SearchNode::new(Rc::new(neighbor), moves, Some(index)));
        }
    }

    /// States from the root to `index`, root first.
    fn path_to(&self, index: usize) -> Vec<Rc<PuzzleState>> {
        let mut path = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            path.push(Rc::clone(&self.nodes[i].state));
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

/// Node counts from one run, per frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub main_expanded: usize,
    pub main_enqueued: usize,
    pub twin_expanded: usize,
    pub twin_enqueued: usize,
}

/// Runs A* on a board and on its twin in lockstep. Exactly one of the two
/// is solvable, so whichever frontier reaches the goal first decides the
/// outcome.
pub struct Solver {
    solution: Option<Vec<Rc<PuzzleState>>>,
    stats: SearchStats,
}

impl Solver {
    pub fn new(initial: &PuzzleState) -> Self {
        Self::with_rng(initial, &mut thread_rng())
    }

    /// Solves `initial`, using `rng` to pick its twin if it has none yet.
    pub fn with_rng<R: Rng>(initial: &PuzzleState, rng: &mut R) -> Self {
        let twin = initial.twin_with(rng);
        let mut main = Frontier::new(Rc::new(initial.detached()));
        let mut mirror = Frontier::new(Rc::new(twin.detached()));

        let mut solution = None;
        // Neither frontier drains: every board has at least two neighbors
        // and expansion prunes only one of them.
        while let (Some(m), Some(t)) = (main.pop(), mirror.pop()) {
            if main.is_goal(m) {
                solution = Some(main.path_to(m));
                break;
            }
            if mirror.is_goal(t) {
                break;
            }
            main.expand(m);
            mirror.expand(t);
        }

        let stats = SearchStats {
            main_expanded: main.expanded,
            main_enqueued: main.nodes.len(),
            twin_expanded: mirror.expanded,
            twin_enqueued: mirror.nodes.len(),
        };

        Self { solution, stats }
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Minimum number of moves, or `None` if the board is unsolvable.
    pub fn moves(&self) -> Option<usize> {
        self.solution.as_ref().map(|path| path.len() - 1)
    }

    /// Boards on a shortest solution, initial board first.
    pub fn solution(&self) -> Option<&[Rc<PuzzleState>]> {
        self.solution.as_deref()
    }

    /// Blank moves along the solution.
    pub fn solution_moves(&self) -> Option<Vec<Move>> {
        self.solution()?
            .windows(2)
            .map(|pair| pair[0].move_towards(&pair[1]))
            .collect()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(rows: &[&[u32]]) -> PuzzleState {
        let grid: Vec<Vec<u32>> = rows.iter().map(|r| r.to_vec()).collect();
        PuzzleState::new(&grid).unwrap()
    }

    fn solve(b: &PuzzleState) -> Solver {
        Solver::with_rng(b, &mut StdRng::seed_from_u64(2024))
    }

    #[test]
    fn goal_board_needs_no_moves() {
        let b = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]]);
        let solver = solve(&b);
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), Some(0));
        let path = solver.solution().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(*path[0], b);
    }

    #[test]
    fn one_move_from_goal() {
        let b = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        let solver = solve(&b);
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), Some(1));
        assert_eq!(solver.solution_moves(), Some(vec![Move::Right]));
    }

    #[test]
    fn swapped_tiles_are_unsolvable() {
        let b = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        let solver = solve(&b);
        assert!(!solver.is_solvable());
        assert_eq!(solver.moves(), None);
        assert!(solver.solution().is_none());
        assert!(solver.solution_moves().is_none());
    }

    #[test]
    fn known_four_move_board() {
        let b = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        let solver = solve(&b);
        assert_eq!(solver.moves(), Some(4));

        let path = solver.solution().unwrap();
        assert_eq!(*path[0], b);
        assert!(path.last().unwrap().is_goal());
        for pair in path.windows(2) {
            assert!(pair[0].neighbors().iter().any(|n| **n == *pair[1]));
        }
    }

    #[test]
    fn short_boards_are_optimal() {
        let cases = vec![
            (vec![vec![1, 2, 3], vec![0, 4, 6], vec![7, 5, 8]], 3),
            (
                vec![
                    vec![1, 2, 3, 4],
                    vec![5, 6, 0, 8],
                    vec![9, 10, 7, 11],
                    vec![13, 14, 15, 12],
                ],
                3,
            ),
            (vec![vec![1, 0], vec![3, 2]], 1),
        ];
        for (grid, expected) in cases {
            let solver = solve(&PuzzleState::new(&grid).unwrap());
            assert_eq!(solver.moves(), Some(expected), "board {:?}", grid);
        }
    }

    #[test]
    fn boards_do_not_keep_the_search_alive() {
        let mut rng = StdRng::seed_from_u64(5);
        let b = PuzzleState::scrambled(3, 30, &mut rng).unwrap();
        let solver = Solver::with_rng(&b, &mut rng);
        assert!(solver.is_solvable());

        let twin = b.twin();
        assert!(!b.has_cached_neighbors());
        assert!(!twin.has_cached_neighbors());
        for state in solver.solution().unwrap() {
            assert!(!state.has_cached_neighbors());
            assert_eq!(Rc::strong_count(state), 1);
        }

        drop(solver);
        assert_eq!(Rc::strong_count(&twin), 2);
    }

    #[test]
    fn unsolvable_board_keeps_no_twin_search() {
        let b = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        let solver = solve(&b);
        assert!(!solver.is_solvable());
        drop(solver);

        let twin = b.twin();
        assert!(!twin.has_cached_neighbors());
        assert_eq!(Rc::strong_count(&twin), 2);
    }

    #[test]
    fn stats_count_both_frontiers() {
        let b = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        let stats = solve(&b).stats();
        assert!(stats.main_expanded >= 4);
        assert_eq!(stats.main_expanded, stats.twin_expanded);
        assert!(stats.main_enqueued > stats.main_expanded);
    }

    #[test]
    fn ordering_prefers_lower_priority_then_heuristics() {
        let entry = |priority, manhattan, hamming, index| QueueEntry {
            priority,
            manhattan,
            hamming,
            index,
        };
        let mut heap = BinaryHeap::new();
        heap.push(entry(5, 3, 3, 0));
        heap.push(entry(4, 4, 4, 1));
        heap.push(entry(4, 2, 2, 2));
        heap.push(entry(4, 2, 1, 3));
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect();
        assert_eq!(order, vec![3, 2, 1, 0]);
    }
}
