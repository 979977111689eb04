//! Optimal N-puzzle solving with A*.
//!
//! A [`Solver`] searches a board and its [twin](PuzzleState::twin) side by
//! side; swapping two tiles flips solvability, so exactly one of the two
//! searches reaches the goal and that tells us whether the board can be
//! solved at all.
//!
//! ```
//! use slider_solver::{PuzzleState, Solver};
//!
//! let board = PuzzleState::new(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]).unwrap();
//! let solver = Solver::new(&board);
//! assert!(solver.is_solvable());
//! assert_eq!(solver.moves(), Some(1));
//! ```

pub mod error;
pub mod input;
pub mod puzzle;
pub mod solver;

pub use error::PuzzleError;
pub use puzzle::{Move, PuzzleState};
pub use solver::{SearchStats, Solver};
