//! Battleship solitaire engine.
//!
//! Generation places a fleet under the no-touch rule, derives row/column
//! clues, then removes revealed cells while a deductive solver can still
//! reconstruct the solution. [`PuzzleSession`] is the play surface consumers
//! drive: cycling cells, auto water fill, hints, and solution checks.

pub mod clues;
pub mod fleet;
pub mod generator;
pub mod grid;
pub mod placement;
pub mod puzzle;
pub mod session;
pub mod ship;
pub mod solver;

pub use clues::Clues;
pub use fleet::{Difficulty, GridSize};
pub use generator::{Generator, GeneratorConfig};
pub use grid::{CellState, Grid, Position};
pub use placement::GenerationError;
pub use puzzle::Puzzle;
pub use session::{HintOutcome, MoveOutcome, PuzzleSession, SolutionCheck};
pub use ship::{Orientation, Ship};
pub use solver::{Deduction, DeductionRule, Solver};
