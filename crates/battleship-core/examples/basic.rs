//! Basic example of using the battleship engine

use battleship_core::{Difficulty, Generator, GridSize, HintOutcome, PuzzleSession, Solver};

fn main() {
    // Generate a puzzle
    println!("Generating a Medium 10x10 puzzle...\n");
    let mut generator = Generator::new();
    let puzzle = match generator.generate(GridSize::Ten, Difficulty::Medium) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("Generation failed: {}", err);
            return;
        }
    };

    println!("Starting board:");
    println!("{}", puzzle);
    println!("Revealed cells: {}", puzzle.revealed_count());
    println!("Fleet: {:?}\n", puzzle.fleet);

    // The solver can always reconstruct the solution from the start
    let solver = Solver::new();
    let solved = solver.solve(&puzzle.player, &puzzle.clues);
    println!("Deduced solution:");
    println!("{}", solved);
    assert_eq!(solved, puzzle.solution);

    // Drive a play session with hints
    let mut session = PuzzleSession::new(puzzle);
    println!("First hints:");
    for _ in 0..3 {
        match session.hint() {
            HintOutcome::Revealed(deduction) => {
                println!("  [{}] {}", deduction.rule, deduction.explanation);
            }
            HintOutcome::NoLogicalMoves => {
                println!("  No logical moves available");
                break;
            }
        }
    }

    println!("\nFound ships so far: {:?}", session.found_ships());
}
