use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::parser::{self, Machine};

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum DiagramError {
    #[error("button index {index} exceeds the {len} diagram cells")]
    #[diagnostic(code(day10::diagram_range))]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no button combination reaches the diagram")]
    #[diagnostic(code(day10::unreachable))]
    Unreachable,
}

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> miette::Result<String> {
    let machines = parser::parse_input(input)?;

    let mut total = 0u64;
    for (i, machine) in machines.iter().enumerate() {
        let presses = fewest_presses(machine)
            .map_err(|e| miette::miette!("couldn't solve machine {}: {}", i + 1, e))?;
        tracing::debug!(machine = i + 1, presses, "solved");
        total += presses;
    }

    Ok(total.to_string())
}

/// Fewest presses lighting the machine's diagram, starting all-dark.
///
/// Pressing a button twice cancels it, so each button is worth pressing at
/// most once; one pass over the buttons keeps the cheapest press count per
/// reachable pattern.
pub fn fewest_presses(machine: &Machine) -> Result<u64, DiagramError> {
    let target: Vec<bool> = machine.diagram.chars().map(|c| c == '#').collect();
    let len = target.len();

    let mut counts: HashMap<Vec<bool>, u64> = HashMap::new();
    counts.insert(vec![false; len], 0);

    for button in &machine.buttons {
        for (pattern, presses) in counts.clone() {
            let mut next = pattern;
            for &index in &button.indices {
                if index >= len {
                    return Err(DiagramError::IndexOutOfRange { index, len });
                }
                next[index] = !next[index];
            }
            let entry = counts.entry(next).or_insert(u64::MAX);
            *entry = (*entry).min(presses + 1);
        }
    }

    counts.get(&target).copied().ok_or(DiagramError::Unreachable)
}
