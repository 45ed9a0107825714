use good_lp::{
    coin_cbc, constraint, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use itertools::Itertools;

use crate::parser::{self, Machine};

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> miette::Result<String> {
    let machines = parser::parse_input(input)?;

    let mut total = 0u64;
    for (i, machine) in machines.iter().enumerate() {
        let presses = min_presses(machine)
            .map_err(|e| miette::miette!("couldn't solve machine {}: {}", i + 1, e))?;
        let cost: u64 = presses.iter().sum();
        tracing::debug!(machine = i + 1, cost, "solved");
        total += cost;
    }

    Ok(total.to_string())
}

/// Cheapest press count per button reaching the joltage targets exactly.
///
/// One non-negative integer variable per button, one equality constraint per
/// counter; minimizes the total press count and hands the search to CBC.
pub fn min_presses(machine: &Machine) -> Result<Vec<u64>, ResolutionError> {
    let mut vars = ProblemVariables::new();
    let presses: Vec<Variable> = machine
        .buttons
        .iter()
        .map(|_| vars.add(variable().integer().min(0)))
        .collect();

    let objective: Expression = presses.iter().copied().sum();
    let mut model = vars.minimise(objective).using(coin_cbc);
    model.set_parameter("log", "0");

    let mut counters: Vec<Expression> = machine
        .joltages
        .iter()
        .map(|_| Expression::from(0))
        .collect();
    for (button, &press) in machine.buttons.iter().zip(&presses) {
        for &index in &button.indices {
            counters[index] += press;
        }
    }

    for (counter, &target) in counters.into_iter().zip_eq(&machine.joltages) {
        model = model.with(constraint!(counter == target as f64));
    }

    let solution = model.solve()?;
    Ok(presses
        .iter()
        .map(|&press| solution.value(press).round() as u64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn satisfies(machine: &Machine, presses: &[u64]) -> bool {
        let mut totals = vec![0i64; machine.joltages.len()];
        for (button, &count) in machine.buttons.iter().zip(presses) {
            for &index in &button.indices {
                totals[index] += count as i64;
            }
        }
        totals == machine.joltages
    }

    #[test]
    fn test_process() -> miette::Result<()> {
        let input = "\
[diagram] (0,1) (1,2) {3,5,2}}
[d] (0) (1) {4,4}}";
        assert_eq!("13", process(input)?);
        Ok(())
    }

    #[rstest]
    #[case("[diagram] (0,1) (1,2) {3,5,2}}", "5")]
    #[case("[d] (0) {5}}", "5")]
    #[case("[d] (0,0) {6}}", "3")]
    #[case("(0,1) (1,2) (0,2) {4,6,4}}", "7")]
    #[case("[d] {0,0}}", "0")]
    fn test_single_machine(#[case] input: &str, #[case] expected: &str) -> miette::Result<()> {
        assert_eq!(expected, process(input)?);
        Ok(())
    }

    #[test]
    fn test_presses_reach_targets_exactly() {
        let machines = parser::parse_input("[.##.] (0,3) (1,2) (0,1) (2,3) {3,5,5,3}}").unwrap();
        let presses = min_presses(&machines[0]).unwrap();
        assert!(satisfies(&machines[0], &presses));
        assert_eq!(8, presses.iter().sum::<u64>());
    }

    #[test]
    fn test_minimality_matches_exhaustive_search() {
        let machines = parser::parse_input("[d] (0,1) (1,2) (0,2) {4,6,4}}").unwrap();
        let machine = &machines[0];

        let max = *machine.joltages.iter().max().unwrap() as u64;
        let best = std::iter::repeat(0..=max)
            .take(machine.buttons.len())
            .multi_cartesian_product()
            .filter(|counts| satisfies(machine, counts))
            .map(|counts| counts.iter().sum::<u64>())
            .min()
            .unwrap();

        let presses = min_presses(machine).unwrap();
        assert_eq!(best, presses.iter().sum::<u64>());
    }

    #[test]
    fn test_unreferenced_nonzero_target_is_infeasible() {
        let machines = parser::parse_input("[d] (0) {3,1}}").unwrap();
        assert!(min_presses(&machines[0]).is_err());
    }

    #[test]
    fn test_negative_target_is_infeasible() {
        let machines = parser::parse_input("[d] (0) {-3}}").unwrap();
        assert!(min_presses(&machines[0]).is_err());
    }

    #[test]
    fn test_unsolvable_machine_is_fatal() {
        let input = "\
[d] (0) {2}}
[d] (0) {3,1}}";
        assert!(process(input).is_err());
    }

    #[test]
    fn test_malformed_token_is_fatal() {
        assert!(process("x(1,2) {1}}").is_err());
    }

    #[test]
    fn test_repeated_runs_agree() -> miette::Result<()> {
        let input = "\
[diagram] (0,1) (1,2) {3,5,2}}
[d] (0) (1) {4,4}}";
        assert_eq!(process(input)?, process(input)?);
        Ok(())
    }

    #[test]
    fn test_line_order_does_not_change_total() -> miette::Result<()> {
        let forward = "[a] (0,1) (1,2) {3,5,2}}\n[b] (0) (0,1) {2,2}}";
        let backward = "[b] (0) (0,1) {2,2}}\n[a] (0,1) (1,2) {3,5,2}}";
        assert_eq!(process(forward)?, process(backward)?);
        Ok(())
    }
}
