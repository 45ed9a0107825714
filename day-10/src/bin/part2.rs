use day_10::part2::process;
use miette::{Context, IntoDiagnostic};

#[tracing::instrument]
fn main() -> miette::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| miette::miette!("usage: part2 <input file>"))?;
    let input = std::fs::read_to_string(&path)
        .into_diagnostic()
        .with_context(|| format!("read {path}"))?;
    let result = process(&input).context("process part 2")?;
    println!("{}", result);
    Ok(())
}
