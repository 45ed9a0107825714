fn main() {
    divan::main();
}

const SAMPLE_INPUT: &str = include_str!("../sample.txt");

#[divan::bench]
fn part1() {
    day_10::part1::process(divan::black_box(SAMPLE_INPUT)).unwrap();
}

#[divan::bench]
fn part2() {
    day_10::part2::process(divan::black_box(SAMPLE_INPUT)).unwrap();
}

#[divan::bench]
fn parse_sample() {
    day_10::parser::parse_input(divan::black_box(SAMPLE_INPUT)).unwrap();
}
