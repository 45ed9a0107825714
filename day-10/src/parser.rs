use miette::Diagnostic;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map, map_res},
    multi::{separated_list0, separated_list1},
    sequence::delimited,
    IResult,
};
use thiserror::Error;

/// One machine per input line: a diagram pattern, the buttons wired to it,
/// and the joltage each counter has to end up at.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    pub diagram: String,
    pub buttons: Vec<Button>,
    pub joltages: Vec<i64>,
}

/// Counter indices a single press increments (or toggles, for the diagram).
/// A repeated index contributes once per occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub indices: Vec<usize>,
}

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ParseError {
    #[error("invalid input at line {line}: unrecognized token {token:?}")]
    #[diagnostic(code(day10::invalid_token))]
    InvalidToken { line: usize, token: String },

    #[error("line {line} must contain exactly one joltage group")]
    #[diagnostic(code(day10::joltage_group))]
    JoltageGroup { line: usize },

    #[error("line {line}: button index {index} exceeds the {len} joltage counters")]
    #[diagnostic(code(day10::index_range))]
    IndexOutOfRange {
        line: usize,
        index: usize,
        len: usize,
    },
}

/// Parses the whole input file, one machine per non-blank line, in file order.
pub fn parse_input(input: &str) -> Result<Vec<Machine>, ParseError> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| {
            let (_, tokens) = parse_line(line).map_err(|e| ParseError::InvalidToken {
                line: line_no,
                token: offending_token(e, line),
            })?;
            machine_from_tokens(line_no, tokens)
        })
        .collect()
}

fn machine_from_tokens(line_no: usize, tokens: Vec<Token>) -> Result<Machine, ParseError> {
    let mut diagram = String::new();
    let mut buttons = Vec::new();
    let mut joltages = None;

    for token in tokens {
        match token {
            Token::Diagram(body) => diagram = body,
            Token::Button(button) => buttons.push(button),
            Token::Joltages(values) => {
                if joltages.replace(values).is_some() {
                    return Err(ParseError::JoltageGroup { line: line_no });
                }
            }
        }
    }

    let joltages = joltages.ok_or(ParseError::JoltageGroup { line: line_no })?;

    // Button indices address joltage counters; anything past the end of the
    // target vector has no equation to live in.
    for button in &buttons {
        if let Some(&index) = button.indices.iter().find(|&&i| i >= joltages.len()) {
            return Err(ParseError::IndexOutOfRange {
                line: line_no,
                index,
                len: joltages.len(),
            });
        }
    }

    Ok(Machine {
        diagram,
        buttons,
        joltages,
    })
}

fn offending_token(err: nom::Err<nom::error::Error<&str>>, line: &str) -> String {
    let rest = match &err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => line,
    };
    rest.split_whitespace().next().unwrap_or(line).to_string()
}

// region: nom parser
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Diagram(String),
    Button(Button),
    Joltages(Vec<i64>),
}

fn parse_index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

fn parse_joltage(input: &str) -> IResult<&str, i64> {
    nom::character::complete::i64(input)
}

fn parse_diagram(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('['), take_till(|c| c == ']'), char(']')),
        |body: &str| Token::Diagram(body.to_string()),
    )(input)
}

fn parse_button(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('('), separated_list0(char(','), parse_index), char(')')),
        |indices| Token::Button(Button { indices }),
    )(input)
}

fn parse_joltages(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('{'), separated_list1(char(','), parse_joltage), tag("}}")),
        Token::Joltages,
    )(input)
}

fn parse_line(input: &str) -> IResult<&str, Vec<Token>> {
    all_consuming(separated_list1(
        space1,
        alt((parse_diagram, parse_button, parse_joltages)),
    ))(input)
}
// endregion
