//! nom parsers for length values such as `12pt`, `2cm` or `0.5in`.

use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{multispace0, multispace1};
use nom::combinator::{all_consuming, map, opt};
use nom::multi::separated_list1;
use nom::number::complete::float;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style value parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

const PT_PER_INCH: f32 = 72.0;
const PT_PER_CM: f32 = 28.3465;
const PT_PER_MM: f32 = 2.83465;
const PT_PER_TWIP: f32 = 0.05;

fn unit_factor(input: &str) -> IResult<&str, f32> {
    alt((
        map(tag_no_case("pt"), |_| 1.0),
        map(tag_no_case("px"), |_| 1.0),
        map(tag_no_case("in"), |_| PT_PER_INCH),
        map(tag_no_case("cm"), |_| PT_PER_CM),
        map(tag_no_case("mm"), |_| PT_PER_MM),
        map(tag_no_case("tw"), |_| PT_PER_TWIP),
    ))
    .parse(input)
}

/// Parses a single length in points; a bare number is taken as points.
pub fn length(input: &str) -> IResult<&str, f32> {
    map((float, opt(unit_factor)), |(value, factor)| {
        value * factor.unwrap_or(1.0)
    })
    .parse(input)
}

/// Parses a whitespace-separated list of lengths.
pub fn length_list(input: &str) -> IResult<&str, Vec<f32>> {
    delimited(multispace0, separated_list1(multispace1, length), multispace0).parse(input)
}

/// Parses a complete length string, rejecting trailing input.
pub fn parse_length(input: &str) -> Result<f32, StyleParseError> {
    all_consuming(delimited(multispace0, length, multispace0))
        .parse(input)
        .map(|(_, v)| v)
        .map_err(|e| StyleParseError::Parse(format!("'{}': {}", input, e)))
}

/// Parses a complete whitespace-separated list of lengths.
pub fn parse_length_list(input: &str) -> Result<Vec<f32>, StyleParseError> {
    all_consuming(length_list)
        .parse(input)
        .map(|(_, v)| v)
        .map_err(|e| StyleParseError::Parse(format!("'{}': {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(parse_length("12").unwrap(), 12.0);
        assert_eq!(parse_length("12pt").unwrap(), 12.0);
        assert_eq!(parse_length("1in").unwrap(), 72.0);
        assert!((parse_length("2cm").unwrap() - 56.693).abs() < 0.01);
        assert!((parse_length("240tw").unwrap() - 12.0).abs() < 0.001);
        assert!(parse_length("12 furlongs").is_err());
    }

    #[test]
    fn parses_lists() {
        assert_eq!(parse_length_list("10pt 20pt").unwrap(), vec![10.0, 20.0]);
        assert_eq!(parse_length_list(" 1in ").unwrap(), vec![72.0]);
        assert!(parse_length_list("").is_err());
    }
}
