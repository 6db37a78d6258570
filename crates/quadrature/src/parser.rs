//! Keyword block parser for quadrature configurations
//!
//! A block is the family name on its own line, followed by one keyword per
//! line and closed by `end`.
//!
//! ```text
//! level symmetric
//!   order 4
//!   dimension 3
//!   norm 12.566370614359172
//! end
//! ```

// crate modules
use crate::config::QuadratureConfig;
use crate::error::{Error, Result};
use crate::family::QuadratureFamily;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{self, digit1, space0, space1};
use nom::combinator::{all_consuming, map, map_res};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded};
use nom::IResult;

// external crates
use log::trace;

/// Recognised keyword lines
#[derive(Debug, Clone, Copy, PartialEq)]
enum Keyword {
    Order(usize),
    Dimension(usize),
    Norm(f64),
    Levels(usize),
    End,
}

/// Parse a whole block into a configuration
pub(crate) fn parse_block(block: &str) -> Result<QuadratureConfig> {
    let mut lines = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let first = lines.next().ok_or(Error::MissingKeyword("family"))?;
    let (_, family) = family(first).map_err(|_| Error::ParseError(first.to_string()))?;

    let mut order = None;
    let mut config = QuadratureConfig::new(family, 0);
    let mut closed = false;

    for line in lines {
        let (_, keyword) = keyword(line).map_err(|_| Error::ParseError(line.to_string()))?;
        trace!("{family} block: {keyword:?}");
        match keyword {
            Keyword::Order(n) => order = Some(n),
            Keyword::Dimension(n) => config.dimension = Some(n),
            Keyword::Norm(norm) => config.norm = Some(norm),
            Keyword::Levels(n) => config.levels = Some(n),
            Keyword::End => {
                closed = true;
                break;
            }
        }
    }

    if !closed {
        return Err(Error::MissingKeyword("end"));
    }
    config.order = order.ok_or(Error::MissingKeyword("order"))?;
    Ok(config)
}

/// Family selector taking up the whole line
fn family(i: &str) -> IResult<&str, QuadratureFamily> {
    all_consuming(map_res(
        alt((
            tag_no_case("gauss legendre"),
            tag_no_case("level symmetric"),
            tag_no_case("square cl"),
            tag_no_case("double gauss"),
            tag_no_case("general"),
        )),
        QuadratureFamily::try_from,
    ))(i)
}

/// A single keyword line
fn keyword(i: &str) -> IResult<&str, Keyword> {
    all_consuming(delimited(
        space0,
        alt((
            map(preceded(tag_no_case("order"), uint), Keyword::Order),
            map(preceded(tag_no_case("dimension"), uint), Keyword::Dimension),
            map(preceded(tag_no_case("norm"), preceded(space1, double)), Keyword::Norm),
            map(preceded(tag_no_case("levels"), uint), Keyword::Levels),
            map(tag_no_case("end"), |_| Keyword::End),
        )),
        space0,
    ))(i)
}

/// Unsigned size value after at least one space
fn uint(i: &str) -> IResult<&str, usize> {
    let (i, value) = preceded(space1, digit1)(i)?;
    let (_, v) = complete::u64(value)?;
    Ok((i, v as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(keyword("order 8").unwrap().1, Keyword::Order(8));
        assert_eq!(keyword("  DIMENSION 3 ").unwrap().1, Keyword::Dimension(3));
        assert_eq!(keyword("norm 1.2566e+01").unwrap().1, Keyword::Norm(1.2566e+01));
        assert_eq!(keyword("levels 4").unwrap().1, Keyword::Levels(4));
        assert_eq!(keyword("end").unwrap().1, Keyword::End);
        assert!(keyword("order eight").is_err());
        assert!(keyword("order 8 9").is_err());
        assert!(keyword("weights 2").is_err());
    }

    #[test]
    fn families() {
        assert_eq!(family("Gauss Legendre").unwrap().1, QuadratureFamily::GaussLegendre);
        assert_eq!(family("square CL").unwrap().1, QuadratureFamily::SquareCL);
        assert!(family("level symmetric 4").is_err());
    }

    #[test]
    fn minimal_block() {
        let config = parse_block("level symmetric\n  order 2\nend").unwrap();
        assert_eq!(config, QuadratureConfig::new(QuadratureFamily::LevelSymmetric, 2));
    }

    #[test]
    fn missing_keywords() {
        assert!(matches!(
            parse_block("double gauss\n  norm 2.0\nend"),
            Err(Error::MissingKeyword("order"))
        ));
        assert!(matches!(
            parse_block("double gauss\n  order 4\n"),
            Err(Error::MissingKeyword("end"))
        ));
        assert!(matches!(
            parse_block("  \n"),
            Err(Error::MissingKeyword("family"))
        ));
    }

    #[test]
    fn unknown_line_reported() {
        match parse_block("gauss legendre\n  order 4\n  shape round\nend") {
            Err(Error::ParseError(line)) => assert_eq!(line, "shape round"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
