use std::fs;

use nom::IResult;
use nom::bytes::complete::tag;
use nom::branch::alt;
use nom::character::complete::{digit1, space0, space1, not_line_ending};
use nom::combinator::{map_res, eof};
use nom::sequence::{preceded, separated_pair, terminated, tuple};

use crate::color::VertexId;
use crate::error::{ColoringError, Result};


/** reads an instance from file, returns (n,m,edges).
Edges are translated to 0-based indices.
*/
pub fn read_from_file(filename:&str) -> Result<(usize, usize, Vec<(VertexId,VertexId)>)> {
    let content = fs::read_to_string(filename)?;
    parse_dimacs(&content)
}

/** parses the content of a DIMACS file, returns (n,m,edges) */
pub fn parse_dimacs(content:&str) -> Result<(usize, usize, Vec<(VertexId,VertexId)>)> {
    let mut header:Option<(usize,usize)> = None;
    let mut edges = Vec::new();
    for (line_number, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || is_comment(line) { continue; }
        if line.starts_with('p') {
            if header.is_some() {
                return Err(parse_error(line_number, "header defined twice"));
            }
            let (_,h) = read_header(line)
                .map_err(|_| parse_error(line_number, "malformed header"))?;
            header = Some(h);
        } else if line.starts_with('e') {
            let (n,_) = header.ok_or_else(|| parse_error(line_number, "edge before header"))?;
            let (_,(a,b)) = read_edge(line)
                .map_err(|_| parse_error(line_number, "malformed edge"))?;
            // WARNING: indices start at 1 in the DIMACS format
            if a == 0 || b == 0 || a > n || b > n {
                return Err(parse_error(line_number, "edge endpoint out of range"));
            }
            edges.push((a-1, b-1));
        } // other descriptors (n, x, ...) are not needed for coloring
    }
    let (n,m) = header.ok_or_else(|| ColoringError::Parse("missing header".to_string()))?;
    // some files count each edge twice
    if edges.len() != m && 2*edges.len() != m {
        return Err(ColoringError::Parse(
            format!("header announces {} edges, found {}", m, edges.len())
        ));
    }
    Ok((n, m, edges))
}

fn parse_error(line_number:usize, reason:&str) -> ColoringError {
    ColoringError::Parse(format!("line {}: {}", line_number+1, reason))
}

/// true if the line is a comment
fn is_comment(s:&str) -> bool {
    let res:IResult<&str,&str> = preceded(tag("c"), not_line_ending)(s);
    res.is_ok()
}

/// reads a non-negative integer
fn read_integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces, followed by the end of the line
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(
        separated_pair(read_integer, space1, read_integer),
        tuple((space0, eof))
    )(s)
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(
        tuple((tag("p"), space1, alt((tag("edge"), tag("col"))), space1)),
        read_two_integers
    )(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tuple((tag("e"), space1)), read_two_integers)(s)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1";
        assert_eq!(read_header(s).unwrap().1, (2,1));
        assert_eq!(read_header(s).unwrap().0, "");
    }

    #[test]
    fn test_read_header_col() {
        let s = "p col 12 30";
        assert_eq!(read_header(s).unwrap().1, (12,30));
        assert!(read_header("p graph 2 1").is_err());
    }

    #[test]
    fn test_read_edge() {
        assert_eq!(read_edge("e 1 2").unwrap().1, (1,2));
        assert_eq!(read_edge("e  10   3 ").unwrap().1, (10,3));
        assert!(read_edge("e 1").is_err());
        assert!(read_edge("e 1 2 3").is_err());
    }

    #[test]
    fn test_parse_square() {
        let s = "c this is a test comment\nc another\np edge 4 4\ne 1 2\ne 2 3\r\ne 3 4\n\ne 4 1\n";
        let (n,m,edges) = parse_dimacs(s).unwrap();
        assert_eq!((n,m), (4,4));
        assert_eq!(edges, vec![(0,1),(1,2),(2,3),(3,0)]);
    }

    #[test]
    fn test_parse_doubled_edges() {
        let s = "p edge 2 2\ne 1 2\n";
        assert_eq!(parse_dimacs(s).unwrap().2, vec![(0,1)]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_dimacs("e 1 2\n"), Err(ColoringError::Parse(_))));
        assert!(matches!(parse_dimacs("c nothing\n"), Err(ColoringError::Parse(_))));
        assert!(matches!(parse_dimacs("p edge 2 1\ne 1 3\n"), Err(ColoringError::Parse(_))));
        assert!(matches!(parse_dimacs("p edge 3 5\ne 1 3\n"), Err(ColoringError::Parse(_))));
        assert!(matches!(parse_dimacs("p edge 3 1\ne 1 x\n"), Err(ColoringError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_from_file("this/file/does/not/exist.col"),
            Err(ColoringError::Io(_))
        ));
    }
}
