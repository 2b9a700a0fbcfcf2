//! Text format for block lists.
//!
//! A block list is a sequence of whitespace-separated `height width depth`
//! triples, usually one per line, read until end of input. Multi-tower
//! instances start with a `count height_limit` header.

use thiserror::Error;

use crate::block::{Block, BlockSet};

/// Errors that can occur when parsing block lists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid number '{token}' at token {position}")]
    InvalidNumber { token: String, position: usize },

    #[error("Block {record} has a zero dimension")]
    ZeroDimension { record: usize },

    #[error("Trailing incomplete block: {found} of 3 values")]
    IncompleteRecord { found: usize },

    #[error("Missing instance header (block count and height limit)")]
    MissingHeader,

    #[error("Header announces {expected} blocks, found {found}")]
    CountMismatch { expected: usize, found: usize },
}

/// Parses a list of blocks.
///
/// # Examples
///
/// ```
/// use u_stacking::codec::parse_blocks;
///
/// let set = parse_blocks("1 2 3\n4 5 6\n").unwrap();
/// assert_eq!(set.len(), 2);
/// ```
pub fn parse_blocks(input: &str) -> Result<BlockSet, ParseError> {
    let values = parse_numbers(input)?;
    blocks_from_values(&values)
}

/// Parses a multi-tower instance: a `count height_limit` header followed by
/// `count` blocks. Returns the height limit and the blocks.
pub fn parse_instance(input: &str) -> Result<(u64, BlockSet), ParseError> {
    let mut tokens = input.split_whitespace();
    let (Some(count), Some(limit)) = (tokens.next(), tokens.next()) else {
        return Err(ParseError::MissingHeader);
    };
    let expected: usize = parse_token(count, 0)?;
    let limit: u64 = parse_token(limit, 1)?;

    let rest: Vec<&str> = tokens.collect();
    let values = rest
        .iter()
        .enumerate()
        .map(|(i, t)| parse_token(t, i + 2))
        .collect::<Result<Vec<u32>, _>>()?;
    let set = blocks_from_values(&values)?;
    if set.len() != expected {
        return Err(ParseError::CountMismatch {
            expected,
            found: set.len(),
        });
    }
    Ok((limit, set))
}

/// Formats blocks one per line, in set order.
pub fn format_blocks(set: &BlockSet) -> String {
    set.iter()
        .map(|(_, b)| format!("{b}\n"))
        .collect()
}

fn parse_numbers(input: &str) -> Result<Vec<u32>, ParseError> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(i, t)| parse_token(t, i))
        .collect()
}

fn parse_token<T: std::str::FromStr>(token: &str, position: usize) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber {
        token: token.to_string(),
        position,
    })
}

fn blocks_from_values(values: &[u32]) -> Result<BlockSet, ParseError> {
    let chunks = values.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        return Err(ParseError::IncompleteRecord {
            found: chunks.remainder().len(),
        });
    }
    chunks
        .enumerate()
        .map(|(record, c)| {
            if c.contains(&0) {
                Err(ParseError::ZeroDimension { record })
            } else {
                Ok(Block::new(c[0], c[1], c[2]))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(BlockSet::new)
}
