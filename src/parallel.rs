//! Parallel batch parsing
//!
//! Uses Rayon to parse many independent buffers at once. Each document is
//! still built by a single thread; results come back in input order.

use rayon::prelude::*;

use crate::core::{parse, parse_read_only};
use crate::dom::Document;
use crate::error::ParseError;
use crate::options::ParseOptions;

/// Parse writable buffers in parallel
pub fn parse_batch<'a>(
    buffers: Vec<&'a mut [u8]>,
    options: ParseOptions,
) -> Vec<Result<Document<'a>, ParseError<'a>>> {
    buffers
        .into_par_iter()
        .map(|buf| parse(buf, options))
        .collect()
}

/// Parse shared buffers in parallel without writing to them
pub fn parse_batch_read_only<'a>(
    buffers: &[&'a [u8]],
    options: ParseOptions,
) -> Vec<Result<Document<'a>, ParseError<'a>>> {
    buffers
        .par_iter()
        .map(|&buf| parse_read_only(buf, options))
        .collect()
}

/// Parse shared buffers in parallel and reduce each result with `mapper`
///
/// Documents are dropped on the worker thread once mapped.
pub fn parse_map<F, T>(buffers: &[&[u8]], options: ParseOptions, mapper: F) -> Vec<T>
where
    F: for<'a> Fn(Result<Document<'a>, ParseError<'a>>) -> T + Sync + Send,
    T: Send,
{
    buffers
        .par_iter()
        .map(|&buf| mapper(parse_read_only(buf, options)))
        .collect()
}
