//! Zero-run compression used for the rate file body.
//!
//! A zero byte is an escape: the byte after it is a count `N` and the pair
//! stands for `N` zero bytes. Every other byte is a literal. Counts fit in
//! one byte, so longer runs are split into several escapes.

use crate::error::{RateFileError, Result};

const ESCAPE: u8 = 0x00;
const MAX_RUN: usize = u8::MAX as usize;

/// Expands a compressed body.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte == ESCAPE {
            let n = run_len(input, i)?;
            out.resize(out.len() + n, 0);
            i += 2;
        } else {
            out.push(byte);
            i += 1;
        }
    }
    Ok(out)
}

/// Length `decompress` would produce, without building the output.
pub fn decoded_len(input: &[u8]) -> Result<usize> {
    let mut len = 0;
    let mut i = 0;
    while i < input.len() {
        if input[i] == ESCAPE {
            len += run_len(input, i)?;
            i += 2;
        } else {
            len += 1;
            i += 1;
        }
    }
    Ok(len)
}

fn run_len(input: &[u8], escape_at: usize) -> Result<usize> {
    input
        .get(escape_at + 1)
        .map(|&n| n as usize)
        .ok_or(RateFileError::TruncatedData {
            offset: escape_at,
            needed: 2,
            available: input.len() - escape_at,
        })
}

/// Compresses a decompressed body.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] != ESCAPE {
            out.push(input[i]);
            i += 1;
            continue;
        }
        let start = i;
        while i < input.len() && input[i] == ESCAPE {
            i += 1;
        }
        let mut run = i - start;
        while run > 0 {
            let n = run.min(MAX_RUN);
            out.push(ESCAPE);
            out.push(n as u8);
            run -= n;
        }
    }
    out
}
