//! Read and write pipelines.
//!
//! Reading runs `Unopened → HeaderValidated → Decompressed → TablesParsed →
//! Ready`; writing runs `Built → BodyEncoded → Compressed → HeaderRendered →
//! Written`. A failure at any stage moves to `Failed` and returns the error.
//! Nothing partial is handed back: no `RateFile` from a failed read, no
//! bytes from a failed write.

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use log::{debug, trace};
use ratefile_buffers::Writer;

use crate::config::CodecOptions;
use crate::error::Result;
use crate::model::RateFile;
use crate::{group, header, nxx, price, rle, surcharge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Unopened,
    HeaderValidated,
    Decompressed,
    TablesParsed,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Built,
    BodyEncoded,
    Compressed,
    HeaderRendered,
    Written,
    Failed,
}

fn advance<S: Debug>(state: &mut S, next: S) {
    trace!("{state:?} -> {next:?}");
    *state = next;
}

/// Decodes a complete rate file with default options.
pub fn decode(file: &[u8]) -> Result<RateFile> {
    decode_with(file, &CodecOptions::default())
}

pub fn decode_with(file: &[u8], options: &CodecOptions) -> Result<RateFile> {
    let mut state = ReadState::Unopened;
    let result = decode_stages(file, options, &mut state);
    if let Err(err) = &result {
        trace!("read failed in {state:?}: {err}");
        advance(&mut state, ReadState::Failed);
    }
    result
}

fn decode_stages(file: &[u8], options: &CodecOptions, state: &mut ReadState) -> Result<RateFile> {
    let info = header::validate(file)?;
    let layout = info.layout();
    advance(state, ReadState::HeaderValidated);

    let body = rle::decompress(&file[crate::HEADER_LEN..])?;
    advance(state, ReadState::Decompressed);

    let surcharges = surcharge::decode(&body, layout)?;
    let prices = price::decode(&body, layout, options)?;
    let groups = group::decode(&body, layout)?;
    let nxx = nxx::decode(&body, layout)?;
    advance(state, ReadState::TablesParsed);

    let rate_file = RateFile::from_parts(info.header, surcharges, prices, groups, nxx);
    advance(state, ReadState::Ready);
    Ok(rate_file)
}

/// Encodes a rate file with default options.
pub fn encode(rate_file: &RateFile) -> Result<Vec<u8>> {
    encode_with(rate_file, &CodecOptions::default())
}

pub fn encode_with(rate_file: &RateFile, options: &CodecOptions) -> Result<Vec<u8>> {
    let mut state = WriteState::Built;
    let result = encode_stages(rate_file, options, &mut state);
    if let Err(err) = &result {
        trace!("write failed in {state:?}: {err}");
        advance(&mut state, WriteState::Failed);
    }
    result
}

/// Lays the body out as groups, then prices, then NXX records, and only
/// renders the header once the compressed body is final.
fn encode_stages(
    rate_file: &RateFile,
    options: &CodecOptions,
    state: &mut WriteState,
) -> Result<Vec<u8>> {
    rate_file.check()?;
    let layout = rate_file.header().version.layout();

    let mut body = Writer::with_len(layout.min_body_len);
    surcharge::encode(rate_file.surcharges(), &mut body, layout);
    let price_base = group::encode(rate_file.groups(), &mut body, layout)?;
    let nxx_base = price::encode(rate_file.prices(), &mut body, layout, price_base)?;
    let end = nxx::encode(rate_file.nxx(), &mut body, layout, nxx_base, options)?;
    body.ensure_len(end);
    let body = body.flush();
    advance(state, WriteState::BodyEncoded);

    let compressed = rle::compress(&body);
    advance(state, WriteState::Compressed);

    let mut out = header::render(rate_file.header(), body.len())?;
    advance(state, WriteState::HeaderRendered);

    out.extend_from_slice(&compressed);
    debug!(
        "encoded rate file: body {} bytes, {} compressed",
        body.len(),
        compressed.len()
    );
    advance(state, WriteState::Written);
    Ok(out)
}

/// Reads and decodes the rate file at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<RateFile> {
    read_file_with(path, &CodecOptions::default())
}

pub fn read_file_with(path: impl AsRef<Path>, options: &CodecOptions) -> Result<RateFile> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    decode_with(&bytes, options)
}

/// Encodes `rate_file` and writes it to `path`. The file is only created
/// once encoding has succeeded.
pub fn write_file(rate_file: &RateFile, path: impl AsRef<Path>) -> Result<()> {
    write_file_with(rate_file, path, &CodecOptions::default())
}

pub fn write_file_with(
    rate_file: &RateFile,
    path: impl AsRef<Path>,
    options: &CodecOptions,
) -> Result<()> {
    let bytes = encode_with(rate_file, options)?;
    let path = path.as_ref();
    fs::write(path, &bytes)?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Serializes a rate file to pretty-printed JSON.
pub fn to_json(rate_file: &RateFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(rate_file)?)
}

/// Parses a rate file from JSON and checks its field widths.
pub fn from_json(json: &str) -> Result<RateFile> {
    let rate_file: RateFile = serde_json::from_str(json)?;
    rate_file.check()?;
    Ok(rate_file)
}

pub fn read_json_file(path: impl AsRef<Path>) -> Result<RateFile> {
    from_json(&fs::read_to_string(path)?)
}

pub fn write_json_file(rate_file: &RateFile, path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(rate_file)?;
    fs::write(path, json)?;
    Ok(())
}
