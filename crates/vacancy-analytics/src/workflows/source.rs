use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Wraps `reader` so a leading UTF-8 byte-order mark never reaches the CSV parser.
pub(crate) fn skip_bom<R: Read>(reader: R) -> io::Result<BufReader<R>> {
    let mut buffered = BufReader::new(reader);
    if buffered.fill_buf()?.starts_with(UTF8_BOM) {
        buffered.consume(UTF8_BOM.len());
    }
    Ok(buffered)
}

pub(crate) fn open_csv<P: AsRef<Path>>(path: P) -> io::Result<BufReader<File>> {
    skip_bom(File::open(path)?)
}

/// Builds a headerless, flexible reader: rows of any length come through and
/// callers decide what a malformed row means.
pub(crate) fn raw_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Returns at most the first `count` characters of `value`.
pub(crate) fn char_prefix(value: &str, count: usize) -> &str {
    match value.char_indices().nth(count) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}
