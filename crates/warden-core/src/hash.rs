use xxhash_rust::xxh64::xxh64;

const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode a u64 value as a base62 string (11 chars, zero-padded).
fn base62_encode(mut value: u64) -> String {
    let mut result = Vec::with_capacity(11);
    while value > 0 {
        let idx = (value % 62) as usize;
        result.push(BASE62_CHARS[idx] as char);
        value /= 62;
    }
    while result.len() < 11 {
        result.push('0');
    }
    result.into_iter().rev().collect()
}

/// Compute the warden hash identifying one function's source of record.
///
/// hash = base62(xxhash64(language + function_name + source))
///
/// Editing the source (or moving the function to another language unit) yields a
/// different hash, so cached call graphs are never reused for changed code.
pub fn compute_source_hash(language: &str, function_name: &str, source: &str) -> String {
    let mut input =
        String::with_capacity(language.len() + function_name.len() + source.len() + 2);
    input.push_str(language);
    input.push('\0');
    input.push_str(function_name);
    input.push('\0');
    input.push_str(source);

    base62_encode(xxh64(input.as_bytes(), 0))
}
