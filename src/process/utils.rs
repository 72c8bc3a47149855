use std::path::Path;

/// Delimiters the reader is willing to infer, in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// 1) Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// 2) Locale-neutral float parse; non-finite results count as unparseable.
pub fn parse_f64(raw: &str) -> Option<f64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 3) Integer parse that also accepts integral floats such as `"12.0"`.
pub fn parse_i64(raw: &str) -> Option<i64> {
    let s = clean_str(raw);
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    f64_to_i64(parse_f64(s)?)
}

/// Exact float → integer conversion. `i64::MAX as f64` rounds up to 2^63,
/// so the upper bound is exclusive.
pub fn f64_to_i64(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Shortest exact decimal, always with a fractional part (`100` → `"100.0"`).
pub fn format_float(v: f64) -> String {
    let mut s = v.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Picks the most frequent candidate delimiter in `header_line`, falling back to `,`.
pub fn infer_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for &d in &CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == d).count();
        if count > best_count {
            best = d;
            best_count = count;
        }
    }
    best
}

/// Only `.csv` and `.txt` inputs are accepted.
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|os_str| os_str.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt")
        })
}
