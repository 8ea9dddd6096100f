//! Quoting of string values for display and editing.

/// Renders bytes as a double-quoted string.
///
/// Printable ASCII is kept as-is; quotes and backslashes are escaped and all
/// other bytes are written as `\xNN`, so the result is 7-bit clean and can be
/// read back by [`unquote`].
pub fn quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('"');
    out
}

/// Parses user input into string bytes.
///
/// Input wrapped in double quotes is unescaped (`\"`, `\\`, `\xNN`, `\n`,
/// `\t`, `\0`); anything else is taken literally.
pub fn unquote(s: &str) -> Result<Vec<u8>, &'static str> {
    let Some(inner) = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return Ok(s.as_bytes().to_vec());
    };

    let mut out = Vec::with_capacity(inner.len());
    let mut bytes = inner.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'"') => out.push(b'"'),
            Some(b'\\') => out.push(b'\\'),
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'0') => out.push(0),
            Some(b'x') => {
                let hi = bytes.next().ok_or("truncated \\x escape")?;
                let lo = bytes.next().ok_or("truncated \\x escape")?;
                let digits = [hi, lo];
                let text = std::str::from_utf8(&digits).map_err(|_| "bad \\x escape")?;
                out.push(u8::from_str_radix(text, 16).map_err(|_| "bad \\x escape")?);
            }
            _ => return Err("unknown escape sequence"),
        }
    }
    Ok(out)
}
