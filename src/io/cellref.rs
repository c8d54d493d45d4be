//! A1-style cell references as used in worksheet XML (`B12`, `A1:C3`).

/// Split `B12` into a zero-based column index and a one-based row number.
pub fn parse(reference: &str) -> Option<(usize, u32)> {
    let reference = reference.trim_start_matches('$');
    let split = reference.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let row: u32 = digits.trim_start_matches('$').parse().ok()?;
    if row == 0 {
        return None;
    }
    let column = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A') as usize + 1);
    Some((column - 1, row))
}

/// Column letters for a zero-based column index (`0` → `A`, `27` → `AB`).
pub fn column_name(mut column: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

pub fn format(column: usize, row: u32) -> String {
    format!("{}{}", column_name(column), row)
}

/// Rewrite the row numbers of a reference or range (`A5`, `A5:C7`) through `map`.
/// Parts that are not cell references are kept unchanged.
pub fn map_rows<F: Fn(u32) -> u32>(reference: &str, map: F) -> String {
    reference
        .split(':')
        .map(|part| match parse(part) {
            Some((column, row)) => format(column, map(row)),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Move every relative row reference in a formula down by `delta` rows.
///
/// Absolute rows (`A$1`), string literals, function names such as `LOG10(` and
/// references into other sheets keep their text apart from the row shift.
pub fn shift_formula_rows(formula: &str, delta: u32) -> String {
    let bytes = formula.as_bytes();
    let mut out = String::with_capacity(formula.len());
    let mut i = 0;
    let mut copied = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' {
            // string literal, `""` escapes a quote
            i += 1;
            while i < bytes.len() {
                if bytes[i] == b'"' {
                    if bytes.get(i + 1) == Some(&b'"') {
                        i += 2;
                        continue;
                    }
                    break;
                }
                i += 1;
            }
            i += 1;
            continue;
        }
        let at_boundary = i == 0 || !is_name_byte(bytes[i - 1]);
        if at_boundary && (b == b'$' || b.is_ascii_alphabetic()) {
            if let Some((row_start, end)) = relative_row(bytes, i) {
                if let Ok(row) = formula[row_start..end].parse::<u32>() {
                    out.push_str(&formula[copied..row_start]);
                    out.push_str(&(row + delta).to_string());
                    copied = end;
                }
                i = end;
                continue;
            }
            // skip the rest of a name so its digits are not read as a row
            while i < bytes.len() && is_name_byte(bytes[i]) {
                i += 1;
            }
            continue;
        }
        i += 1;
    }
    out.push_str(&formula[copied.min(formula.len())..]);
    out
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$')
}

/// Span of the row digits of a cell reference starting at `start`, when the
/// row is relative.
fn relative_row(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let mut i = start;
    if bytes[i] == b'$' {
        i += 1;
    }
    let letters = i;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    if i == letters || i - letters > 3 || bytes.get(i) == Some(&b'$') {
        return None;
    }
    let digits = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits {
        return None;
    }
    match bytes.get(i) {
        Some(&b) if is_name_byte(b) || matches!(b, b'(' | b'!') => None,
        _ => Some((digits, i)),
    }
}
