//! Spreadsheet-style column letters
//!
//! Numbers start from 1: 1 = "a", 26 = "z", 27 = "aa", 52 = "az", 53 = "ba".
//! Zero and negative numbers get a leading `!`: 0 = "!a", -1 = "!b".

/// Convert an integer to a lower-case alphabet number
pub fn alphabet_number(n: i32) -> String {
    let mut out = String::new();
    push_alphabet_number(&mut out, n);
    out
}

fn push_alphabet_number(out: &mut String, n: i32) {
    if n <= 0 {
        out.push('!');
        // 1 - n is positive here; widen to avoid overflow at i32::MIN
        push_positive(out, 1 - n as i64);
        return;
    }
    push_positive(out, n as i64);
}

fn push_positive(out: &mut String, n: i64) {
    if n > 26 {
        push_positive(out, (n - 1) / 26);
    }
    let lo = ((n - 1) % 26) as u8;
    out.push((b'a' + lo) as char);
}

/// Inverse of [`alphabet_number`] for positive numbers
///
/// Accepts one or more ASCII letters in either case; returns `None` for
/// anything else or on overflow.
pub fn parse_alphabet_number(letters: &str) -> Option<i32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0i32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_lowercase() as u8 - b'a') as i32 + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}
