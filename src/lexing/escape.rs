use std::iter::Peekable;
use std::str::Chars;

fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'a' => Some('\x07'),
        'v' => Some('\x0B'),
        'b' => Some('\x08'),
        'f' => Some('\x0C'),
        _ => None,
    }
}

/// Resolves C-style backslash escapes in a string literal body.
///
/// Numeric escapes (`\x41`, `\101`) produce the code point with the same
/// number, octal values wrap to a byte. Unknown escapes yield the escaped
/// character itself and a trailing lone backslash is dropped.
pub fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let esc = match chars.next() {
            Some(esc) => esc,
            None => break,
        };
        if let Some(resolved) = resolve_escape(esc) {
            result.push(resolved);
        } else if esc == 'x' && chars.peek().map_or(false, |c| c.is_ascii_hexdigit()) {
            let value = take_digits(&mut chars, 0, 16, 2);
            result.push(char::from(value as u8));
        } else if let Some(first) = esc.to_digit(8) {
            let value = take_digits(&mut chars, first, 8, 2);
            result.push(char::from((value & 0xFF) as u8));
        } else {
            result.push(esc);
        }
    }

    result
}

fn take_digits(chars: &mut Peekable<Chars>, initial: u32, radix: u32, max: usize) -> u32 {
    let mut value = initial;
    for _ in 0..max {
        match chars.peek().and_then(|c| c.to_digit(radix)) {
            Some(digit) => {
                value = value * radix + digit;
                chars.next();
            }
            None => break,
        }
    }
    value
}
