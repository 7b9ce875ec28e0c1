//! Minimal RTF to plain text conversion.

/// Destinations whose content is never text.
const SKIPPED_DESTINATIONS: [&str; 11] = [
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
];

#[derive(Clone, Copy)]
struct Group {
    skip: bool,
    /// Characters to drop after a `\uN` escape.
    uc: usize,
}

/// Strip RTF control words and groups, keeping paragraph breaks.
pub fn rtf_to_text(rtf: &str) -> String {
    let chars: Vec<char> = rtf.chars().collect();
    let mut out = String::new();
    let mut stack: Vec<Group> = Vec::new();
    let mut group = Group { skip: false, uc: 1 };
    let mut pending_skip = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' => {
                stack.push(group);
                i += 1;
            }
            '}' => {
                group = stack.pop().unwrap_or(Group { skip: false, uc: 1 });
                i += 1;
            }
            '\\' => {
                i += 1;
                let Some(&next) = chars.get(i) else { break };

                if next == '\'' {
                    let hex: String = chars.iter().skip(i + 1).take(2).collect();
                    i += 1 + hex.len();
                    if pending_skip > 0 {
                        pending_skip -= 1;
                    } else if !group.skip {
                        if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                            out.push(decode_cp1252(byte));
                        }
                    }
                    continue;
                }

                if !next.is_ascii_alphabetic() {
                    // Control symbol: \\ \{ \} \~ \* and friends.
                    match next {
                        '*' => group.skip = true,
                        '~' if !group.skip => out.push(' '),
                        '\\' | '{' | '}' if !group.skip => out.push(next),
                        _ => {}
                    }
                    i += 1;
                    continue;
                }

                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();

                let num_start = i;
                if i < chars.len() && chars[i] == '-' {
                    i += 1;
                }
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let param: Option<i32> = chars[num_start..i].iter().collect::<String>().parse().ok();
                if i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }

                if SKIPPED_DESTINATIONS.contains(&word.as_str()) {
                    group.skip = true;
                    continue;
                }
                if group.skip {
                    continue;
                }

                match word.as_str() {
                    "par" | "line" | "sect" | "page" => out.push('\n'),
                    "tab" | "cell" => out.push('\t'),
                    "row" => out.push('\n'),
                    "uc" => group.uc = param.unwrap_or(1).max(0) as usize,
                    "u" => {
                        if let Some(code) = param {
                            let code = if code < 0 { code + 65_536 } else { code };
                            if let Some(ch) = char::from_u32(code as u32) {
                                out.push(ch);
                            }
                            pending_skip = group.uc;
                        }
                    }
                    "emdash" => out.push('\u{2014}'),
                    "endash" => out.push('\u{2013}'),
                    "lquote" => out.push('\u{2018}'),
                    "rquote" => out.push('\u{2019}'),
                    "ldblquote" => out.push('\u{201c}'),
                    "rdblquote" => out.push('\u{201d}'),
                    "bullet" => out.push('\u{2022}'),
                    _ => {}
                }
            }
            '\r' | '\n' => i += 1,
            _ => {
                if pending_skip > 0 {
                    pending_skip -= 1;
                } else if !group.skip {
                    out.push(c);
                }
                i += 1;
            }
        }
    }

    out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n").trim().to_string()
}

/// Windows-1252 byte to char; the 0x80..0x9F block differs from Latin-1.
fn decode_cp1252(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8d}', 'Ž', '\u{8f}', '\u{90}', '‘',
        '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{9d}', 'ž', 'Ÿ',
    ];
    match byte {
        0x80..=0x9f => HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}
