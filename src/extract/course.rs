//! Course identifier normalization.
//!
//! Spoken course names arrive in forms like "Computer Science one thirty"
//! or "Statistics 160A". Normalization is best-effort: spelled numbers are
//! converted token by token, then a trailing "major name + number" pattern
//! is rewritten to the department's short code.

/// Major name → department prefix. Lookup is case-sensitive exact match;
/// the same table is embedded in the extraction prompt to bias the model
/// toward these spellings.
pub const MAJOR_PREFIXES: &[(&str, &str)] = &[
    ("Computer Science", "CMPSC"),
    ("Statistics", "PSTAT"),
    ("Probability and Statistics", "PSTAT"),
    ("Mathematics", "MATH"),
    ("Physics", "PHYS"),
    ("Chemistry", "CHEM"),
    ("Biology", "BIOL"),
    ("Economics", "ECON"),
    ("Electrical Engineering", "ECE"),
    ("Mechanical Engineering", "ME"),
    ("Communication", "COMM"),
    ("Psychology", "PSY"),
    ("History", "HIST"),
    ("Philosophy", "PHIL"),
    ("Linguistics", "LING"),
];

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Normalize one extracted course string to a `<PREFIX><NUMBER><LETTER?>`
/// token. Strings that don't fit the pattern are returned unchanged.
pub fn normalize_course(raw: &str) -> String {
    let converted = convert_spelled_numbers(raw);
    rewrite_trailing_course(&converted)
}

/// Convert runs of spelled number words to concatenated digits:
/// "one thirty" becomes "130". Tokens that are already numeric or mixed
/// alphanumeric pass through unchanged; a token that looks like a number
/// compound but fails to convert leaves the whole string unchanged.
pub fn convert_spelled_numbers(s: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut run: Option<String> = None;

    for token in s.split_whitespace() {
        match classify_token(token) {
            SpelledToken::Number(digits) => {
                run.get_or_insert_with(String::new).push_str(&digits);
            }
            SpelledToken::Word => {
                if let Some(done) = run.take() {
                    out.push(done);
                }
                out.push(token.to_string());
            }
            SpelledToken::Invalid => return s.to_string(),
        }
    }

    if let Some(done) = run.take() {
        out.push(done);
    }

    out.join(" ")
}

enum SpelledToken {
    /// A spelled number, converted to its digit string
    Number(String),
    /// An ordinary word (or an already-numeric token), kept as-is
    Word,
    /// A number-like compound that could not be converted
    Invalid,
}

fn classify_token(token: &str) -> SpelledToken {
    // Numeric or mixed alphanumeric tokens ("130", "160A") pass through
    if token.chars().any(|c| c.is_ascii_digit()) {
        return SpelledToken::Word;
    }

    let lower = token.to_lowercase();

    if let Some(value) = number_word(&lower) {
        return SpelledToken::Number(value.to_string());
    }

    // Hyphenated compounds: "twenty-five" -> 25. If the first part is a
    // number word the whole token must convert, otherwise bail out.
    if let Some((tens, unit)) = lower.split_once('-') {
        if let Some(tens_value) = number_word(tens) {
            match number_word(unit) {
                Some(unit_value) if tens_value >= 20 && unit_value < 10 => {
                    return SpelledToken::Number((tens_value + unit_value).to_string());
                }
                _ => return SpelledToken::Invalid,
            }
        }
    }

    SpelledToken::Word
}

fn number_word(word: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| *v)
}

/// Rewrite a trailing "major name + number(+letter)" to the short code.
/// Unmapped majors fall back to their upper-cased literal text; strings
/// with no trailing number are returned unchanged.
fn rewrite_trailing_course(s: &str) -> String {
    let Some((major, number, letter)) = split_trailing_number(s) else {
        return s.to_string();
    };

    let prefix = MAJOR_PREFIXES
        .iter()
        .find(|(name, _)| *name == major)
        .map(|(_, prefix)| *prefix);

    match prefix {
        Some(prefix) => format!("{}{}{}", prefix, number, letter.to_uppercase()),
        None => format!("{}{}{}", major.to_uppercase(), number, letter.to_uppercase()),
    }
}

fn split_trailing_number(s: &str) -> Option<(&str, &str, &str)> {
    let s = s.trim();
    let split = s.rfind(' ')?;
    let major = s[..split].trim_end();
    let tail = &s[split + 1..];

    if major.is_empty() || tail.is_empty() {
        return None;
    }

    let digits_end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    if digits_end == 0 {
        return None;
    }

    let (number, letter) = tail.split_at(digits_end);
    if letter.len() > 1 || !letter.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some((major, number, letter))
}
