//! Display-name parsing and avatar helpers.
//!
//! Raw names arrive as free text ("Mr. James Von Doe III"). The canonical
//! rendering is `"<last>[ <suffix>], <first>[ (<title>)]"`.

use std::fmt;

/// Leading honorifics recognised by [`parse_name`]. Matched case-sensitively.
const TITLES: [&str; 5] = ["Mr.", "Mrs.", "Ms.", "Dr.", "Prof."];

/// Trailing generational suffixes. Matched case-insensitively.
const SUFFIXES: [&str; 7] = ["Jr.", "Sr.", "I", "II", "III", "IV", "V"];

/// A name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedName {
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub suffix: Option<String>,
}

impl fmt::Display for FormattedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.last_name)?;
        if let Some(suffix) = &self.suffix {
            write!(f, " {suffix}")?;
        }
        write!(f, ", {}", self.first_name)?;
        if let Some(title) = &self.title {
            write!(f, " ({title})")?;
        }
        Ok(())
    }
}

/// Outcome of parsing a raw display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    /// Missing, empty or whitespace-only input. Renders as `""`.
    Empty,
    /// Fewer than two name tokens; the raw input is kept verbatim.
    Unparsed(String),
    Parsed(FormattedName),
}

impl fmt::Display for ParsedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Unparsed(raw) => f.write_str(raw),
            Self::Parsed(name) => name.fmt(f),
        }
    }
}

/// Parse a raw display name into title, first, last and suffix parts.
pub fn parse_name(raw: Option<&str>) -> ParsedName {
    let Some(original) = raw else {
        return ParsedName::Empty;
    };
    let trimmed = original.trim();
    if trimmed.is_empty() {
        return ParsedName::Empty;
    }

    let (title, remainder) = split_title(trimmed);
    let tokens: Vec<&str> = remainder.split_whitespace().collect();
    let [first, .., last] = tokens.as_slice() else {
        return ParsedName::Unparsed(original.to_owned());
    };

    let (last_name, suffix) = if is_suffix(last) {
        let middle = &tokens[1..tokens.len() - 1];
        (middle.join(" "), Some((*last).to_owned()))
    } else {
        (tokens[1..].join(" "), None)
    };

    ParsedName::Parsed(FormattedName {
        title: title.map(str::to_owned),
        first_name: (*first).to_owned(),
        last_name,
        suffix,
    })
}

/// Render a raw name in canonical `"Last, First (Title)"` form.
pub fn format_user_name(raw: &str) -> String {
    parse_name(Some(raw)).to_string()
}

fn split_title(name: &str) -> (Option<&'static str>, &str) {
    for title in TITLES {
        if let Some(rest) = name.strip_prefix(title) {
            if rest.starts_with(char::is_whitespace) {
                return (Some(title), rest);
            }
        }
    }
    (None, name)
}

fn is_suffix(token: &str) -> bool {
    SUFFIXES
        .iter()
        .any(|suffix| suffix.eq_ignore_ascii_case(token))
}

/// First character of every whitespace-separated token, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Light or dark presentation palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    fn saturation_lightness(self) -> (u8, u8) {
        match self {
            Self::Light => (65, 55),
            Self::Dark => (75, 45),
        }
    }
}

/// An HSL colour; renders as `hsl(h, s%, l%)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HslColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Deterministic avatar colour for a string.
///
/// Hashes UTF-16 code units left to right with `hash = unit + (hash << 5) - hash`
/// in wrapping 32-bit arithmetic; the hue is `|hash| mod 360`. The empty string
/// hashes to zero, giving hue 0.
pub fn color_from_string(value: &str, mode: ColorMode) -> HslColor {
    let hash = value.encode_utf16().fold(0_i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    let (saturation, lightness) = mode.saturation_lightness();
    HslColor {
        hue: (hash.unsigned_abs() % 360) as u16,
        saturation,
        lightness,
    }
}
