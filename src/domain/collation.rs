//! Locale-aware string ordering and the last-name sort.
//!
//! Keys compare in three levels the way a root-locale collator does: base
//! letters first (accents and case ignored), then accents, then case with
//! lowercase ahead of uppercase. The raw string breaks any remaining tie.
//! Letters such as `ł`, `ø` and `ß` have no decomposition, so they are folded
//! onto their base letters by hand.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::name::format_user_name;
use super::user::UserRecord;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: String,
    /// Accents per base letter, in string order.
    secondary: Vec<Vec<char>>,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let mut primary = String::with_capacity(text.len());
        let mut secondary: Vec<Vec<char>> = Vec::with_capacity(text.len());
        let mut tertiary = Vec::with_capacity(text.len());

        for c in text.nfd() {
            if is_combining_mark(c) {
                match secondary.last_mut() {
                    Some(marks) => marks.push(c),
                    None => secondary.push(vec![c]),
                }
                continue;
            }
            tertiary.push(c.is_uppercase());
            match fold_letter(c) {
                Some(base) => {
                    // The letter itself weighs like an accent on its base.
                    primary.push_str(base);
                    secondary.push(c.to_lowercase().collect());
                }
                None => {
                    primary.extend(c.to_lowercase());
                    secondary.push(Vec::new());
                }
            }
        }

        Self {
            primary,
            secondary,
            tertiary,
            raw: text.to_owned(),
        }
    }
}

/// Base letters for Latin letters that have no canonical decomposition.
fn fold_letter(c: char) -> Option<&'static str> {
    let base = match c {
        'ł' | 'Ł' => "l",
        'ø' | 'Ø' => "o",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'ħ' | 'Ħ' => "h",
        'ŧ' | 'Ŧ' => "t",
        'ı' => "i",
        'ŀ' | 'Ŀ' => "l",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ß' | 'ẞ' => "ss",
        'þ' | 'Þ' => "th",
        _ => return None,
    };
    Some(base)
}

/// The portion of the formatted name before the first comma.
pub fn last_name_key(raw_name: &str) -> String {
    let formatted = format_user_name(raw_name);
    match formatted.split_once(',') {
        Some((last, _)) => last.to_owned(),
        None => formatted,
    }
}

/// Return a new list ordered by formatted last name. The input is untouched.
pub fn sort_by_last_name(users: &[UserRecord]) -> Vec<UserRecord> {
    let mut sorted = users.to_vec();
    sorted.sort_by_cached_key(|user| CollationKey::new(&last_name_key(&user.name)));
    sorted
}
