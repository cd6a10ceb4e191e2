const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Canonical comparison form of a human-entered player name.
///
/// Lowercases, folds quote and punctuation variants, splits hyphenated names,
/// drops invisible characters and generational suffixes. Diacritics are kept
/// as-is; alias entries bridge accented and unaccented spellings.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut folded = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        match ch {
            '\u{2019}' | '\u{2018}' | '\u{00b4}' | '\u{201b}' | '`' => folded.push('\''),
            '"' | '\u{201e}' | '\u{201c}' | '\u{201d}' | '\u{201a}' => folded.push(' '),
            '.' | ',' | ';' | ':' | '(' | ')' => folded.push(' '),
            '-' => folded.push(' '),
            '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}' | '\u{feff}' => {}
            other => folded.push(other),
        }
    }

    folded
        .split_whitespace()
        .filter(|token| !NAME_SUFFIXES.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last whitespace-delimited token of an already normalized name.
pub fn surname_token(normalized: &str) -> Option<&str> {
    normalized.split(' ').rfind(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, surname_token};

    #[test]
    fn strips_suffix_tokens_and_punctuation() {
        assert_eq!(normalize_name("Jordan Poole Jr."), normalize_name("jordan poole"));
        assert_eq!(normalize_name("  Gary Trent Jr. "), "gary trent");
        assert_eq!(normalize_name("Robert Williams III"), "robert williams");
        assert_eq!(normalize_name("Jaren Jackson, Jr"), "jaren jackson");
    }

    #[test]
    fn keeps_suffix_like_substrings_inside_words() {
        assert_eq!(normalize_name("Ivica Zubac"), "ivica zubac");
        assert_eq!(normalize_name("Vince Williams"), "vince williams");
        assert_eq!(normalize_name("Jrue Holiday"), "jrue holiday");
    }

    #[test]
    fn folds_quotes_hyphens_and_invisible_chars() {
        assert_eq!(normalize_name("De\u{2019}Aaron Fox"), "de'aaron fox");
        assert_eq!(normalize_name("Shai Gilgeous-Alexander"), "shai gilgeous alexander");
        assert_eq!(normalize_name("\u{201e}Nikola\u{201c} Jokic"), "nikola jokic");
        assert_eq!(normalize_name("Jay\u{200b}son Tatum"), "jayson tatum");
        assert_eq!(normalize_name("P.J. Washington"), "p j washington");
    }

    #[test]
    fn keeps_diacritics() {
        assert_eq!(normalize_name("Vít Krejčí"), "vít krejčí");
        assert_eq!(normalize_name("JAKOB PÖLTL"), "jakob pöltl");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "Jordan Poole Jr.",
            "  Kelly Oubre  Jr ",
            "D\u{2019}Angelo Russell",
            "Jalen Hood-Schifino",
            "(V.J.) Edgecombe",
            "v",
            "",
            "\u{200d}",
            "Tazé Moore II",
        ];
        for sample in samples {
            let once = normalize_name(sample);
            assert_eq!(normalize_name(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn never_fails_on_empty_or_suffix_only_input() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("Jr. III"), "");
    }

    #[test]
    fn surname_is_last_token() {
        assert_eq!(surname_token("joel embiid"), Some("embiid"));
        assert_eq!(surname_token("embiid"), Some("embiid"));
        assert_eq!(surname_token(""), None);
    }
}
