use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Alphabet partitions the gallery can be narrowed to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LetterGroup {
    #[strum(to_string = "AF", serialize = "A-F")]
    AF,
    #[strum(to_string = "GL", serialize = "G-L")]
    GL,
    #[strum(to_string = "MR", serialize = "M-R")]
    MR,
    #[strum(to_string = "SZ", serialize = "S-Z")]
    SZ,
}

impl LetterGroup {
    pub fn letters(self) -> &'static [&'static str] {
        match self {
            LetterGroup::AF => &["a", "b", "c", "d", "e", "f"],
            LetterGroup::GL => &["g", "h", "i", "j", "k", "l"],
            LetterGroup::MR => &["m", "n", "o", "p", "q", "r"],
            LetterGroup::SZ => &["s", "t", "u", "v", "w", "x", "y", "z"],
        }
    }

    pub fn all() -> Vec<LetterGroup> {
        LetterGroup::iter().collect()
    }
}

/// Letters of the given groups, in group order
pub fn active_letters(groups: &[LetterGroup]) -> Vec<&'static str> {
    groups.iter().flat_map(|g| g.letters().iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("AF", LetterGroup::AF)]
    #[case("af", LetterGroup::AF)]
    #[case("A-F", LetterGroup::AF)]
    #[case("g-l", LetterGroup::GL)]
    #[case("MR", LetterGroup::MR)]
    #[case("sz", LetterGroup::SZ)]
    fn test_parse(#[case] input: &str, #[case] expected: LetterGroup) {
        assert_eq!(LetterGroup::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(LetterGroup::from_str("AZ").is_err());
    }

    #[test]
    fn test_groups_cover_alphabet_once() {
        let letters = active_letters(&LetterGroup::all());
        assert_eq!(letters.len(), 26);
        assert_eq!(letters.concat(), "abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn test_display_and_serde_names() {
        assert_eq!(LetterGroup::SZ.to_string(), "SZ");
        assert_eq!(serde_json::to_string(&LetterGroup::GL).unwrap(), "\"GL\"");
    }
}
