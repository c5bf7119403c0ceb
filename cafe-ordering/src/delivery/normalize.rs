use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize a place name for matching
///
/// Lowercase, strip diacritics, trim and collapse internal whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Jardim   América "), "jardim america");
        assert_eq!(normalize("JARDIM AMERICA"), "jardim america");
        assert_eq!(normalize("São\tJosé"), "sao jose");
        assert_eq!(normalize("Conceição"), "conceicao");
        assert_eq!(normalize(""), "");
    }
}
