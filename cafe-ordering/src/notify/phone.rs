//! Phone normalization and deep-link construction

/// Normalize a phone number to a country-coded digit string (MSISDN)
///
/// - non-digits are stripped
/// - already country-coded (prefix + 12..=13 digits) is kept as-is
/// - a leading trunk zero is dropped before prepending the country code
/// - anything else (national numbers, odd lengths) gets the country code
///   prepended to the digits as they are
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }

    if digits.starts_with(country_code) && (12..=13).contains(&digits.len()) {
        return digits;
    }

    if digits.starts_with('0') {
        let national = digits.trim_start_matches('0');
        if (10..=11).contains(&national.len()) {
            return format!("{}{}", country_code, national);
        }
    }

    format!("{}{}", country_code, digits)
}

/// `https://<host>/<msisdn>?text=<url-encoded message>`
pub fn build_deep_link(host: &str, msisdn: &str, message: &str) -> String {
    format!(
        "https://{}/{}?text={}",
        host.trim_end_matches('/'),
        msisdn,
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trunk_zero_is_dropped() {
        assert_eq!(normalize_phone("011987654321", "55"), "5511987654321");
        assert_eq!(normalize_phone("(011) 98765-4321", "55"), "5511987654321");
    }

    #[test]
    fn test_national_numbers_get_country_code() {
        assert_eq!(normalize_phone("11987654321", "55"), "5511987654321");
        assert_eq!(normalize_phone("1132654321", "55"), "551132654321");
    }

    #[test]
    fn test_already_country_coded() {
        assert_eq!(normalize_phone("+55 11 98765-4321", "55"), "5511987654321");
        assert_eq!(normalize_phone("551132654321", "55"), "551132654321");
    }

    #[test]
    fn test_best_effort_fallback() {
        assert_eq!(normalize_phone("98765", "55"), "5598765");
        assert_eq!(normalize_phone("0098765", "55"), "550098765");
        assert_eq!(normalize_phone("abc", "55"), "");
    }

    #[test]
    fn test_deep_link_encodes_message() {
        let url = build_deep_link("wa.me", "5511987654321", "Pedido #12\nTotal: R$ 21,00");
        assert_eq!(
            url,
            "https://wa.me/5511987654321?text=Pedido%20%2312%0ATotal%3A%20R%24%2021%2C00"
        );
    }
}
