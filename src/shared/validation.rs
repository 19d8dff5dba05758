use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// French postal code: exactly five digits
    /// - Valid: "75001", "13008", "97400"
    /// - Invalid: "7500", "750011", "75 001", "AB123"
    pub static ref POSTAL_CODE_REGEX: Regex = Regex::new(r"^\d{5}$").unwrap();

    /// Phone number: optional leading +, then digits with common separators
    /// - Valid: "01 23 45 67 89", "+33 1 23 45 67 89", "01.23.45.67.89"
    /// - Invalid: "call me", "12", "+33 (0) abc"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 .()\-]{5,19}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_regex() {
        assert!(POSTAL_CODE_REGEX.is_match("75001"));
        assert!(POSTAL_CODE_REGEX.is_match("97400"));
        assert!(!POSTAL_CODE_REGEX.is_match("7500"));
        assert!(!POSTAL_CODE_REGEX.is_match("750011"));
        assert!(!POSTAL_CODE_REGEX.is_match("75 001"));
        assert!(!POSTAL_CODE_REGEX.is_match("AB123"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("01 23 45 67 89"));
        assert!(PHONE_REGEX.is_match("+33 1 23 45 67 89"));
        assert!(PHONE_REGEX.is_match("01.23.45.67.89"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("+33 (0) abc"));
    }
}
