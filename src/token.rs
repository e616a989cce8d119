fn is_lower_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// State names are non-empty and drawn from `[a-z0-9]`.
pub fn is_valid_state_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_lower_alnum)
}

/// Alphabet symbols are non-empty and drawn from `[a-z0-9_]`.
pub fn is_valid_symbol_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_lower_alnum(c) || c == '_')
}

#[test]
fn test_state_tokens() {
    assert!(is_valid_state_token("s0"));
    assert!(is_valid_state_token("42"));
    assert!(!is_valid_state_token(""));
    assert!(!is_valid_state_token("S0"));
    assert!(!is_valid_state_token("s_0"));
    assert!(!is_valid_state_token("s 0"));
    assert!(!is_valid_state_token("é"));
}

#[test]
fn test_symbol_tokens() {
    assert!(is_valid_symbol_token("a"));
    assert!(is_valid_symbol_token("go_left"));
    assert!(is_valid_symbol_token("_"));
    assert!(!is_valid_symbol_token(""));
    assert!(!is_valid_symbol_token("a-b"));
    assert!(!is_valid_symbol_token("A"));
}
