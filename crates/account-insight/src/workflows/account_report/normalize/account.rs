/// Canonical `0x`-prefixed lowercase hex form of an account id.
///
/// Decimal ids are converted; ids already in hex (with or without the
/// prefix) are only re-cased. Anything else has no hex form.
pub fn account_hex(account_id: &str) -> Option<String> {
    let trimmed = account_id.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return trimmed.parse::<u128>().ok().map(|id| format!("0x{id:x}"));
    }

    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        Some(format!("0x{}", digits.to_ascii_lowercase()))
    } else {
        None
    }
}
