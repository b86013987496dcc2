/// Collect field names whose value is missing or blank. Returns None when all
/// required fields are present.
pub fn missing_fields<'a>(
    fields: &[(&'a str, Option<&str>)],
) -> Option<Vec<&'a str>> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() { None } else { Some(missing) }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    match parts.next() {
        Some(domain) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// At least 6 characters.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 6
}
