/// Words rendered in a fixed spelling rather than title case.
const SPECIAL_WORDS: &[(&str, &str)] = &[
    ("vat", "VAT"),
    ("trn", "TRN"),
    ("id", "ID"),
    ("sku", "SKU"),
    ("qty", "Qty"),
    ("po", "PO"),
    ("iban", "IBAN"),
    ("cogs", "COGS"),
    ("url", "URL"),
];

/// Split a field name into lowercase words on camelCase humps, underscores,
/// hyphens, dots and spaces. Digit runs form their own word.
pub fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase() && prev.is_uppercase() && next_lower)
                || (c.is_ascii_digit() != prev.is_ascii_digit() && prev.is_alphanumeric());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Turn a field name into a column header: `vatAmount` is `VAT Amount`,
/// `closing_balance` is `Closing Balance`.
pub fn prettify(name: &str) -> String {
    let words = split_words(name);
    if words.is_empty() {
        return name.trim().to_string();
    }
    words
        .iter()
        .map(|w| {
            SPECIAL_WORDS
                .iter()
                .find(|(k, _)| k == w)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| capitalize(w))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
