//! Worksheet naming rules.

/// Spreadsheet applications reject longer names.
pub const MAX_SHEET_NAME: usize = 31;
const ILLEGAL: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const FALLBACK: &str = "Sheet";

/// Strip illegal characters and clamp the length; an empty result becomes
/// the fallback name.
pub fn sanitize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !ILLEGAL.contains(c) && !c.is_control())
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    let clipped: String = cleaned.chars().take(MAX_SHEET_NAME).collect();
    let clipped = clipped.trim_end().to_string();
    if clipped.is_empty() {
        FALLBACK.to_string()
    } else {
        clipped
    }
}

/// Hands out unique sheet names. Names compare case-insensitively; a clash
/// gets a ` (2)`, ` (3)`... suffix, shortening the base to stay in bounds.
#[derive(Debug, Default)]
pub struct SheetNames {
    used: Vec<String>,
}

impl SheetNames {
    pub fn new() -> Self {
        Self::default()
    }

    fn taken(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.used.iter().any(|u| u.to_lowercase() == lower)
    }

    pub fn claim(&mut self, raw: &str) -> String {
        let base = sanitize(raw);
        let mut name = base.clone();
        let mut n = 2;
        while self.taken(&name) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            let stem: String = base.chars().take(keep).collect();
            name = format!("{}{suffix}", stem.trim_end());
            n += 1;
        }
        self.used.push(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_illegal_characters() {
        assert_eq!(sanitize("1000 - Cash [Main]: A/B"), "1000 - Cash Main AB");
        assert_eq!(sanitize("  'Quoted'  "), "Quoted");
        assert_eq!(sanitize("?*/"), "Sheet");
    }

    #[test]
    fn clamps_length() {
        let long = "4010 - Accrued-Liabilities-and-Provisions-for-Staff";
        assert_eq!(sanitize(long), "4010 - Accrued-Liabilities-and-");
        assert_eq!(sanitize(long).chars().count(), MAX_SHEET_NAME);
    }

    #[test]
    fn clamped_names_never_end_in_a_space() {
        let long = "4010 - Accrued Liabilities and Provisions for Staff";
        let name = sanitize(long);
        assert_eq!(name, "4010 - Accrued Liabilities and");
        assert!(name.chars().count() <= MAX_SHEET_NAME);
    }

    #[test]
    fn deduplicates_case_insensitively() {
        let mut names = SheetNames::new();
        assert_eq!(names.claim("Summary"), "Summary");
        assert_eq!(names.claim("summary"), "summary (2)");
        assert_eq!(names.claim("Cash/Bank"), "CashBank");
        assert_eq!(names.claim("Cash:Bank"), "CashBank (2)");
        assert_eq!(names.claim("Cash?Bank"), "CashBank (3)");
    }

    #[test]
    fn suffix_fits_within_the_limit() {
        let mut names = SheetNames::new();
        let long = "A".repeat(40);
        names.claim(&long);
        let second = names.claim(&long);
        assert_eq!(second.chars().count(), MAX_SHEET_NAME);
        assert!(second.ends_with(" (2)"));
    }
}
