use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("numeric pattern is valid"));

/// Trims `raw` and strips thousands separators when what remains is a plain decimal number.
/// Anything else comes back trimmed but otherwise untouched.
pub fn normalize_value(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains(',') {
        let stripped = trimmed.replace(',', "");
        if NUMERIC.is_match(&stripped) {
            return stripped;
        }
    }
    trimmed.to_string()
}

pub fn is_blank_record<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().all(|value| value.as_ref().trim().is_empty())
}

/// Returns `None` for a blank record, otherwise the normalized values.
pub fn normalize_record<S: AsRef<str>>(values: &[S]) -> Option<Vec<String>> {
    if is_blank_record(values) {
        return None;
    }
    Some(
        values
            .iter()
            .map(|value| normalize_value(value.as_ref()))
            .collect(),
    )
}
