//! Validation of enumerated environment variable values
//!
//! Invalid values fall back to a default and print a warning with a
//! typo suggestion.

use std::io::Write;

/// Accepted spellings of a boolean switch such as `TSRIG_DEBUG`
pub const BOOL_VALUES: &[&str] = &["1", "true", "yes", "on", "0", "false", "no", "off"];

/// Validator for one environment variable
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse `value`, warning on stderr and returning `default` when `parser` rejects it
    pub fn parse<T, F>(&self, value: &str, parser: F, default: T) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        self.parse_with_writer(value, parser, default, &mut std::io::stderr())
    }

    pub fn parse_with_writer<T, F, W>(
        &self,
        value: &str,
        parser: F,
        default: T,
        writer: &mut W,
    ) -> T
    where
        F: Fn(&str) -> Option<T>,
        W: Write,
    {
        if let Some(parsed) = parser(value) {
            return parsed;
        }
        let hint = self
            .suggest(value)
            .map(|s| format!(". Did you mean '{}'?", s))
            .unwrap_or_default();
        let _ = writeln!(
            writer,
            "Warning: ignoring {}='{}'{}",
            self.var_name, value, hint
        );
        if !self.valid_values.is_empty() {
            let _ = writeln!(writer, "Valid values: {}", self.valid_values.join(", "));
        }
        default
    }

    /// Parse a boolean switch; see [`BOOL_VALUES`]
    pub fn parse_bool(&self, value: &str, default: bool) -> bool {
        self.parse(value, parse_switch, default)
    }

    fn suggest(&self, value: &str) -> Option<&'a str> {
        let input = value.to_lowercase();
        self.valid_values
            .iter()
            .map(|&valid| (valid, levenshtein(&input, valid)))
            .min_by_key(|&(_, dist)| dist)
            .filter(|&(_, dist)| dist > 0 && dist <= 2)
            .map(|(valid, _)| valid)
    }
}

/// `1/true/yes/on` and `0/false/no/off`, case-insensitive
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Levenshtein distance over bytes, used for typo suggestions
pub fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("dev", "dev"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("runtme", "runtime"), 1);
        assert_eq!(levenshtein("preloda", "preload"), 2);
    }

    #[test]
    fn test_parse_switch_spellings() {
        assert_eq!(parse_switch("TRUE"), Some(true));
        assert_eq!(parse_switch(" 1 "), Some(true));
        assert_eq!(parse_switch("off"), Some(false));
        assert_eq!(parse_switch(""), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }

    #[test]
    fn test_invalid_value_returns_default_with_suggestion() {
        let validator = EnvVarValidator::new("TSRIG_DEBUG", BOOL_VALUES);
        let mut output = Vec::new();
        let result = validator.parse_with_writer("ture", parse_switch, false, &mut output);

        assert!(!result);
        let msg = String::from_utf8(output).unwrap();
        assert!(msg.contains("TSRIG_DEBUG='ture'"), "{}", msg);
        assert!(msg.contains("Did you mean 'true'?"), "{}", msg);
        assert!(msg.contains("Valid values: 1, true"), "{}", msg);
    }

    #[test]
    fn test_no_suggestion_for_distant_value() {
        let validator = EnvVarValidator::new("TSRIG_DEBUG", BOOL_VALUES);
        let mut output = Vec::new();
        validator.parse_with_writer("definitely", parse_switch, false, &mut output);

        let msg = String::from_utf8(output).unwrap();
        assert!(!msg.contains("Did you mean"), "{}", msg);
    }

    #[test]
    fn test_valid_value_writes_nothing() {
        let validator = EnvVarValidator::new("TSRIG_DEBUG", BOOL_VALUES);
        let mut output = Vec::new();
        assert!(validator.parse_with_writer("yes", parse_switch, false, &mut output));
        assert!(output.is_empty());
    }
}
