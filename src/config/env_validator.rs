//! Override and key validation
//!
//! A `CAMPAIGN_DEPLOY_*` value that does not parse is reported on stderr and
//! the configured value is kept. Unknown config keys get a nearest-name hint
//! from the same edit distance.

use std::io::Write;

/// Largest edit distance still offered as a "did you mean" hint
const MAX_HINT_DISTANCE: usize = 2;

/// One `CAMPAIGN_DEPLOY_*` variable and the values it accepts
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    accepted: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, accepted: &'a [&'a str]) -> Self {
        Self { var_name, accepted }
    }

    /// `fallback` is returned when `parser` rejects `raw`
    pub fn parse<T>(&self, raw: &str, parser: impl Fn(&str) -> Option<T>, fallback: T) -> T {
        self.parse_reporting(raw, parser, fallback, &mut std::io::stderr())
    }

    pub fn parse_reporting<T, W: Write>(
        &self,
        raw: &str,
        parser: impl Fn(&str) -> Option<T>,
        fallback: T,
        out: &mut W,
    ) -> T {
        if let Some(value) = parser(raw) {
            return value;
        }

        let hint = closest(&raw.to_lowercase(), self.accepted)
            .filter(|candidate| *candidate != raw)
            .map(|candidate| format!(" (did you mean '{}'?)", candidate))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "Warning: {}='{}' is not valid{}; accepted: {}. Keeping the configured value.",
            self.var_name,
            raw,
            hint,
            self.accepted.join(", ")
        );
        fallback
    }
}

/// Nearest candidate within [`MAX_HINT_DISTANCE`] edits, first one on ties
pub fn closest<'c>(input: &str, candidates: &[&'c str]) -> Option<&'c str> {
    candidates
        .iter()
        .map(|c| (*c, edit_distance(input, c)))
        .filter(|(_, d)| *d <= MAX_HINT_DISTANCE)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Levenshtein distance over chars, single rolling row
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != *cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }

    row[b.len()]
}
