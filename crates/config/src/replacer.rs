//! Key replacement applied when mapping setting keys to environment variable names

/// Ordered list of `(old, new)` substitutions
///
/// At each position of the input the first pair whose `old` matches wins,
/// and scanning resumes right after the match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyReplacer {
    pairs: Vec<(String, String)>,
}

impl KeyReplacer {
    /// Create a replacer from `(old, new)` pairs
    pub fn new<I, O, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .filter(|(old, _)| !old.is_empty())
            .collect();

        Self { pairs }
    }

    /// Replacer mapping `.` to `_`
    pub fn dots_to_underscores() -> Self {
        Self::new([(".", "_")])
    }

    /// Substitution pairs in match order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Apply every substitution to `input`
    pub fn replace(&self, input: &str) -> String {
        if self.pairs.is_empty() {
            return input.to_string();
        }

        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        'scan: while !rest.is_empty() {
            for (old, new) in &self.pairs {
                if let Some(tail) = rest.strip_prefix(old.as_str()) {
                    output.push_str(new);
                    rest = tail;
                    continue 'scan;
                }
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                output.push(c);
            }
            rest = chars.as_str();
        }

        output
    }
}
