//! Placeholder markers and their replacement values.

use std::collections::HashMap;

/// Opening delimiter shared by every marker token.
const TOKEN_OPEN: &str = "{{";

/// A placeholder token and the value it is replaced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    token: String,
    replacement: String,
}

impl Marker {
    /// Create a marker for `name`, producing the token `{{name}}`.
    #[must_use]
    pub fn new(name: &str, replacement: impl Into<String>) -> Self {
        Self {
            token: format!("{TOKEN_OPEN}{name}}}}}"),
            replacement: replacement.into(),
        }
    }

    /// Literal token, e.g. `{{fecha_evento}}`.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value substituted for the token.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Closed set of markers recognized for one substitution pass.
///
/// Only recognized names are ever substituted; a recognized name without a
/// supplied value is replaced with the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    /// Build a marker set from the recognized `names` and caller `values`.
    ///
    /// Values for names outside `names` are ignored.
    pub fn new<I, S>(names: I, values: &HashMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                let value = values.get(name).map_or("", String::as_str);
                Marker::new(name, value)
            })
            .collect();
        Self { markers }
    }

    /// Build a marker set from explicit `(name, value)` pairs.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let markers = pairs
            .into_iter()
            .map(|(name, value)| Marker::new(name.as_ref(), value))
            .collect();
        Self { markers }
    }

    /// Whether the set has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Iterate over markers in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Whether `text` contains at least one complete token.
    #[must_use]
    pub fn contains_any(&self, text: &str) -> bool {
        text.contains(TOKEN_OPEN)
            && self
                .markers
                .iter()
                .any(|marker| text.contains(marker.token()))
    }

    /// Whether `text` ends with a proper prefix of some token, e.g. `"at {{hora"`.
    #[must_use]
    pub fn ends_with_partial_token(&self, text: &str) -> bool {
        self.markers.iter().any(|marker| {
            let token = marker.token();
            (1..token.len())
                .any(|len| token.is_char_boundary(len) && text.ends_with(&token[..len]))
        })
    }

    /// Replace every complete token in `text`, including tokens that appear
    /// in replacement values.
    ///
    /// Passes are repeated until no recognized token remains, so a second
    /// substitution over the result is a no-op. A value that refers back to
    /// its own token stops after `len() + 1` passes. Returns `None` when
    /// `text` holds no token.
    #[must_use]
    pub fn substitute(&self, text: &str) -> Option<String> {
        let mut current = self.substitute_once(text)?;
        for _ in 0..self.markers.len() {
            match self.substitute_once(&current) {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
        tracing::warn!(text, "Marker values keep producing tokens, giving up");
        Some(current)
    }

    /// One left-to-right pass. At each position the first marker (in mapping
    /// order) whose token matches is replaced and scanning resumes after it.
    fn substitute_once(&self, text: &str) -> Option<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        let mut replaced = false;

        while let Some(pos) = rest.find(TOKEN_OPEN) {
            let candidate = &rest[pos..];
            if let Some(marker) = self
                .markers
                .iter()
                .find(|marker| candidate.starts_with(marker.token()))
            {
                out.push_str(&rest[..pos]);
                out.push_str(marker.replacement());
                rest = &candidate[marker.token().len()..];
                replaced = true;
            } else {
                // Step over one '{' so "{{{name}}" still matches at the next offset
                out.push_str(&rest[..=pos]);
                rest = &rest[pos + 1..];
            }
        }

        if !replaced {
            return None;
        }
        out.push_str(rest);
        Some(out)
    }
}
