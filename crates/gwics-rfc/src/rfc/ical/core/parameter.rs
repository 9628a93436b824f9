//! Parametrized property values (`[;KEY=VAL]*:VALUE`).

use std::fmt;

/// A value accompanied by named parameters.
///
/// Parameter names are normalized to uppercase, values are kept verbatim
/// (including any surrounding quotes). Parameters keep their insertion order for
/// serialization but equality ignores it.
#[derive(Debug, Clone, Default, Eq)]
pub struct ParametrizedValue {
    pub value: Option<String>,
    params: Vec<(String, String)>,
}

impl ParametrizedValue {
    /// Creates a value without parameters.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            params: Vec::new(),
        }
    }

    /// Parses a `[;KEY=VAL]*:VALUE` fragment.
    ///
    /// The first `:` outside a quoted parameter value separates the parameters from
    /// the value, so the value itself may contain colons. Without any separator the
    /// fragment only holds parameters. Parameter fragments without `=` are ignored.
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let (params_part, value) = match find_unquoted(fragment, ':') {
            Some(pos) => (&fragment[..pos], Some(fragment[pos + 1..].to_string())),
            None => (fragment, None),
        };

        let mut parsed = Self {
            value,
            params: Vec::new(),
        };
        for param in split_unquoted(params_part, ';') {
            if let Some((key, val)) = param.split_once('=') {
                parsed.set(key, val);
            }
        }

        parsed
    }

    /// Returns the value of a parameter (name is case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, val)| val.as_str())
    }

    /// Sets a parameter, replacing an existing one in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let key = name.to_ascii_uppercase();
        let value = value.into();
        if let Some(slot) = self.params.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.params.push((key, value));
        }
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self
            .params
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.params.remove(pos).1)
    }

    /// Iterates over parameters in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Serializes back to `[;KEY=VAL]*:VALUE`.
    #[must_use]
    pub fn to_ical(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for ParametrizedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .all(|(key, val)| other.get(key) == Some(val.as_str()))
    }
}

impl fmt::Display for ParametrizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, val) in &self.params {
            write!(f, ";{key}={val}")?;
        }
        if let Some(value) = &self.value {
            write!(f, ":{value}")?;
        }
        Ok(())
    }
}

/// A quote only opens right after `=` or `,`, so a stray `"` inside a bare parameter
/// value does not hide the separator. An unterminated quote is ignored.
fn find_unquoted(input: &str, needle: char) -> Option<usize> {
    let mut quoted = false;
    let mut previous = None;
    for (i, c) in input.char_indices() {
        match c {
            '"' if quoted || matches!(previous, Some('=' | ',')) => quoted = !quoted,
            c if c == needle && !quoted => return Some(i),
            _ => {}
        }
        previous = Some(c);
    }

    if quoted { input.find(needle) } else { None }
}

fn split_unquoted(input: &str, separator: char) -> impl Iterator<Item = &str> {
    let mut rest = Some(input);
    std::iter::from_fn(move || {
        let current = rest?;
        if let Some(pos) = find_unquoted(current, separator) {
            rest = Some(&current[pos + separator.len_utf8()..]);
            Some(&current[..pos])
        } else {
            rest = None;
            Some(current)
        }
    })
}
