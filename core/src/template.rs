//! Permissive `{{variable}}` substitution.
//!
//! Placeholders whose name is in the scope are replaced by the value; anything
//! else, including unknown names and unterminated `{{`, is kept verbatim.

use std::collections::BTreeMap;

/// Variables visible to a command template.
pub type Scope = BTreeMap<String, String>;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

pub fn render(template: &str, scope: &Scope) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after_open[..end].trim();
        match scope.get(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// Builds a [`Scope`] from string pairs.
pub fn scope<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Scope
where
    K: Into<String>,
    V: Into<String>,
{
    vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
