//! Prefixed-name resolution against a prefix table.

use std::collections::HashMap;

use url::Url;

use super::Iri;
use crate::error::{Rdf2RespecError, Result};

/// Prefix → namespace mapping used to expand `prefix:local` names.
pub type PrefixTable = HashMap<String, String>;

/// Resolve a prefixed or absolute name into an IRI.
///
/// `Ok(None)` means the name is well-formed but neither expands through
/// `prefixes` nor is an absolute IRI; callers decide whether that is fatal.
pub fn resolve(name: &str, prefixes: &PrefixTable) -> Result<Option<Iri>> {
    if !name.contains(':') {
        return Err(Rdf2RespecError::InvalidIdentifier(name.to_string()));
    }

    let parts: Vec<&str> = name.split(':').collect();
    if let [prefix, local] = parts.as_slice() {
        if let Some(namespace) = prefixes.get(*prefix) {
            return Ok(Some(Iri::new(format!("{}{}", namespace, local))));
        }
    }

    if is_absolute_iri(name) {
        return Ok(Some(Iri::new(name)));
    }

    Ok(None)
}

/// Whether `value` is an absolute IRI, i.e. carries a scheme component.
pub fn is_absolute_iri(value: &str) -> bool {
    if !value.contains(':') || value.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> PrefixTable {
        let mut table = PrefixTable::new();
        table.insert("skos".to_string(), "http://www.w3.org/2004/02/skos/core#".to_string());
        table.insert("ex".to_string(), "http://ex.org/ns#".to_string());
        table
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let iri = resolve("skos:prefLabel", &prefixes()).unwrap();
        assert_eq!(
            iri,
            Some(Iri::new("http://www.w3.org/2004/02/skos/core#prefLabel"))
        );
    }

    #[test]
    fn test_resolve_absolute_iri_unchanged() {
        let iri = resolve("http://purl.org/dc/terms/title", &prefixes()).unwrap();
        assert_eq!(iri, Some(Iri::new("http://purl.org/dc/terms/title")));
    }

    #[test]
    fn test_resolve_unknown_prefix_is_still_an_absolute_iri() {
        // `foo:bar` has a syntactically valid scheme, like `urn:` or `mailto:`.
        let iri = resolve("foo:bar", &prefixes()).unwrap();
        assert_eq!(iri, Some(Iri::new("foo:bar")));
    }

    #[test]
    fn test_resolve_unresolvable() {
        assert_eq!(resolve("1bad:local", &prefixes()).unwrap(), None);
        assert_eq!(resolve("has space:x", &prefixes()).unwrap(), None);
    }

    #[test]
    fn test_resolve_without_colon_fails() {
        let err = resolve("prefLabel", &prefixes()).unwrap_err();
        assert!(matches!(err, Rdf2RespecError::InvalidIdentifier(ref name) if name == "prefLabel"));
    }

    #[test]
    fn test_is_absolute_iri() {
        assert!(is_absolute_iri("urn:isbn:0451450523"));
        assert!(is_absolute_iri("https://ex.org/a#b"));
        assert!(!is_absolute_iri("no-colon"));
        assert!(!is_absolute_iri(":local"));
    }
}
