use crate::error::ResolveError;
use crate::models::CountryQuery;

/// Validate a user-supplied country identifier.
///
/// The identifier is passed through untouched (no trimming, no case folding);
/// matching is left to the remote services. Only the empty string is rejected.
///
/// ```
/// use covid_report::resolver::resolve;
/// let q = resolve("IT", true)?;
/// assert_eq!(q.identifier(), "IT");
/// assert!(q.is_code());
/// # Ok::<(), covid_report::error::ResolveError>(())
/// ```
pub fn resolve(identifier: &str, is_code: bool) -> Result<CountryQuery, ResolveError> {
    if identifier.is_empty() {
        return Err(ResolveError::EmptyIdentifier);
    }
    Ok(CountryQuery {
        identifier: identifier.to_string(),
        is_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_rejected() {
        assert_eq!(resolve("", false), Err(ResolveError::EmptyIdentifier));
        assert_eq!(resolve("", true), Err(ResolveError::EmptyIdentifier));
    }

    #[test]
    fn non_empty_identifiers_pass_through_unchanged() {
        for (id, is_code) in [
            ("IT", true),
            ("usa", true),
            ("Italy", false),
            (" Côte d'Ivoire ", false),
            (" ", false),
        ] {
            let q = resolve(id, is_code).unwrap();
            assert_eq!(q.identifier(), id);
            assert_eq!(q.is_code(), is_code);
        }
    }
}
