//! Name-searchable ordered collections of resource records.

use std::ops::Deref;

use crate::{error::ApiError, model::Resource};

/// Outcome of looking up a single record by name fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match<T> {
    Found(T),
    NotFound,
    /// Several records matched; carries their names in collection order
    Ambiguous(Vec<String>),
}

impl<T> Match<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Match::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Match::Found(_))
    }

    /// Convert into a `Result`, turning absence and ambiguity into errors
    /// that name the record kind and the fragment the user typed
    pub fn into_result(self, kind: &'static str, fragment: &str) -> Result<T, ApiError> {
        match self {
            Match::Found(record) => Ok(record),
            Match::NotFound => Err(ApiError::NotFound {
                kind,
                name: fragment.to_string(),
            }),
            Match::Ambiguous(candidates) => Err(ApiError::Ambiguous {
                kind,
                fragment: fragment.to_string(),
                candidates,
            }),
        }
    }
}

/// An ordered sequence of records of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct SmartCollection<T> {
    items: Vec<T>,
}

impl<T> SmartCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Resource> SmartCollection<T> {
    /// Find the one record whose name contains `fragment`, ignoring case.
    ///
    /// When several names contain the fragment, a single exact
    /// (case-insensitive) name match wins. Anything else is ambiguous,
    /// including several exact matches.
    pub fn match_one(&self, fragment: &str) -> Match<&T> {
        let candidates = self.match_all(fragment);

        match candidates.as_slice() {
            [] => Match::NotFound,
            [only] => Match::Found(*only),
            many => {
                let needle = fragment.to_lowercase();
                let exact: Vec<&T> = many
                    .iter()
                    .copied()
                    .filter(|record| {
                        record
                            .name()
                            .is_some_and(|name| name.to_lowercase() == needle)
                    })
                    .collect();

                match exact.as_slice() {
                    [only] => Match::Found(*only),
                    _ => Match::Ambiguous(
                        many.iter()
                            .filter_map(|record| record.name())
                            .map(str::to_string)
                            .collect(),
                    ),
                }
            }
        }
    }

    /// Every record whose name contains `fragment`, ignoring case, in
    /// collection order. Records without a name never match.
    pub fn match_all(&self, fragment: &str) -> Vec<&T> {
        let needle = fragment.to_lowercase();
        self.items
            .iter()
            .filter(|record| {
                record
                    .name()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Record names in collection order, skipping unnamed records
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().filter_map(|record| record.name()).collect()
    }
}

impl<T> Default for SmartCollection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for SmartCollection<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for SmartCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for SmartCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SmartCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for SmartCollection<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.items == *other
    }
}

impl<T: PartialEq> PartialEq<[T]> for SmartCollection<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq)]
    struct Named(Option<String>);

    #[derive(Deserialize)]
    struct NamedData {
        name: Option<String>,
    }

    impl Resource for Named {
        const KIND: &'static str = "thing";
        type Data = NamedData;

        fn from_data(_session: &crate::api::Session, data: NamedData) -> Self {
            Named(data.name)
        }

        fn name(&self) -> Option<&str> {
            self.0.as_deref()
        }
    }

    fn collection(names: &[&str]) -> SmartCollection<Named> {
        names.iter().map(|n| Named(Some(n.to_string()))).collect()
    }

    #[test]
    fn test_unique_substring_match() {
        let environments = collection(&["engineyard_production", "engineyard_staging"]);
        assert_eq!(
            environments.match_one("prod"),
            Match::Found(&Named(Some("engineyard_production".to_string())))
        );
    }

    #[test]
    fn test_shared_substring_is_ambiguous() {
        let environments = collection(&["engineyard_production", "engineyard_staging"]);
        assert_eq!(
            environments.match_one("engineyard"),
            Match::Ambiguous(vec![
                "engineyard_production".to_string(),
                "engineyard_staging".to_string()
            ])
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let environments = collection(&["Production", "staging"]);
        assert!(environments.match_one("PROD").is_found());
    }

    #[test]
    fn test_exact_name_breaks_tie() {
        let environments = collection(&["app", "app_staging", "app_production"]);
        assert_eq!(
            environments.match_one("app"),
            Match::Found(&Named(Some("app".to_string())))
        );
    }

    #[test]
    fn test_two_exact_names_stay_ambiguous() {
        let environments = collection(&["App", "app", "app_staging"]);
        match environments.match_one("app") {
            Match::Ambiguous(candidates) => assert_eq!(candidates.len(), 3),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match() {
        let environments = collection(&["production"]);
        assert_eq!(environments.match_one("staging"), Match::NotFound);
        assert!(environments.match_all("staging").is_empty());
    }

    #[test]
    fn test_unnamed_records_never_match() {
        let things: SmartCollection<Named> =
            vec![Named(None), Named(Some("named".to_string()))].into_iter().collect();
        assert_eq!(things.match_all("").len(), 1);
        assert_eq!(things.names(), vec!["named"]);
    }

    #[test]
    fn test_match_all_keeps_order() {
        let environments = collection(&["b_prod", "a_prod", "staging"]);
        let names: Vec<&str> = environments
            .match_all("prod")
            .into_iter()
            .filter_map(|record| record.name())
            .collect();
        assert_eq!(names, vec!["b_prod", "a_prod"]);
    }

    #[test]
    fn test_equality_with_plain_vec() {
        let environments = collection(&["production", "staging"]);
        let plain = vec![
            Named(Some("production".to_string())),
            Named(Some("staging".to_string())),
        ];
        assert_eq!(environments, plain);
        assert!(environments != vec![Named(Some("staging".to_string()))]);
    }

    #[test]
    fn test_into_result() {
        let environments = collection(&["engineyard_production", "engineyard_staging"]);
        assert!(matches!(
            environments.match_one("engineyard").into_result("environment", "engineyard"),
            Err(ApiError::Ambiguous { kind: "environment", .. })
        ));
        assert!(matches!(
            environments.match_one("qa").into_result("environment", "qa"),
            Err(ApiError::NotFound { .. })
        ));
    }
}
