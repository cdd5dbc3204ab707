//! Outbound query construction.
//!
//! Parameter records describe themselves as a [`QueryParams`] list. The
//! builder only drops values that are absent; explicit falsy values such as
//! `cartype=0` or an empty string go out as given.

use crate::params::Parameters;

/// Ordered `(name, value)` pairs sent to the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, value: impl ToString) -> Self {
        self.pairs.push((name, value.to_string()));
        self
    }

    pub fn optional<T: ToString>(mut self, name: &'static str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.pairs.push((name, v.to_string()));
        }
        self
    }

    /// Booleans go out as the provider's lowercase `"true"`/`"false"`.
    pub fn flag(self, name: &'static str, value: Option<bool>) -> Self {
        self.optional(name, value.map(|b| if b { "true" } else { "false" }))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy suitable for logging: the key is cut to its first 8 characters.
    pub fn masked(&self) -> Vec<(&'static str, String)> {
        self.pairs
            .iter()
            .map(|(k, v)| {
                if *k == "key" {
                    let prefix: String = v.chars().take(8).collect();
                    (*k, format!("{}...***", prefix))
                } else {
                    (*k, v.clone())
                }
            })
            .collect()
    }
}

/// Build the full request for a record: the resolved key first, then the
/// record's own parameters.
pub fn build_query<P: Parameters>(params: &P, api_key: &str) -> QueryParams {
    let mut query = QueryParams::new().required("key", api_key);
    query.pairs.extend(params.query().pairs);
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ToolInput;
    use crate::params::route::DrivingRouteParams;
    use crate::params::geocode::GeocodingParams;
    use serde_json::json;

    #[test]
    fn test_absent_values_are_dropped() {
        let q = QueryParams::new()
            .required("a", "1")
            .optional::<String>("b", None)
            .optional("c", Some(""))
            .optional("d", Some(0))
            .flag("e", Some(false))
            .flag("f", None);
        assert_eq!(q.get("a"), Some("1"));
        assert!(!q.contains("b"));
        assert_eq!(q.get("c"), Some(""));
        assert_eq!(q.get("d"), Some("0"));
        assert_eq!(q.get("e"), Some("false"));
        assert!(!q.contains("f"));
        assert_eq!(q.len(), 4);
    }

    #[test]
    fn test_key_is_first_and_masked() {
        let params: GeocodingParams = ToolInput::Fields(
            json!({"address": "x"}).as_object().unwrap().clone(),
        )
        .into_canonical()
        .unwrap();
        let q = build_query(&params, "0123456789abcdef");
        assert_eq!(q.pairs()[0].0, "key");
        let masked = q.masked();
        assert_eq!(masked[0].1, "01234567...***");
        assert!(!q.contains("city"));
        assert!(!q.contains("sig"));
    }

    #[test]
    fn test_driving_keeps_falsy_cartype() {
        let params: DrivingRouteParams = ToolInput::Fields(
            json!({
                "origin": "116.481028,39.989643",
                "destination": "116.434446,39.90816",
                "cartype": 0,
            })
            .as_object()
            .unwrap()
            .clone(),
        )
        .into_canonical()
        .unwrap();
        let q = build_query(&params, "k");
        assert_eq!(q.get("cartype"), Some("0"));
        assert_eq!(q.get("strategy"), Some("32"));
        assert!(!q.contains("plate"));
        assert!(!q.contains("show_fields"));
    }
}
