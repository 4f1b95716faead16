//! Incoming request parameters.

/// Query-string parameters in arrival order. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value for `key`.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_all(key).into_iter().find(|v| !v.trim().is_empty())
    }

    /// Every value for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys() {
        let params: RequestParams = [("species", "Fox"), ("opacity", "0.3"), ("species", "Owl")]
            .into_iter()
            .collect();

        assert_eq!(params.get("species"), Some("Fox"));
        assert_eq!(params.get_all("species"), vec!["Fox", "Owl"]);
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_get_non_empty_skips_blank() {
        let params: RequestParams = [("species", ""), ("species", "Owl")].into_iter().collect();
        assert_eq!(params.get_non_empty("species"), Some("Owl"));
    }
}
