use std::fmt::Display;

use url::form_urlencoded;

/// Ordered list of query parameters, encoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Multi-valued parameters travel as a single comma separated value.
    #[must_use]
    pub fn param_list<T: Display>(self, key: &str, values: &[T]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.param(key, joined)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}
