//! HTTP verb tokens.

use std::fmt;

/// A request or route method, always held in lower case.
///
/// Unknown tokens are kept as [`Method::Other`] so a route registered with an
/// unusual verb still matches a request carrying the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Other(String),
}

impl Method {
    /// Verb order used when pairing actions in `Router::mix`.
    pub const RESOURCE_ORDER: [Method; 4] =
        [Method::Get, Method::Post, Method::Put, Method::Delete];

    /// Lower-case token for this method.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
            Method::Patch => "patch",
            Method::Head => "head",
            Method::Options => "options",
            Method::Other(token) => token,
        }
    }

    /// True for the verbs this crate knows by name.
    pub fn is_standard(&self) -> bool {
        !matches!(self, Method::Other(_))
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        let token = s.trim().to_lowercase();
        match token.as_str() {
            "get" => Method::Get,
            "post" => Method::Post,
            "put" => Method::Put,
            "delete" => Method::Delete,
            "patch" => Method::Patch,
            "head" => Method::Head,
            "options" => Method::Options,
            _ => Method::Other(token),
        }
    }
}

impl From<String> for Method {
    fn from(s: String) -> Self {
        Method::from(s.as_str())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Method::from("GET"), Method::Get);
        assert_eq!(Method::from("Post"), Method::Post);
        assert_eq!(Method::from("delete"), Method::Delete);
    }

    #[test]
    fn test_unknown_token_is_lowercased() {
        let method = Method::from("PURGE");
        assert_eq!(method, Method::Other("purge".into()));
        assert_eq!(method.to_string(), "purge");
        assert!(!method.is_standard());
    }

    #[test]
    fn test_resource_order() {
        let tokens: Vec<String> =
            Method::RESOURCE_ORDER.into_iter().map(|m| m.to_string()).collect();
        assert_eq!(tokens, vec!["get", "post", "put", "delete"]);
    }
}
