use std::fmt;

/// A location in the API resource tree, relative to `/api2/json/`.
///
/// Segments are kept apart so node and storage names are percent-encoded
/// when the request URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath(Vec<String>);

impl ResourcePath {
    fn from_segments(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }

    pub fn nodes() -> Self {
        Self::from_segments(&["nodes"])
    }

    pub fn qemu(node: &str) -> Self {
        Self::from_segments(&["nodes", node, "qemu"])
    }

    pub fn network(node: &str) -> Self {
        Self::from_segments(&["nodes", node, "network"])
    }

    pub fn users() -> Self {
        Self::from_segments(&["access", "users"])
    }

    pub fn ticket() -> Self {
        Self::from_segments(&["access", "ticket"])
    }

    pub fn storage_content(node: &str, storage: &str) -> Self {
        Self::from_segments(&["nodes", node, "storage", storage, "content"])
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(ResourcePath::nodes().to_string(), "nodes");
        assert_eq!(ResourcePath::qemu("pve1").to_string(), "nodes/pve1/qemu");
        assert_eq!(ResourcePath::network("pve1").to_string(), "nodes/pve1/network");
        assert_eq!(ResourcePath::users().to_string(), "access/users");
        assert_eq!(
            ResourcePath::storage_content("pve1", "local").to_string(),
            "nodes/pve1/storage/local/content"
        );
    }

    #[test]
    fn test_segments_are_not_split() {
        let path = ResourcePath::network("odd/node?x");
        assert_eq!(
            path.segments().collect::<Vec<_>>(),
            vec!["nodes", "odd/node?x", "network"]
        );
    }
}
