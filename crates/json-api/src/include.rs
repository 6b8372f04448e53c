//! Include list parsing.
//!
//! An include list such as `"author,comments.author"` names the relationship
//! paths the decoder flattens. It is parsed into a tree keyed by
//! relationship name:
//!
//! ```text
//! author
//! comments
//! └── author
//! ```

use std::collections::BTreeMap;

/// A node of the parsed include list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTree {
    children: BTreeMap<String, IncludeTree>,
}

impl IncludeTree {
    /// Parses a comma separated list of dotted relationship paths.
    ///
    /// Empty segments are skipped and segments are trimmed, so
    /// `"author, comments..author"` equals `"author,comments.author"`.
    ///
    /// # Example
    ///
    /// ```
    /// use json_api::IncludeTree;
    ///
    /// let tree = IncludeTree::parse("author,comments.author");
    /// assert!(tree.get("author").is_some());
    /// assert!(tree.get("comments").and_then(|c| c.get("author")).is_some());
    /// assert!(tree.get("tags").is_none());
    /// ```
    pub fn parse(include_list: &str) -> Self {
        let mut root = IncludeTree::default();
        for line in include_list.split(',') {
            let mut node = &mut root;
            for segment in line.split('.').map(str::trim).filter(|s| !s.is_empty()) {
                node = node.children.entry(segment.to_string()).or_default();
            }
        }
        root
    }

    /// The sub-tree for relationship `name`, if it is included.
    pub fn get(&self, name: &str) -> Option<&IncludeTree> {
        self.children.get(name)
    }

    /// Relationship names included at this level.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Formats the tree back into a canonical include list.
    pub fn to_include_list(&self) -> String {
        let mut paths = Vec::new();
        self.collect_paths(String::new(), &mut paths);
        paths.join(",")
    }

    fn collect_paths(&self, prefix: String, out: &mut Vec<String>) {
        for (name, child) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            if child.is_empty() {
                out.push(path);
            } else {
                child.collect_paths(path, out);
            }
        }
    }
}
