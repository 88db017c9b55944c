//! Config paths.
//!
//! Paths are kept as segment lists while the validator walks a tree and are
//! only rendered to `webpack.styles.css[0]` form at the report boundary.

use std::fmt;

/// One step into a config tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Map key
    Key(String),
    /// Sequence index
    Index(usize),
}

/// Location of a value in a config tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    segments: Vec<Segment>,
}

impl ConfigPath {
    /// The path of the whole config tree
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from map keys, e.g. `["npm", "umd"]`
    pub fn from_keys(keys: &[&str]) -> Self {
        Self {
            segments: keys.iter().map(|k| Segment::Key((*k).to_string())).collect(),
        }
    }

    /// Child path for a map key
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Self { segments }
    }

    /// Child path for a sequence index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("config");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mixes_keys_and_indices() {
        let path = ConfigPath::root()
            .key("webpack")
            .key("styles")
            .key("css")
            .index(0);
        assert_eq!(path.to_string(), "webpack.styles.css[0]");
    }

    #[test]
    fn test_root_path() {
        assert!(ConfigPath::root().is_root());
        assert_eq!(ConfigPath::root().to_string(), "config");
    }

    #[test]
    fn test_keys_containing_dots_stay_single_segments() {
        let path = ConfigPath::from_keys(&["webpack", "aliases"]).key("lodash.merge");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "webpack.aliases.lodash.merge");
    }
}
