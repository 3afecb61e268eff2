//! Resource module - the two classes of tracker items the bot manages

use std::fmt;

/// Kind of tracker item a sweep or action applies to
///
/// Every search, configuration lookup and mutation is parameterized by this
/// value. Getting it wrong would mutate the wrong class of item, so it is
/// decided once at the trigger boundary and carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Plain issues
    Issues,

    /// Pull requests
    Pulls,
}

impl ResourceType {
    /// Both resource types, in sweep order
    pub const ALL: [ResourceType; 2] = [ResourceType::Issues, ResourceType::Pulls];

    /// Get the resource name as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Issues => "issues",
            ResourceType::Pulls => "pulls",
        }
    }

    /// Parse a resource type from its configuration name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "issues" => Some(ResourceType::Issues),
            "pulls" => Some(ResourceType::Pulls),
            _ => None,
        }
    }

    /// Search qualifier restricting results to this resource type
    pub fn search_qualifier(&self) -> &'static str {
        match self {
            ResourceType::Issues => "is:issue",
            ResourceType::Pulls => "is:pr",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Unknown type: {}. Valid types are 'pulls' and 'issues'", s)
        })
    }
}
