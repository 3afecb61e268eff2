//! Repository module - the `owner/name` scope every query runs in

use std::fmt;

/// A repository on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    /// Create a repository reference
    ///
    /// # Errors
    /// Returns error if either component is empty or contains a slash
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, String> {
        let owner = owner.into();
        let name = name.into();
        for part in [&owner, &name] {
            if part.is_empty() || part.contains('/') {
                return Err(format!("Invalid repository component: '{}'", part));
            }
        }
        Ok(Self { owner, name })
    }

    /// Parse `owner/name`
    ///
    /// # Examples
    ///
    /// ```
    /// use stalebot_domain::Repository;
    ///
    /// let repo = Repository::parse("octo-org/octo-repo").unwrap();
    /// assert_eq!(repo.owner(), "octo-org");
    /// assert_eq!(repo.to_string(), "octo-org/octo-repo");
    /// ```
    pub fn parse(full_name: &str) -> Result<Self, String> {
        match full_name.trim().split_once('/') {
            Some((owner, name)) => Self::new(owner, name),
            None => Err(format!(
                "Invalid repository '{}': expected owner/name",
                full_name
            )),
        }
    }

    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Repository::parse("just-a-name").is_err());
        assert!(Repository::parse("/repo").is_err());
        assert!(Repository::parse("a/b/c").is_err());
    }
}
