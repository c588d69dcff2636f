use std::fmt;

use serde::{Deserialize, Serialize};

/// Commit author identity.
///
/// An `Actor` is pure audit metadata: it names who performed a commit and
/// never participates in control decisions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub email: String,
}

impl Actor {
    /// Create an actor from a name and e-mail address.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// The placeholder actor recorded for unauthenticated commits.
    pub fn anonymous() -> Self {
        Self {
            name: "nobody".to_string(),
            email: String::new(),
        }
    }

    /// The `name <email>` signature recorded in revision history.
    pub fn signature(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_format() {
        let actor = Actor::new("ana", "ana@example.com");
        assert_eq!(actor.signature(), "ana <ana@example.com>");
    }

    #[test]
    fn anonymous_signature() {
        assert_eq!(Actor::anonymous().signature(), "nobody <>");
    }
}
