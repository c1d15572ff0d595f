//! Newtype domain identifiers.
//!
//! Every value that names something on the hosting platform is represented as a
//! distinct newtype wrapping a primitive. This prevents accidentally swapping,
//! for example, a [`RepositoryOwner`] with a [`RepositoryName`] even though both
//! are `String` under the hood.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: GitHub-integer-backed
// ---------------------------------------------------------------------------

/// Number of a GitHub issue or pull request.
///
/// Pull requests share the issue number space, so the same value addresses the
/// issue-comment endpoint for either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Creates a new issue number, returning `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// A Git commit SHA the check run is attached to.
    CommitSha
}

string_id! {
    /// The account (user or organisation) that owns a repository.
    RepositoryOwner
}

string_id! {
    /// The name of a repository, without its owner.
    RepositoryName
}

string_id! {
    /// A file path relative to the repository root, as reported by the linter.
    FilePath
}

// ---------------------------------------------------------------------------

/// A repository addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    pub owner: RepositoryOwner,
    pub name: RepositoryName,
}

impl Repository {
    pub fn new(owner: RepositoryOwner, name: RepositoryName) -> Self {
        Self { owner, name }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
