//! Identifier types for stops, lines and routes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

/// Checks the rules shared by every identifier kind.
fn validate(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "must not be empty",
        });
    }

    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(InvalidId {
            kind,
            reason: "must not contain whitespace or control characters",
        });
    }

    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, rejecting empty strings and whitespace.
            pub fn parse(s: &str) -> Result<Self, InvalidId> {
                validate($kind, s)?;
                Ok(Self(s.to_string()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                validate($kind, &s)?;
                Ok(Self(s))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a physical stop (platform group or station).
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::StopId;
    ///
    /// let sol = StopId::parse("par_4_11").unwrap();
    /// assert_eq!(sol.as_str(), "par_4_11");
    ///
    /// assert!(StopId::parse("").is_err());
    /// assert!(StopId::parse("par 4").is_err());
    /// ```
    StopId,
    "stop"
);

string_id!(
    /// Identifier of a commercial line (e.g. metro line 1).
    LineId,
    "line"
);

string_id!(
    /// Identifier of one route (itinerary) of a line.
    RouteId,
    "route"
);
