//! Error and warning taxonomy for the lookup operations.

use std::fmt;

use thiserror::Error;

/// Fatal failures surfaced by the lookup operations.
///
/// All of these propagate immediately to the caller; there is no retry and
/// no partial-result fallback. The only local recovery is content-level
/// clamping, which goes through [`Warning`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Both a name and an admin code were supplied for the same lookup.
    #[error("\"name\" and \"admin\" cannot be set at the same time")]
    MutuallyExclusiveArgs,

    /// Neither a name nor an admin code was supplied where one is required.
    #[error("at least \"name\" or \"admin\" needs to be set")]
    MissingArgs,

    /// The identifier matches nothing in the reference table.
    ///
    /// Name lookups carry up to 5 closest lexical matches; code lookups
    /// carry none.
    #[error("{}", render_not_found(.query, .suggestions))]
    NotFound {
        query: String,
        suggestions: Vec<String>,
    },

    /// A name matches more than one distinct area across the world.
    #[error(
        "the requested name (\"{name}\") is not unique ({count} results). \
         To retrieve it, please use the \"admin\" parameter instead. If you \
         don't know the GADM code, run a names lookup for \"{name}\": it \
         will return the GADM codes as well"
    )]
    Ambiguous { name: String, count: usize },

    /// Transport or parse failure while retrieving geometry.
    #[error(
        "cannot retrieve the data from the GADM server ({reason}). Try to \
         manually open the following link: {url}. If it doesn't work the \
         error is coming from the GADM servers; if it works please open an \
         issue on our repository"
    )]
    Fetch { url: String, reason: String },
}

fn render_not_found(query: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        format!("the requested \"{query}\" is not part of GADM")
    } else {
        format!(
            "the requested \"{query}\" is not part of GADM. The closest matches are: {}.",
            suggestions.join(", ")
        )
    }
}

/// Advisory notices.
///
/// Warnings never abort execution: they ride on the returned table or
/// feature collection and are mirrored to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The requested content level sits above the matched area; clamped up
    /// to the area's own level.
    LevelTooHigh { requested: u8, fallback: u8 },

    /// The requested content level sits below the deepest recorded
    /// subdivision; clamped down to the max available level.
    LevelTooLow { requested: u8, fallback: u8 },

    /// A legacy entry point was used.
    Deprecated {
        old: &'static str,
        new: &'static str,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LevelTooHigh {
                requested,
                fallback,
            } => write!(
                f,
                "the requested level ({requested}) is higher than the area ({fallback}), fallback to {fallback}"
            ),
            Warning::LevelTooLow {
                requested,
                fallback,
            } => write!(
                f,
                "the requested level ({requested}) is higher than the max level in this area ({fallback}), fallback to {fallback}"
            ),
            Warning::Deprecated { old, new } => {
                write!(f, "`{old}` is deprecated, use `{new}` instead")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_with_suggestions() {
        let err = Error::NotFound {
            query: "Franc".to_string(),
            suggestions: vec!["France".to_string(), "Francs".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("\"Franc\" is not part of GADM"));
        assert!(message.contains("France, Francs."));
    }

    #[test]
    fn test_not_found_without_suggestions() {
        let err = Error::NotFound {
            query: "XYZ".to_string(),
            suggestions: vec![],
        };
        assert!(!err.to_string().contains("closest matches"));
    }

    #[test]
    fn test_fetch_message_carries_url() {
        let err = Error::Fetch {
            url: "https://example.org/gadm41_FRA_0.json".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(err.to_string().contains("https://example.org/gadm41_FRA_0.json"));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::LevelTooHigh {
            requested: 0,
            fallback: 1,
        };
        assert_eq!(
            warning.to_string(),
            "the requested level (0) is higher than the area (1), fallback to 1"
        );
    }
}
