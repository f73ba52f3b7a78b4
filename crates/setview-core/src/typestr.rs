//! Composite type strings.
//!
//! Grammar: `Module.TypeName[-Major.Minor]`, e.g. `KBaseFile.PairedEndLibrary-2.0`.
//! Only the `TypeName` part is shown to users; module and version take part
//! in equality checks on the raw string.

use crate::error::{Error, Result};

/// Short display name for a composite type string.
///
/// Takes the text before the first `-`, then the second `.`-separated
/// segment: `KBaseFile.SingleEndLibrary-2.2` gives `SingleEndLibrary`.
/// Versionless strings are accepted; a missing `.` or an empty name is not.
pub fn display_type(raw: &str) -> Result<String> {
    let qualified = raw.split('-').next().unwrap_or_default();
    match qualified.split('.').nth(1) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        Some(_) => Err(Error::InvalidTypeString(format!("empty type name in '{}'", raw))),
        None => Err(Error::InvalidTypeString(format!(
            "missing module separator in '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_type() {
        assert_eq!(display_type("KBaseFile.Reads-2.0").unwrap(), "Reads");
        assert_eq!(
            display_type("KBaseFile.SingleEndLibrary-2.2").unwrap(),
            "SingleEndLibrary"
        );
    }

    #[test]
    fn test_display_type_without_version() {
        assert_eq!(display_type("KBaseFile.Reads").unwrap(), "Reads");
    }

    #[test]
    fn test_display_type_takes_second_segment_only() {
        assert_eq!(display_type("A.B.C-1.0").unwrap(), "B");
    }

    #[test]
    fn test_display_type_missing_module_separator() {
        assert!(matches!(
            display_type("Reads-1.0"),
            Err(Error::InvalidTypeString(_))
        ));
        assert!(display_type("Reads").is_err());
        assert!(display_type("").is_err());
    }

    #[test]
    fn test_display_type_empty_name() {
        assert!(display_type("KBaseFile.-1.0").is_err());
        assert!(display_type("KBaseFile.").is_err());
    }
}
