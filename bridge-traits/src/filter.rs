//! File Extension Filters
//!
//! A [`FilterSpec`] is one selectable entry in the dialog's file-type list.
//! Filters are always passed as an ordered slice; the order is the order in
//! which the native dialog displays them. Names are not required to be
//! unique.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Named extension filter, e.g. `("Images", "png,jpg")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// User-facing label
    pub name: String,
    /// Extension list separated by `,` or `;`
    pub pattern: String,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Individual extensions of the pattern, in order.
    ///
    /// Accepts `,` and `;` as separators and tolerates `*.ext` / `.ext`
    /// spellings, so `"*.png; .jpg"` yields `["png", "jpg"]`.
    pub fn extensions(&self) -> Vec<&str> {
        self.pattern
            .split([',', ';'])
            .map(str::trim)
            .map(|ext| ext.strip_prefix("*.").unwrap_or(ext))
            .map(|ext| ext.strip_prefix('.').unwrap_or(ext))
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Pattern in the form the native library expects (`ext1,ext2`).
    pub fn native_spec(&self) -> String {
        self.extensions().join(",")
    }

    /// Reject filters the native side cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.name.contains('\0') {
            return Err(BridgeError::InvalidArgument(format!(
                "filter name {:?} contains a NUL byte",
                self.name
            )));
        }
        if self.pattern.contains('\0') {
            return Err(BridgeError::InvalidArgument(format!(
                "filter pattern for {:?} contains a NUL byte",
                self.name
            )));
        }
        if self.extensions().is_empty() {
            return Err(BridgeError::InvalidArgument(format!(
                "filter {:?} has no extensions",
                self.name
            )));
        }
        Ok(())
    }
}

impl<N, P> From<(N, P)> for FilterSpec
where
    N: Into<String>,
    P: Into<String>,
{
    fn from((name, pattern): (N, P)) -> Self {
        Self::new(name, pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_accept_both_separators() {
        let filter = FilterSpec::new("Images", "png,jpg;gif");
        assert_eq!(filter.extensions(), vec!["png", "jpg", "gif"]);
        assert_eq!(filter.native_spec(), "png,jpg,gif");
    }

    #[test]
    fn test_extensions_strip_wildcards_and_whitespace() {
        let filter = FilterSpec::new("Docs", " *.txt ; .md,, rst ");
        assert_eq!(filter.extensions(), vec!["txt", "md", "rst"]);
        assert_eq!(filter.native_spec(), "txt,md,rst");
    }

    #[test]
    fn test_validate_rejects_nul_bytes() {
        assert!(matches!(
            FilterSpec::new("Ima\0ges", "png").validate(),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            FilterSpec::new("Images", "png\0").validate(),
            Err(BridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_pattern() {
        let err = FilterSpec::new("Nothing", " ; , ").validate().unwrap_err();
        assert!(err.to_string().contains("Nothing"));
    }

    #[test]
    fn test_from_tuple() {
        let filter: FilterSpec = ("Source", "rs").into();
        assert_eq!(filter, FilterSpec::new("Source", "rs"));
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let filter = FilterSpec::new("Images", "png,jpg");
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["name"], "Images");
        assert_eq!(json["pattern"], "png,jpg");
    }
}
