//! Template kinds and the naming rules that tie a symbolic key to a template
//! artifact.
//!
//! # Examples
//!
//! ```
//! use dashgen::core::templates::{ComponentKind, LayoutKind};
//! use std::str::FromStr;
//!
//! assert_eq!(
//!     ComponentKind::Chart.artifact_name("bar"),
//!     "components/chart_bar.tsx.tera"
//! );
//!
//! let layout = LayoutKind::from_str("jacket-reports").unwrap();
//! assert_eq!(layout.template_name(), "layout_jacket_reports.tsx.tera");
//! assert_eq!(layout.to_string(), "jacket-reports");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

use crate::core::schema::{CHART_FIELDS, FILTER_FIELDS};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Suffix shared by every template artifact.
pub const TEMPLATE_SUFFIX: &str = ".tsx.tera";

/// Variables the composer hands to every layout template.
pub const LAYOUT_FIELDS: &[&str] = &[
    "cards",
    "rendered_filters",
    "rendered_charts",
    "include_table",
    "layout_type",
];

/// What a template renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// A single chart fragment
    Chart,
    /// A single filter control fragment
    Filter,
    /// A complete page assembling the fragments
    Layout,
}

impl ComponentKind {
    /// Returns the kind as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Filter => "filter",
            Self::Layout => "layout",
        }
    }

    /// Capitalised name used at the start of error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Chart => "Chart",
            Self::Filter => "Filter",
            Self::Layout => "Layout",
        }
    }

    /// Variables a template of this kind can be given
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Chart => CHART_FIELDS,
            Self::Filter => FILTER_FIELDS,
            Self::Layout => LAYOUT_FIELDS,
        }
    }

    /// Build the artifact name for a template key of this kind.
    ///
    /// Charts and filters live under `components/` with a kind prefix; layouts
    /// sit at the store root and take the key with dashes turned into
    /// underscores.
    pub fn artifact_name(&self, key: &str) -> String {
        match self {
            Self::Chart => format!("components/chart_{key}{TEMPLATE_SUFFIX}"),
            Self::Filter => format!("components/filter_{key}{TEMPLATE_SUFFIX}"),
            Self::Layout => format!("layout_{}{TEMPLATE_SUFFIX}", key.replace('-', "_")),
        }
    }

    /// Recover the key from an artifact name, if the name follows this kind's rule
    pub fn key_from_artifact<'a>(&self, name: &'a str) -> Option<&'a str> {
        let stem = name.strip_suffix(TEMPLATE_SUFFIX)?;
        let key = match self {
            Self::Chart => stem.strip_prefix("components/chart_")?,
            Self::Filter => stem.strip_prefix("components/filter_")?,
            Self::Layout => stem.strip_prefix("layout_")?,
        };
        if key.is_empty() || key.contains('/') {
            return None;
        }
        Some(key)
    }

    /// Returns an iterator over all component kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use ComponentKind::*;
        [Chart, Filter, Layout].iter().copied()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two page arrangements a request can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Cards row, filter sidebar and alleys of charts
    MinimalReports,
    /// Filter bar, split cards and lanes of charts
    JacketReports,
}

impl LayoutKind {
    /// Returns the layout identifier as used in requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinimalReports => "minimal-reports",
            Self::JacketReports => "jacket-reports",
        }
    }

    /// Artifact name of the layout's template
    pub fn template_name(&self) -> String {
        ComponentKind::Layout.artifact_name(self.as_str())
    }

    /// Returns an iterator over all layout kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use LayoutKind::*;
        [MinimalReports, JacketReports].iter().copied()
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal-reports" => Ok(Self::MinimalReports),
            "jacket-reports" => Ok(Self::JacketReports),
            _ => Err(format!("Unknown layout kind: {s}")),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
