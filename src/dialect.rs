//! Template dialect table and resolver.
//!
//! Heat accepts two template formats that describe the same resources with
//! different field names:
//!
//! | Field          | HOT                     | CFN                                                   |
//! |----------------|-------------------------|-------------------------------------------------------|
//! | version marker | `heat_template_version` | `HeatTemplateFormatVersion`, `AWSTemplateFormatVersion` |
//! | resources      | `resources`             | `Resources`                                           |
//! | type           | `type`                  | `Type`                                                |
//! | properties     | `properties`            | `Properties`                                          |
//! | dependencies   | `depends_on`            | `DependsOn`                                           |
//! | reference      | `get_resource`          | `Ref`                                                 |
//!
//! [`Dialect::resolve`] picks the dialect once per document; every later field
//! access goes through the returned [`DialectFields`].

use regex::Regex;
use serde_yaml::Value;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use crate::core::HeatVizError;

/// Marker value reported when a document carries no version marker at all.
pub const NO_MARKER: &str = "<none>";

/// Field-name aliases of one dialect.
#[derive(Debug, PartialEq, Eq)]
pub struct DialectFields {
    /// Top-level fields that carry the template version
    pub version_markers: &'static [&'static str],
    /// Top-level mapping of resource key to resource
    pub resources: &'static str,
    /// Resource type field
    pub resource_type: &'static str,
    /// Resource properties field
    pub properties: &'static str,
    /// Explicit dependency list field (string or list of strings)
    pub depends_on: &'static str,
    /// Intrinsic function naming another resource
    pub get_resource: &'static str,
}

static HOT_FIELDS: DialectFields = DialectFields {
    version_markers: &["heat_template_version"],
    resources: "resources",
    resource_type: "type",
    properties: "properties",
    depends_on: "depends_on",
    get_resource: "get_resource",
};

static CFN_FIELDS: DialectFields = DialectFields {
    version_markers: &["HeatTemplateFormatVersion", "AWSTemplateFormatVersion"],
    resources: "Resources",
    resource_type: "Type",
    properties: "Properties",
    depends_on: "DependsOn",
    get_resource: "Ref",
};

const HOT_RELEASES: &[&str] = &[
    "newton", "ocata", "pike", "queens", "rocky", "stein", "train", "ussuri", "victoria",
    "wallaby", "xena", "yoga", "zed",
];

const HOT_DATES: &[&str] = &[
    "2013-05-23",
    "2014-10-16",
    "2015-04-30",
    "2015-10-15",
    "2016-04-08",
    "2016-10-14",
    "2017-02-24",
    "2017-09-01",
    "2018-03-02",
    "2018-08-31",
    "2021-04-16",
];

const CFN_VERSIONS: &[&str] = &["2012-12-12", "2010-09-09"];

static HOT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(20\d{{2}}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])|{})$",
        HOT_RELEASES.join("|")
    );
    Regex::new(&pattern).expect("HOT version pattern is valid")
});

/// One of the two supported template dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// OpenStack Heat Orchestration Template
    Hot,
    /// CloudFormation-compatible format
    Cfn,
}

impl Dialect {
    /// All dialects in resolution order.
    #[must_use]
    pub const fn all() -> &'static [Dialect] {
        &[Dialect::Hot, Dialect::Cfn]
    }

    /// Field aliases for this dialect.
    #[must_use]
    pub fn fields(self) -> &'static DialectFields {
        match self {
            Dialect::Hot => &HOT_FIELDS,
            Dialect::Cfn => &CFN_FIELDS,
        }
    }

    /// Whether `version` is a value this dialect's marker may carry.
    #[must_use]
    pub fn accepts(self, version: &str) -> bool {
        match self {
            Dialect::Hot => HOT_VERSION.is_match(version),
            Dialect::Cfn => CFN_VERSIONS.contains(&version),
        }
    }

    /// Select the dialect of a parsed template.
    ///
    /// Each dialect's marker fields are checked in table order and the first
    /// dialect whose predicate accepts its marker value wins.
    ///
    /// # Errors
    ///
    /// [`HeatVizError::UnrecognizedDialect`] naming the first marker value seen,
    /// or [`NO_MARKER`] when the document has none.
    pub fn resolve(document: &Value) -> Result<Self, HeatVizError> {
        let mut offending: Option<String> = None;

        for dialect in Self::all() {
            for marker in dialect.fields().version_markers {
                let Some(value) = document.get(*marker) else {
                    continue;
                };
                let version = scalar_text(value).unwrap_or_else(|| format!("{value:?}"));
                if dialect.accepts(&version) {
                    debug!("Resolved dialect {dialect} from {marker}: {version}");
                    return Ok(*dialect);
                }
                debug!("Marker {marker} has unsupported value '{version}'");
                offending.get_or_insert(version);
            }
        }

        Err(HeatVizError::UnrecognizedDialect {
            marker: offending.unwrap_or_else(|| NO_MARKER.to_string()),
        })
    }

    /// Closest known version literal to `marker`, for error suggestions.
    #[must_use]
    pub fn closest_version(marker: &str) -> Option<&'static str> {
        let threshold = (marker.len() / 3).max(1);
        HOT_DATES
            .iter()
            .chain(HOT_RELEASES)
            .chain(CFN_VERSIONS)
            .map(|candidate| (strsim::levenshtein(marker, candidate), *candidate))
            .filter(|(distance, _)| *distance <= threshold)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Hot => write!(f, "HOT"),
            Dialect::Cfn => write!(f, "CFN"),
        }
    }
}

/// String form of a scalar YAML value; `None` for mappings, sequences and null.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
