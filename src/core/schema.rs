//! Request schema for dashboard layout descriptions.
//!
//! The schema is enforced in two passes: a structural walk over the raw JSON
//! that records every missing or mistyped field, followed by a `serde`
//! deserialization into the typed [`LayoutConfig`] once the walk is clean.
//! Optional fields treat `null` and absence identically.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Color applied to charts that do not specify one.
pub const DEFAULT_CHART_COLOR: &str = "#8884d8";

/// Fields a chart template may read.
pub const CHART_FIELDS: &[&str] = &["type", "title", "x", "y", "group_by", "color"];

/// Fields a filter template may read.
pub const FILTER_FIELDS: &[&str] = &["type", "label", "id", "options"];

/// A single chart inside an alley or lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: String,
    pub title: String,
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub group_by: Option<String>,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
}

/// A single filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(rename = "type")]
    pub filter_type: String,
    pub label: String,
    pub id: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// An ordered group of charts. Alleys and lanes share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub charts: Vec<ChartConfig>,
}

/// Root of a generate-code request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// `"minimal-reports"` or `"jacket-reports"`; checked when the layout
    /// template is resolved, not here.
    pub layout: String,
    pub cards: Vec<String>,
    pub filters: Vec<FilterConfig>,
    #[serde(default)]
    pub alleys: Option<Vec<SectionConfig>>,
    #[serde(default)]
    pub lanes: Option<Vec<SectionConfig>>,
    #[serde(default, deserialize_with = "bool_or_default")]
    pub include_table: bool,
}

impl LayoutConfig {
    /// Sections to render: `alleys` when present and non-empty, otherwise
    /// `lanes`, otherwise nothing.
    pub fn chart_sections(&self) -> &[SectionConfig] {
        match (&self.alleys, &self.lanes) {
            (Some(alleys), _) if !alleys.is_empty() => alleys.as_slice(),
            (_, Some(lanes)) => lanes.as_slice(),
            _ => &[],
        }
    }
}

fn default_color() -> String {
    DEFAULT_CHART_COLOR.to_string()
}

fn color_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_color))
}

fn bool_or_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// One step in the location of a field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single malformed or missing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.loc.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}", path.join("."), self.msg)
    }
}

/// Every problem found while validating a request body.
#[derive(Debug, Clone, Error)]
#[error("request validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a raw JSON body and convert it into a [`LayoutConfig`].
///
/// All problems are collected before returning, so a caller sees every bad
/// field at once rather than only the first.
pub fn validate(body: &JsonValue) -> Result<LayoutConfig, ValidationError> {
    let mut walker = Walker::default();
    let root = vec![LocSegment::Key("body".to_string())];

    if let Some(obj) = walker.object(body, &root) {
        walker.required_str(obj, "layout", &root);
        walker.required_str_list(obj, "cards", &root);

        if let Some(filters) = walker.list(obj, "filters", &root, true) {
            let loc = child(&root, "filters");
            for (index, filter) in filters.iter().enumerate() {
                walker.filter(filter, &indexed(&loc, index));
            }
        }

        for key in ["alleys", "lanes"] {
            if let Some(sections) = walker.list(obj, key, &root, false) {
                let loc = child(&root, key);
                for (index, section) in sections.iter().enumerate() {
                    walker.section(section, &indexed(&loc, index));
                }
            }
        }

        walker.optional_bool(obj, "include_table", &root);
    }

    if !walker.errors.is_empty() {
        return Err(ValidationError {
            errors: walker.errors,
        });
    }

    serde_json::from_value(body.clone()).map_err(|e| ValidationError {
        errors: vec![FieldError {
            loc: root,
            msg: e.to_string(),
            kind: "value_error",
        }],
    })
}

fn child(loc: &[LocSegment], key: &str) -> Vec<LocSegment> {
    let mut next = loc.to_vec();
    next.push(LocSegment::Key(key.to_string()));
    next
}

fn indexed(loc: &[LocSegment], index: usize) -> Vec<LocSegment> {
    let mut next = loc.to_vec();
    next.push(LocSegment::Index(index));
    next
}

#[derive(Default)]
struct Walker {
    errors: Vec<FieldError>,
}

impl Walker {
    fn push(&mut self, loc: Vec<LocSegment>, msg: &str, kind: &'static str) {
        self.errors.push(FieldError {
            loc,
            msg: msg.to_string(),
            kind,
        });
    }

    fn missing(&mut self, loc: Vec<LocSegment>) {
        self.push(loc, "field required", "missing");
    }

    fn object<'a>(
        &mut self,
        value: &'a JsonValue,
        loc: &[LocSegment],
    ) -> Option<&'a Map<String, JsonValue>> {
        let obj = value.as_object();
        if obj.is_none() {
            self.push(loc.to_vec(), "input should be a valid object", "dict_type");
        }
        obj
    }

    /// Look up `key`; absent and `null` are the same for optional fields.
    fn field<'a>(
        &mut self,
        obj: &'a Map<String, JsonValue>,
        key: &str,
        loc: &[LocSegment],
        required: bool,
    ) -> Option<&'a JsonValue> {
        match obj.get(key) {
            Some(JsonValue::Null) | None => {
                if required {
                    self.missing(child(loc, key));
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    fn string_at(&mut self, value: &JsonValue, loc: Vec<LocSegment>) {
        if !value.is_string() {
            self.push(loc, "input should be a valid string", "string_type");
        }
    }

    fn required_str(&mut self, obj: &Map<String, JsonValue>, key: &str, loc: &[LocSegment]) {
        if let Some(value) = self.field(obj, key, loc, true) {
            self.string_at(value, child(loc, key));
        }
    }

    fn optional_str(&mut self, obj: &Map<String, JsonValue>, key: &str, loc: &[LocSegment]) {
        if let Some(value) = self.field(obj, key, loc, false) {
            self.string_at(value, child(loc, key));
        }
    }

    fn list<'a>(
        &mut self,
        obj: &'a Map<String, JsonValue>,
        key: &str,
        loc: &[LocSegment],
        required: bool,
    ) -> Option<&'a Vec<JsonValue>> {
        let value = self.field(obj, key, loc, required)?;
        let items = value.as_array();
        if items.is_none() {
            self.push(child(loc, key), "input should be a valid list", "list_type");
        }
        items
    }

    fn str_items(&mut self, items: &[JsonValue], loc: &[LocSegment]) {
        for (index, item) in items.iter().enumerate() {
            self.string_at(item, indexed(loc, index));
        }
    }

    fn required_str_list(&mut self, obj: &Map<String, JsonValue>, key: &str, loc: &[LocSegment]) {
        if let Some(items) = self.list(obj, key, loc, true) {
            self.str_items(items, &child(loc, key));
        }
    }

    fn optional_str_list(&mut self, obj: &Map<String, JsonValue>, key: &str, loc: &[LocSegment]) {
        if let Some(items) = self.list(obj, key, loc, false) {
            self.str_items(items, &child(loc, key));
        }
    }

    fn optional_bool(&mut self, obj: &Map<String, JsonValue>, key: &str, loc: &[LocSegment]) {
        if let Some(value) = self.field(obj, key, loc, false) {
            if !value.is_boolean() {
                self.push(child(loc, key), "input should be a valid boolean", "bool_type");
            }
        }
    }

    fn filter(&mut self, value: &JsonValue, loc: &[LocSegment]) {
        let Some(obj) = self.object(value, loc) else {
            return;
        };
        for key in ["type", "label", "id"] {
            self.required_str(obj, key, loc);
        }
        self.optional_str_list(obj, "options", loc);
    }

    fn section(&mut self, value: &JsonValue, loc: &[LocSegment]) {
        let Some(obj) = self.object(value, loc) else {
            return;
        };
        if let Some(charts) = self.list(obj, "charts", loc, true) {
            let charts_loc = child(loc, "charts");
            for (index, chart) in charts.iter().enumerate() {
                self.chart(chart, &indexed(&charts_loc, index));
            }
        }
    }

    fn chart(&mut self, value: &JsonValue, loc: &[LocSegment]) {
        let Some(obj) = self.object(value, loc) else {
            return;
        };
        for key in ["type", "title", "x", "y"] {
            self.required_str(obj, key, loc);
        }
        self.optional_str(obj, "group_by", loc);
        self.optional_str(obj, "color", loc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_body() -> JsonValue {
        json!({
            "layout": "minimal-reports",
            "cards": ["Revenue"],
            "filters": [{"type": "dropdown", "label": "Region", "id": "region"}],
            "alleys": [{"charts": [{"type": "bar", "title": "Sales", "x": "month", "y": "total"}]}],
            "include_table": true
        })
    }

    fn locs(err: &ValidationError) -> Vec<String> {
        err.errors
            .iter()
            .map(|e| {
                e.loc
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect()
    }

    #[test]
    fn test_validate_accepts_minimal_request() {
        let config = validate(&minimal_body()).unwrap();
        assert_eq!(config.layout, "minimal-reports");
        assert_eq!(config.cards, vec!["Revenue".to_string()]);
        assert_eq!(config.filters[0].filter_type, "dropdown");
        assert!(config.filters[0].options.is_none());
        assert!(config.include_table);
        assert!(config.lanes.is_none());
    }

    #[test]
    fn test_defaults_applied_when_absent() {
        let config = validate(&json!({
            "layout": "jacket-reports",
            "cards": [],
            "filters": [],
            "lanes": [{"charts": [{"type": "line", "title": "T", "x": "a", "y": "b"}]}]
        }))
        .unwrap();
        assert!(!config.include_table);
        let chart = &config.chart_sections()[0].charts[0];
        assert_eq!(chart.color, DEFAULT_CHART_COLOR);
        assert!(chart.group_by.is_none());
    }

    #[test]
    fn test_null_treated_as_absent() {
        let config = validate(&json!({
            "layout": "minimal-reports",
            "cards": [],
            "filters": [{"type": "slider", "label": "L", "id": "l", "options": null}],
            "alleys": null,
            "lanes": null,
            "include_table": null
        }))
        .unwrap();
        assert!(config.alleys.is_none());
        assert!(!config.include_table);
        assert!(config.filters[0].options.is_none());

        let config = validate(&json!({
            "layout": "minimal-reports",
            "cards": [],
            "filters": [],
            "alleys": [{"charts": [{"type": "pie", "title": "T", "x": "a", "y": "b", "color": null}]}]
        }))
        .unwrap();
        assert_eq!(config.chart_sections()[0].charts[0].color, DEFAULT_CHART_COLOR);
    }

    #[test]
    fn test_validate_collects_every_error() {
        let err = validate(&json!({
            "cards": "Revenue",
            "filters": [{"type": "dropdown", "label": 3}],
            "alleys": [{"charts": [{"type": "bar", "title": "T", "x": "a"}]}],
            "include_table": "yes"
        }))
        .unwrap_err();

        let locs = locs(&err);
        assert_eq!(
            locs,
            vec![
                "body.layout",
                "body.cards",
                "body.filters.0.label",
                "body.filters.0.id",
                "body.alleys.0.charts.0.y",
                "body.include_table",
            ]
        );
        assert_eq!(err.errors[0].kind, "missing");
        assert_eq!(err.errors[1].kind, "list_type");
        assert_eq!(err.errors[2].kind, "string_type");
        assert_eq!(err.errors[5].kind, "bool_type");
    }

    #[test]
    fn test_validate_rejects_non_object_body() {
        let err = validate(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].kind, "dict_type");
        assert_eq!(locs(&err), vec!["body"]);
    }

    #[test]
    fn test_validate_rejects_non_string_options() {
        let err = validate(&json!({
            "layout": "minimal-reports",
            "cards": ["A", 2],
            "filters": [{"type": "multichoice", "label": "L", "id": "l", "options": ["a", false]}]
        }))
        .unwrap_err();
        assert_eq!(locs(&err), vec!["body.cards.1", "body.filters.0.options.1"]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut body = minimal_body();
        body["theme"] = json!("dark");
        assert!(validate(&body).is_ok());
    }

    #[test]
    fn test_chart_sections_prefers_non_empty_alleys() {
        let config = validate(&json!({
            "layout": "minimal-reports",
            "cards": [],
            "filters": [],
            "alleys": [{"charts": [{"type": "bar", "title": "Alley", "x": "a", "y": "b"}]}],
            "lanes": [{"charts": [{"type": "bar", "title": "Lane", "x": "a", "y": "b"}]}]
        }))
        .unwrap();
        assert_eq!(config.chart_sections()[0].charts[0].title, "Alley");
    }

    #[test]
    fn test_chart_sections_falls_back_to_lanes_when_alleys_empty() {
        let config = validate(&json!({
            "layout": "jacket-reports",
            "cards": [],
            "filters": [],
            "alleys": [],
            "lanes": [{"charts": [{"type": "bar", "title": "Lane", "x": "a", "y": "b"}]}]
        }))
        .unwrap();
        assert_eq!(config.chart_sections()[0].charts[0].title, "Lane");
    }

    #[test]
    fn test_chart_sections_empty_when_neither_present() {
        let config = validate(&json!({
            "layout": "jacket-reports",
            "cards": [],
            "filters": []
        }))
        .unwrap();
        assert!(config.chart_sections().is_empty());
    }

    #[test]
    fn test_chart_serializes_every_template_field() {
        let config = validate(&minimal_body()).unwrap();
        let chart = serde_json::to_value(&config.chart_sections()[0].charts[0]).unwrap();
        let keys: Vec<&str> = chart.as_object().unwrap().keys().map(String::as_str).collect();
        for field in CHART_FIELDS {
            assert!(keys.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_validation_error_display() {
        let err = validate(&json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "request validation failed: body.layout: field required; \
             body.cards: field required; body.filters: field required"
        );
    }
}
