use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::paint::Color;
use super::style::TypeStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub component_set_id: Option<String>,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSetMeta {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMeta {
    pub key: String,
    pub name: String,
    pub style_type: String,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// A per-mode variable value. Aliases are tried first since a color has no `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Alias(VariableAlias),
    Color(Color),
    Number(f64),
    Boolean(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub key: String,
    pub variable_collection_id: String,
    pub resolved_type: String,
    #[serde(default)]
    pub values_by_mode: BTreeMap<String, VariableValue>,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMode {
    pub mode_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub id: String,
    pub name: String,
    pub default_mode_id: String,
    #[serde(default)]
    pub modes: Vec<VariableMode>,
    #[serde(default)]
    pub remote: bool,
}

/// A text style with its resolved character style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Style id, as referenced from `node.styles.text`.
    pub id: String,
    #[serde(default)]
    pub key: String,
    pub name: String,
    pub style: TypeStyle,
    #[serde(default)]
    pub fills: Vec<super::paint::Paint>,
}

/// Auxiliary source inputs fetched next to the file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLibraries {
    /// `None` when the variables endpoint was not accessible for this file.
    #[serde(default)]
    pub variables: Option<Vec<Variable>>,
    #[serde(default)]
    pub variable_collections: Vec<VariableCollection>,
    #[serde(default)]
    pub text_styles: Vec<TextStyle>,
}
