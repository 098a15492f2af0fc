use crate::target::{Component, LibraryColor, Shape, Typography};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One attribute assignment of a modify-object operation. A `null` value removes the
/// attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrChange {
    pub attr: String,
    pub val: serde_json::Value,
}

/// A reconciliation step, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    AddColor {
        color: LibraryColor,
    },
    ModifyColor {
        color: LibraryColor,
    },
    RemoveColor {
        id: Uuid,
    },
    AddTypography {
        typography: Typography,
    },
    ModifyTypography {
        typography: Typography,
    },
    RemoveTypography {
        id: Uuid,
    },
    AddComponent {
        component: Component,
    },
    ModifyComponent {
        component: Component,
    },
    RemoveComponent {
        id: Uuid,
    },

    /// Creates an empty page: a white root frame and nothing else.
    AddPage {
        id: Uuid,
        name: String,
    },
    ModifyPage {
        id: Uuid,
        name: String,
    },
    /// Removes a page together with every object on it.
    RemovePage {
        id: Uuid,
    },

    AddObject {
        #[serde(rename = "page-id")]
        page_id: Uuid,
        obj: Box<Shape>,
    },
    ModifyObject {
        #[serde(rename = "page-id")]
        page_id: Uuid,
        id: Uuid,
        operations: Vec<AttrChange>,
    },
    RemoveObject {
        #[serde(rename = "page-id")]
        page_id: Uuid,
        id: Uuid,
    },
}

impl Operation {
    pub fn type_name(&self) -> &'static str {
        match self {
            Operation::AddColor { .. } => "add-color",
            Operation::ModifyColor { .. } => "modify-color",
            Operation::RemoveColor { .. } => "remove-color",
            Operation::AddTypography { .. } => "add-typography",
            Operation::ModifyTypography { .. } => "modify-typography",
            Operation::RemoveTypography { .. } => "remove-typography",
            Operation::AddComponent { .. } => "add-component",
            Operation::ModifyComponent { .. } => "modify-component",
            Operation::RemoveComponent { .. } => "remove-component",
            Operation::AddPage { .. } => "add-page",
            Operation::ModifyPage { .. } => "modify-page",
            Operation::RemovePage { .. } => "remove-page",
            Operation::AddObject { .. } => "add-object",
            Operation::ModifyObject { .. } => "modify-object",
            Operation::RemoveObject { .. } => "remove-object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_type_tag() {
        let page_id = Uuid::nil();
        let op = Operation::RemoveObject {
            page_id,
            id: page_id,
        };
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["type"], json!("remove-object"));
        assert_eq!(value["page-id"], json!(page_id.to_string()));
        assert_eq!(op.type_name(), "remove-object");

        let parsed: Operation = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, op);
    }
}
