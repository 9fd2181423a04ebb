//! Static declarations: the options the host collects and the node models
//! this connector writes.

use serde::Serialize;

pub const BOOK_MODEL: &str = "Book";
pub const PRODUCT_MODEL: &str = "Product";

/// One option shown in the host's configuration UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionField {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub label: &'static str,
    pub help_text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    String,
}

/// A field of a node model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
}

/// A node model declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub name: &'static str,
    /// Name as registered with the host (`type_prefix` + `name`).
    pub type_name: String,
    pub fields: Vec<ModelField>,
}

impl ModelDefinition {
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Credential options: all three are required strings.
pub fn options_schema() -> Vec<OptionField> {
    vec![
        OptionField {
            key: "accessKeyId",
            field_type: FieldType::String,
            required: true,
            label: "Access Key ID",
            help_text: "The access key ID for your AWS account.",
        },
        OptionField {
            key: "secretAccessKey",
            field_type: FieldType::String,
            required: true,
            label: "Secret Access Key",
            help_text: "The secret access key for your AWS account.",
        },
        OptionField {
            key: "bucketName",
            field_type: FieldType::String,
            required: true,
            label: "Bucket Name",
            help_text: "The name of the S3 bucket to fetch data from.",
        },
    ]
}

/// The "Book" and "Product" models, named under `type_prefix`.
///
/// Required-ness is declarative; nothing checks it before a node is created.
pub fn model_definitions(type_prefix: &str) -> Vec<ModelDefinition> {
    vec![
        model(
            type_prefix,
            BOOK_MODEL,
            &["title", "author", "description", "imagePath", "price", "isbn"],
        ),
        model(type_prefix, PRODUCT_MODEL, &["name", "description"]),
    ]
}

fn model(type_prefix: &str, name: &'static str, fields: &[&'static str]) -> ModelDefinition {
    ModelDefinition {
        name,
        type_name: format!("{}{}", type_prefix, name),
        fields: fields
            .iter()
            .map(|&field| ModelField {
                name: field,
                field_type: FieldType::String,
                required: true,
            })
            .collect(),
    }
}
