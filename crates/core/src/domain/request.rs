use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ModelCatalog;
use crate::domain::employee::Employee;

/// The only request type this workflow handles upstream.
pub const REQUEST_TYPE_LAPTOP: &str = "1";

/// Custom-field slot carrying the requested model.
pub const MODEL_GROUP: &str = "Request Details";
pub const MODEL_ATTRIBUTE: &str = "Model";

/// Rendered when a request carries no model custom field.
pub const MODEL_SENTINEL: &str = "N/A";

/// Flexible key/value extension slot mirrored from the ITSM ticket.
/// Ordered; attribute names are not guaranteed unique, lookups take the
/// first match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(rename = "GroupName")]
    pub group_name: String,
    #[serde(rename = "AttributeName")]
    pub attribute_name: String,
    #[serde(rename = "AttributeValue")]
    pub attribute_value: String,
}

/// Mirrored state of the external ITSM ticket. `ticket_no` stays absent
/// until the service desk assigns one. `status` is the ticket's own
/// vocabulary and is independent from the local workflow status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMetadata {
    #[serde(rename = "ticketNo", skip_serializing_if = "Option::is_none")]
    pub ticket_no: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "summitAiCustomFields", default)]
    pub custom_fields: Vec<CustomField>,
}

/// Local workflow status as reported by the process engine. The string
/// form is authoritative; the numeric id is only present on some
/// engine revisions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetail {
    pub status: String,
    #[serde(rename = "statusId", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl StatusDetail {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into(), status_id: None, remarks: None }
    }
}

/// Aggregate root for a laptop request. Instances are only produced by
/// the wire layer from engine responses; `request_id` and `task_id` are
/// assigned by the engine, never locally.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaptopRequest {
    pub request_id: String,
    pub subject: String,
    pub request_type_id: String,
    pub created_by: Employee,
    pub created_for: Employee,
    pub created_date: DateTime<Utc>,
    pub request_status: StatusDetail,
    pub summit_meta_data: Option<TicketMetadata>,
    pub assignee: Option<String>,
    pub task_id: Option<String>,
    pub user_process_request_id: Option<String>,
}

impl LaptopRequest {
    /// Value of the first custom field named "Model", or the `"N/A"`
    /// sentinel when the field is absent.
    pub fn model(&self) -> &str {
        self.summit_meta_data
            .as_ref()
            .and_then(|meta| {
                meta.custom_fields.iter().find(|field| field.attribute_name == MODEL_ATTRIBUTE)
            })
            .map(|field| field.attribute_value.as_str())
            .unwrap_or(MODEL_SENTINEL)
    }

    /// ITSM ticket status, verbatim. Distinct from `request_status` and
    /// must be displayed separately; the two vocabularies overlap but
    /// nothing keeps them in sync.
    pub fn ticket_status(&self) -> Option<&str> {
        self.summit_meta_data.as_ref().and_then(|meta| meta.status.as_deref())
    }

    pub fn ticket_no(&self) -> Option<i64> {
        self.summit_meta_data.as_ref().and_then(|meta| meta.ticket_no)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("model `{model}` is not in the supported catalog")]
    UnsupportedModel { model: String },
    #[error("remarks are required for rejection")]
    RemarksRequired,
}

/// Body for `POST /process/start`. Built through [`CreationPayload::build`]
/// so an invalid payload can never reach the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreationPayload {
    #[serde(rename = "createdBy")]
    pub created_by: Employee,
    #[serde(rename = "createdFor")]
    pub created_for: Employee,
    pub subject: String,
    #[serde(rename = "requestTypeId")]
    pub request_type_id: String,
    #[serde(rename = "summitMetaData")]
    pub summit_meta_data: TicketMetadata,
}

impl CreationPayload {
    /// Validates the inputs and assembles the creation body with a
    /// single `Request Details / Model` custom field.
    pub fn build(
        catalog: &ModelCatalog,
        creator: Employee,
        recipient: Employee,
        subject: &str,
        model: &str,
    ) -> Result<Self, ValidationError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        if !catalog.contains(model) {
            return Err(ValidationError::UnsupportedModel { model: model.to_owned() });
        }

        Ok(Self {
            created_by: creator,
            created_for: recipient,
            subject: subject.to_owned(),
            request_type_id: REQUEST_TYPE_LAPTOP.to_owned(),
            summit_meta_data: TicketMetadata {
                custom_fields: vec![CustomField {
                    group_name: MODEL_GROUP.to_owned(),
                    attribute_name: MODEL_ATTRIBUTE.to_owned(),
                    attribute_value: model.to_owned(),
                }],
                ..TicketMetadata::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn employee() -> Employee {
        Employee::new("TR100958", "A. Sherif", "a.sherif@example.com")
    }

    fn request_with_fields(fields: Vec<CustomField>) -> LaptopRequest {
        LaptopRequest {
            request_id: "REQ-1".to_owned(),
            subject: "Need a laptop for fieldwork".to_owned(),
            request_type_id: REQUEST_TYPE_LAPTOP.to_owned(),
            created_by: employee(),
            created_for: employee(),
            created_date: Utc::now(),
            request_status: StatusDetail::new("PENDING"),
            summit_meta_data: Some(TicketMetadata { custom_fields: fields, ..Default::default() }),
            assignee: None,
            task_id: None,
            user_process_request_id: None,
        }
    }

    #[test]
    fn model_returns_first_matching_custom_field() {
        let request = request_with_fields(vec![
            CustomField {
                group_name: MODEL_GROUP.to_owned(),
                attribute_name: "Warranty".to_owned(),
                attribute_value: "3y".to_owned(),
            },
            CustomField {
                group_name: MODEL_GROUP.to_owned(),
                attribute_name: MODEL_ATTRIBUTE.to_owned(),
                attribute_value: "Latitude-E5580".to_owned(),
            },
            CustomField {
                group_name: MODEL_GROUP.to_owned(),
                attribute_name: MODEL_ATTRIBUTE.to_owned(),
                attribute_value: "shadowed".to_owned(),
            },
        ]);

        assert_eq!(request.model(), "Latitude-E5580");
    }

    #[test]
    fn model_sentinel_iff_no_model_field() {
        let without_field = request_with_fields(vec![CustomField {
            group_name: MODEL_GROUP.to_owned(),
            attribute_name: "Warranty".to_owned(),
            attribute_value: "3y".to_owned(),
        }]);
        assert_eq!(without_field.model(), MODEL_SENTINEL);

        let mut without_meta = without_field;
        without_meta.summit_meta_data = None;
        assert_eq!(without_meta.model(), MODEL_SENTINEL);
    }

    #[test]
    fn ticket_status_is_independent_of_request_status() {
        let mut request = request_with_fields(Vec::new());
        request.request_status = StatusDetail::new("IN PROGRESS");
        request.summit_meta_data.as_mut().unwrap().status = Some("Resolved".to_owned());

        assert_eq!(request.ticket_status(), Some("Resolved"));
        assert_eq!(request.request_status.status, "IN PROGRESS");
    }

    #[test]
    fn build_rejects_empty_subject() {
        let error = CreationPayload::build(
            &ModelCatalog::default(),
            employee(),
            employee(),
            "   ",
            "Latitude-E5580",
        )
        .expect_err("blank subject must fail validation");

        assert_eq!(error, ValidationError::EmptySubject);
    }

    #[test]
    fn build_rejects_model_outside_catalog() {
        let error = CreationPayload::build(
            &ModelCatalog::default(),
            employee(),
            employee(),
            "Need a laptop",
            "Commodore-64",
        )
        .expect_err("unknown model must fail validation");

        assert!(matches!(error, ValidationError::UnsupportedModel { model } if model == "Commodore-64"));
    }

    #[test]
    fn build_embeds_single_model_custom_field() {
        let payload = CreationPayload::build(
            &ModelCatalog::default(),
            employee(),
            employee(),
            "Need a laptop for fieldwork",
            "Latitude-E5580",
        )
        .expect("valid inputs");

        assert_eq!(payload.request_type_id, REQUEST_TYPE_LAPTOP);
        assert_eq!(payload.summit_meta_data.custom_fields.len(), 1);
        let field = &payload.summit_meta_data.custom_fields[0];
        assert_eq!(field.group_name, MODEL_GROUP);
        assert_eq!(field.attribute_name, MODEL_ATTRIBUTE);
        assert_eq!(field.attribute_value, "Latitude-E5580");
    }

    #[test]
    fn creation_payload_serializes_with_wire_casing() {
        let payload = CreationPayload::build(
            &ModelCatalog::default(),
            employee(),
            employee(),
            "Need a laptop",
            "Precision-5530",
        )
        .expect("valid inputs");

        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["requestTypeId"], "1");
        assert_eq!(value["createdBy"]["empNumber"], "TR100958");
        assert_eq!(
            value["summitMetaData"]["summitAiCustomFields"][0]["AttributeName"],
            "Model"
        );
    }
}
