//! Parse-don't-trust decoding of engine responses.
//!
//! Observed payload shapes differ across engine revisions: list items
//! are sometimes the request itself and sometimes a task envelope with
//! the request nested under `requestDetails`, custom-field keys are
//! PascalCase, and `requestTypeId` has appeared as `requestType`. Every
//! raw field is optional here; conversion into the typed model either
//! produces a complete [`LaptopRequest`] or reports exactly which field
//! was missing so the record can be dropped and counted, never a
//! half-formed value.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use deskflow_core::{CustomField, Employee, LaptopRequest, StatusDetail, TicketMetadata};
use deskflow_core::domain::request::REQUEST_TYPE_LAPTOP;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("record carries unparseable timestamp `{0}`")]
    BadTimestamp(String),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawEmployee {
    #[serde(rename = "empNumber")]
    pub emp_number: Option<String>,
    #[serde(rename = "empName")]
    pub emp_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCustomField {
    #[serde(rename = "GroupName", alias = "groupName")]
    pub group_name: Option<String>,
    #[serde(rename = "AttributeName", alias = "attributeName")]
    pub attribute_name: Option<String>,
    #[serde(rename = "AttributeValue", alias = "attributeValue")]
    pub attribute_value: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTicketMetadata {
    #[serde(rename = "ticketNo")]
    pub ticket_no: Option<i64>,
    pub message: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "ticketStatus")]
    pub ticket_status: Option<String>,
    #[serde(rename = "summitAiCustomFields", default)]
    pub custom_fields: Vec<RawCustomField>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawStatusDetail {
    pub status: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: Option<i32>,
    pub remarks: Option<String>,
}

/// A list/start record as the engine actually sends it. Flat request
/// fields and the task-envelope shape are both accepted; when both are
/// present the flat value wins, matching the newest revision.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRequestRecord {
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "requestTypeId", alias = "requestType")]
    pub request_type_id: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<RawEmployee>,
    #[serde(rename = "createdFor")]
    pub created_for: Option<RawEmployee>,
    #[serde(rename = "createdDate")]
    pub created_date: Option<String>,
    #[serde(rename = "requestStatus")]
    pub request_status: Option<RawStatusDetail>,
    #[serde(rename = "taskStatus")]
    pub task_status: Option<String>,
    #[serde(rename = "summitMetaData")]
    pub summit_meta_data: Option<RawTicketMetadata>,
    pub assignee: Option<String>,
    #[serde(rename = "taskId")]
    pub task_id: Option<String>,
    #[serde(rename = "userProcessRequestId")]
    pub user_process_request_id: Option<String>,
    #[serde(rename = "requestDetails")]
    pub request_details: Option<Box<RawRequestRecord>>,
}

/// Result of decoding one response body: the records that converted
/// cleanly plus how many were dropped as malformed.
#[derive(Clone, Debug, Default)]
pub struct DecodedBatch {
    pub requests: Vec<LaptopRequest>,
    pub dropped: usize,
}

pub fn decode_records(records: Vec<RawRequestRecord>) -> DecodedBatch {
    let mut batch = DecodedBatch::default();
    for record in records {
        match convert(record) {
            Ok(request) => batch.requests.push(request),
            Err(error) => {
                batch.dropped += 1;
                tracing::warn!(
                    event_name = "wire.record_dropped",
                    error = %error,
                    "dropping malformed workflow record"
                );
            }
        }
    }
    batch
}

/// Converts one raw record into the typed model, merging the task
/// envelope with its nested `requestDetails` where present.
pub fn convert(record: RawRequestRecord) -> Result<LaptopRequest, WireError> {
    let nested = record.request_details.map(|boxed| *boxed).unwrap_or_default();

    let request_id = record
        .request_id
        .or(nested.request_id)
        .ok_or(WireError::MissingField("requestId"))?;
    let subject = record.subject.or(nested.subject).ok_or(WireError::MissingField("subject"))?;
    let created_by = convert_employee(
        record.created_by.or(nested.created_by).ok_or(WireError::MissingField("createdBy"))?,
        "createdBy.empNumber",
    )?;
    let created_for = convert_employee(
        record.created_for.or(nested.created_for).ok_or(WireError::MissingField("createdFor"))?,
        "createdFor.empNumber",
    )?;
    let created_date_raw = record
        .created_date
        .or(nested.created_date)
        .ok_or(WireError::MissingField("createdDate"))?;
    let created_date = parse_timestamp(&created_date_raw)?;

    // Older revisions report the status as a bare `taskStatus` string on
    // the envelope. A request with no reported status at all still
    // renders, as Unknown, rather than being dropped.
    let request_status = record
        .request_status
        .or(nested.request_status)
        .map(convert_status)
        .or_else(|| record.task_status.clone().map(StatusDetail::new))
        .unwrap_or_else(|| StatusDetail::new("Unknown"));

    Ok(LaptopRequest {
        request_id,
        subject,
        request_type_id: record
            .request_type_id
            .or(nested.request_type_id)
            .unwrap_or_else(|| REQUEST_TYPE_LAPTOP.to_owned()),
        created_by,
        created_for,
        created_date,
        request_status,
        summit_meta_data: record
            .summit_meta_data
            .or(nested.summit_meta_data)
            .map(convert_metadata),
        assignee: record.assignee.or(nested.assignee),
        task_id: record.task_id.or(nested.task_id),
        user_process_request_id: record.user_process_request_id.or(nested.user_process_request_id),
    })
}

fn convert_employee(raw: RawEmployee, field: &'static str) -> Result<Employee, WireError> {
    let emp_number = raw.emp_number.ok_or(WireError::MissingField(field))?;
    Ok(Employee {
        emp_number,
        emp_name: raw.emp_name.unwrap_or_default(),
        email: raw.email.unwrap_or_default(),
    })
}

fn convert_status(raw: RawStatusDetail) -> StatusDetail {
    StatusDetail {
        status: raw.status.unwrap_or_else(|| "Unknown".to_owned()),
        status_id: raw.status_id,
        remarks: raw.remarks,
    }
}

fn convert_metadata(raw: RawTicketMetadata) -> TicketMetadata {
    TicketMetadata {
        // A ticket number of zero means "not yet assigned" upstream.
        ticket_no: raw.ticket_no.filter(|no| *no != 0),
        message: raw.message,
        status: raw.status.or(raw.ticket_status),
        custom_fields: raw
            .custom_fields
            .into_iter()
            .filter_map(|field| {
                Some(CustomField {
                    group_name: field.group_name.unwrap_or_default(),
                    attribute_name: field.attribute_name?,
                    attribute_value: field.attribute_value.unwrap_or_default(),
                })
            })
            .collect(),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, WireError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }
    Err(WireError::BadTimestamp(raw.to_owned()))
}
