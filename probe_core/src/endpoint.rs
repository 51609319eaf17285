use crate::Item;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Which listing endpoint a probe hits. The two variants collapse the
/// original scripts' near-duplicate probes into one parameterized procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeEndpoint {
    /// Base-metadata table listing: `GET /v0/meta/bases/{base}/tables`.
    /// The canonical probe; works whatever the base's tables are called.
    TableMetadata,

    /// Direct record listing: `GET /v0/{base}/{table}?maxRecords=N`
    TableRecords {
        table_name: String,
        view: Option<String>,
    },
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// `/v0/meta/bases/{base}/tables` response shape
#[derive(Debug, Deserialize)]
struct TableListingPayload {
    tables: Vec<TableDescriptor>,
}

#[derive(Debug, Deserialize)]
struct TableDescriptor {
    id: String,
    name: String,
}

/// `/v0/{base}/{table}` response shape
#[derive(Debug, Deserialize)]
struct RecordListingPayload {
    records: Vec<RecordDescriptor>,
}

#[derive(Debug, Deserialize)]
struct RecordDescriptor {
    id: String,
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
}

impl ProbeEndpoint {
    /// Parse a 2xx body into the item projection, preserving response order
    pub fn parse_items(&self, body: &str) -> Result<Vec<Item>, PayloadError> {
        match self {
            ProbeEndpoint::TableMetadata => {
                let payload: TableListingPayload = serde_json::from_str(body)?;
                debug!("Parsed {} tables from metadata listing", payload.tables.len());
                Ok(payload
                    .tables
                    .into_iter()
                    .map(|table| Item {
                        name: table.name,
                        id: table.id,
                    })
                    .collect())
            }
            ProbeEndpoint::TableRecords { .. } => {
                let payload: RecordListingPayload = serde_json::from_str(body)?;
                debug!("Parsed {} records from record listing", payload.records.len());
                Ok(payload
                    .records
                    .into_iter()
                    .map(|record| {
                        // Records have no intrinsic name; use the Name field
                        // when it is a plain string, otherwise the record id
                        let name = record
                            .fields
                            .get("Name")
                            .and_then(|value| value.as_str())
                            .unwrap_or(&record.id)
                            .to_string();
                        Item {
                            name,
                            id: record.id,
                        }
                    })
                    .collect())
            }
        }
    }

    /// Short human description for logs and the report header
    pub fn describe(&self) -> String {
        match self {
            ProbeEndpoint::TableMetadata => "base table metadata".to_string(),
            ProbeEndpoint::TableRecords { table_name, .. } => {
                format!("records of table '{}'", table_name)
            }
        }
    }
}

/// Best-effort extraction of the server's error message. Airtable error
/// bodies come in two shapes:
/// `{"error": {"type": "...", "message": "..."}}` and `{"error": "NOT_FOUND"}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(code) => Some(code.clone()),
        serde_json::Value::Object(fields) => fields
            .get("message")
            .and_then(|message| message.as_str())
            .or_else(|| fields.get("type").and_then(|kind| kind.as_str()))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_metadata_listing_in_order() {
        let body = r#"{
            "tables": [
                {"id": "tbl1", "name": "Content Pipeline", "primaryFieldId": "fld1", "fields": []},
                {"id": "tbl2", "name": "Notes", "primaryFieldId": "fld2", "fields": []}
            ]
        }"#;

        let items = ProbeEndpoint::TableMetadata.parse_items(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Content Pipeline");
        assert_eq!(items[0].id, "tbl1");
        assert_eq!(items[1].name, "Notes");
        assert_eq!(items[1].id, "tbl2");
    }

    #[test]
    fn parses_record_listing_with_name_fallback() {
        let endpoint = ProbeEndpoint::TableRecords {
            table_name: "Content Pipeline".to_string(),
            view: None,
        };
        let body = r#"{
            "records": [
                {"id": "recA", "createdTime": "2024-01-01T00:00:00.000Z", "fields": {"Name": "First draft", "Status": "Todo"}},
                {"id": "recB", "createdTime": "2024-01-02T00:00:00.000Z", "fields": {"Status": "Done"}}
            ]
        }"#;

        let items = endpoint.parse_items(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "First draft");
        assert_eq!(items[0].id, "recA");
        // No Name field: the record id stands in
        assert_eq!(items[1].name, "recB");
        assert_eq!(items[1].id, "recB");
    }

    #[test]
    fn empty_listing_is_a_valid_payload() {
        let items = ProbeEndpoint::TableMetadata
            .parse_items(r#"{"tables": []}"#)
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn malformed_body_is_a_payload_error() {
        assert!(ProbeEndpoint::TableMetadata.parse_items("not json").is_err());
        assert!(ProbeEndpoint::TableMetadata
            .parse_items(r#"{"unexpected": true}"#)
            .is_err());
    }

    #[test]
    fn extracts_structured_error_message() {
        let body = r#"{"error": {"type": "AUTHENTICATION_REQUIRED", "message": "Invalid authentication token"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Invalid authentication token")
        );
    }

    #[test]
    fn extracts_bare_error_code() {
        assert_eq!(
            extract_error_message(r#"{"error": "NOT_FOUND"}"#).as_deref(),
            Some("NOT_FOUND")
        );
    }

    #[test]
    fn falls_back_to_error_type_when_message_is_absent() {
        let body = r#"{"error": {"type": "INVALID_PERMISSIONS"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("INVALID_PERMISSIONS")
        );
    }

    #[test]
    fn tolerates_unparseable_error_bodies() {
        assert_eq!(extract_error_message(""), None);
        assert_eq!(extract_error_message("<html>gateway error</html>"), None);
        assert_eq!(extract_error_message(r#"{"message": "no error key"}"#), None);
    }
}
