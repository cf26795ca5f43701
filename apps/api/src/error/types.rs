use serde::Serialize;
use ts_rs::TS;

/// Body of every failed Warden API response: `{ "message": ... }`.
///
/// Clients branch on the HTTP status; the message is for display only.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

impl ErrorResponse {
    pub(super) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
