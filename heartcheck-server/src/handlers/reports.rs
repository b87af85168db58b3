//! Report download handler

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use heartcheck_core::constants::{REPORT_FILENAME, REPORT_MIME};

use crate::middleware::auth::UserContext;
use crate::{AppError, AppResult};

/// PDF report for the session's most recent prediction
pub async fn download(user: UserContext) -> AppResult<Response> {
    let report = user.session.lock().report();

    let bytes = report
        .ok_or_else(|| AppError::NotFound("No prediction has been made in this session".to_string()))??;

    tracing::debug!("Report for {}: {} bytes", user.username, bytes.len());

    Ok(attachment(REPORT_MIME, REPORT_FILENAME, bytes))
}

/// Binary download with `Content-Disposition: attachment`
pub(crate) fn attachment(mime: &str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        bytes,
    )
        .into_response()
}
