use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};

/// Wraps `/api` JSON responses in the `{ "success": ..., "data"/"error": ... }`
/// envelope the dashboard frontend expects. File downloads (the CSV export)
/// pass through untouched.
pub async fn wrap_response_middleware(req: Request, next: Next) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;

    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !path.starts_with("/api") || content_type.contains("text/csv") {
        return Ok(res);
    }

    let status = res.status();
    let is_json = content_type.contains("application/json");

    let (mut parts, body) = res.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };

    let wrapped = if is_json {
        let data: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        // Error responses already carry the envelope; leave them as-is.
        if data.as_object().is_some_and(|obj| obj.contains_key("success")) {
            data
        } else if status.is_success() {
            json!({ "success": true, "data": data })
        } else {
            json!({
                "success": false,
                "error": data
                    .as_str()
                    .or(data.get("error").and_then(|v| v.as_str()))
                    .unwrap_or(&status.to_string()),
            })
        }
    } else {
        let message = String::from_utf8_lossy(&bytes).to_string();
        if status.is_success() {
            if message.is_empty() {
                json!({ "success": true, "data": null })
            } else {
                json!({ "success": true, "data": message })
            }
        } else {
            json!({
                "success": false,
                "error": if message.is_empty() { status.to_string() } else { message },
            })
        }
    };

    let new_bytes =
        serde_json::to_vec(&wrapped).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    parts.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    parts.headers.insert(
        header::CONTENT_LENGTH,
        header::HeaderValue::from_str(&new_bytes.len().to_string())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    );

    Ok(Response::from_parts(parts, Body::from(new_bytes)))
}
