use veridoc_blob::BlobError;

/// Classify an AWS SDK error string into the appropriate [`BlobError`].
///
/// This helper inspects the error message for common patterns (missing key,
/// timeout, connection) and maps them to the correct variant.
pub fn classify_sdk_error(key: &str, error_str: &str) -> BlobError {
    let lower = error_str.to_lowercase();
    if lower.contains("nosuchkey") || lower.contains("not found") || lower.contains("404") {
        BlobError::NotFound(key.to_owned())
    } else if lower.contains("timeout") || lower.contains("timed out") {
        BlobError::Timeout
    } else if lower.contains("connection")
        || lower.contains("connect")
        || lower.contains("dns")
        || lower.contains("network")
    {
        BlobError::Connection(error_str.to_owned())
    } else {
        BlobError::Service(error_str.to_owned())
    }
}
