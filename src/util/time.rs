/// Milliseconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Milliseconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn timestamp_millis() -> u64 {
    // No wall clock without a JS binding; uniqueness of the
    // generated name is all callers need.
    0
}

/// Default filename for a client-side download of the flattened drawing.
pub fn download_filename() -> String {
    format!("drawing-{}.png", timestamp_millis())
}
