//! Turning sample files into URLs the survey page can fetch.

/// URL prefix under which the static directory is served.
pub const STATIC_MOUNT: &str = "/static";

/// Build the public URL of a sample file.
///
/// `folder` is the sample folder relative to the static directory and may
/// contain `/`. Each path segment is percent-encoded.
pub fn sample_url(folder: &str, file_name: &str) -> String {
    let mut url = String::from(STATIC_MOUNT);
    for segment in folder.split('/').filter(|s| !s.is_empty()) {
        url.push('/');
        url.push_str(&encode_segment(segment));
    }
    url.push('/');
    url.push_str(&encode_segment(file_name));
    url
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
