use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;

/// Used wherever a recipe has no usable image.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Returns true if `candidate` is an absolute URL with both a scheme and a host.
///
/// The host must be spelled out after `//`; forms like `https:example.com`
/// that a lenient parser would repair are rejected. Anything that fails to
/// parse is simply not valid; this never errors.
pub fn is_valid_url(candidate: &str) -> bool {
    if !has_authority(candidate) {
        return false;
    }
    match Url::parse(candidate) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

fn has_authority(candidate: &str) -> bool {
    candidate
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"))
}

/// Picks `candidate` when it is a valid URL or an embedded image, `placeholder` otherwise.
pub fn resolve_image_url<'a>(candidate: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match candidate {
        Some(url) if is_valid_url(url) || url.starts_with(DATA_URL_PREFIX) => url,
        _ => placeholder,
    }
}

/// Embeds raw image bytes as a self-contained `data:` URL
pub fn image_data_url(bytes: &[u8]) -> String {
    format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(bytes))
}
