/// Host portion of a story URL with any leading `www.` removed.
///
/// Example: "https://www.github.com/foo/bar" -> Some("github.com")
pub fn display_host(url: &str) -> Option<String> {
    let url = url.trim();

    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };

    // Host ends at the first path, query or fragment delimiter
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()?;
    // Drop credentials and port
    let host = authority.rsplit('@').next()?.split(':').next()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}
