use url::Url;

/// Resolve a raw href against a base URL and canonicalize it into the
/// form used for visited-set membership and graph node identity.
///
/// Fragments are dropped and trailing slashes are trimmed from non-root
/// paths, so `/about`, `/about/` and `/about#team` all map to one key.
/// Path case is preserved. Hrefs that are not navigable page links
/// (empty, `javascript:`, `mailto:`, bare fragments, unparseable) yield
/// `None` and are dropped by the caller.
pub fn normalize(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
        || href.starts_with('#')
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    Some(normalize_url(&resolved))
}

/// Canonicalize an already-parsed URL. Idempotent:
/// `normalize_url(&normalize_url(u)) == normalize_url(u)`.
pub fn normalize_url(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        // Trim every trailing slash so repeated application is stable;
        // the bare root keeps its slash.
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        let trimmed = trimmed.to_string();
        url.set_path(&trimmed);
    }

    url
}
