use url::Url;

/// Checks that `raw` is an absolute http(s) URL with a host.
///
/// Both front-ends validate before calling the engine; the engine itself
/// performs no validation.
pub(crate) fn validate_url(raw: &str) -> Result<(), String> {
    let parsed = Url::parse(raw).map_err(|err| format!("invalid url: {err}"))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("url scheme must be http or https, got '{other}'")),
    }

    if parsed.host_str().is_none() {
        return Err("url must have a host".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?query=1").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(validate_url("").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("example.com").is_err());
    }
}
