use crate::{DbPath, Error};
use url::Url;

/// Parse the database URL, dropping trailing slashes so that the stored root
/// URL never ends with `/` beyond the bare origin.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim()).map_err(|err| Error::InvalidConfig {
        message: "invalid database URL".into(),
        source: Some(Box::new(err)),
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::invalid("database URL must be a hierarchical URL"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::invalid(
            "database URL must not include query or fragment; use default_query_pair for request options",
        ));
    }
    if url.path().ends_with(".json") {
        return Err(Error::invalid(
            "database URL must not include the .json suffix",
        ));
    }

    let trimmed = url.path().trim_end_matches('/').to_owned();
    url.set_path(&trimmed);
    Ok(url)
}

/// `<base>/<key>/<key>.json`, each key percent-encoded. The root resolves to
/// `<base>/.json`.
pub(crate) fn endpoint_url(base_url: &Url, path: &DbPath) -> Result<Url, Error> {
    path.validate()?;

    let mut url = base_url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::invalid("database URL must be a hierarchical URL"))?;
        segments.pop_if_empty();
        let keys: Vec<&str> = path.segments().collect();
        match keys.split_last() {
            None => {
                segments.push(".json");
            }
            Some((last, parents)) => {
                segments.extend(parents);
                segments.push(&format!("{last}.json"));
            }
        }
    }
    Ok(url)
}

/// Address of a location without the REST suffix: what the node is called in
/// the console and in the other SDKs.
pub(crate) fn location_url(base_url: &Url, path: &DbPath) -> String {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(path.segments());
    }
    url.as_str().trim_end_matches('/').to_owned()
}

pub(crate) fn sanitize_url_for_error(url: &Url) -> Url {
    let mut safe = url.clone();
    safe.set_query(None);
    safe.set_fragment(None);
    let _ = safe.set_username("");
    let _ = safe.set_password(None);
    safe
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        let base = normalize_base_url("https://demo.firebaseio.com/app//").unwrap();
        assert_eq!(base.as_str(), "https://demo.firebaseio.com/app");
    }

    #[test]
    fn normalize_rejects_query_and_json_suffix() {
        assert!(normalize_base_url("https://demo.firebaseio.com/?auth=x").is_err());
        assert!(normalize_base_url("https://demo.firebaseio.com/users.json").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn endpoint_url_appends_json_and_encodes_keys() {
        let base = normalize_base_url("https://demo.firebaseio.com").unwrap();
        let url = endpoint_url(&base, &DbPath::parse("users/ada lovelace")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.firebaseio.com/users/ada%20lovelace.json"
        );
    }

    #[test]
    fn endpoint_url_for_root_and_base_path() {
        let base = normalize_base_url("https://demo.firebaseio.com/").unwrap();
        let url = endpoint_url(&base, &DbPath::root()).unwrap();
        assert_eq!(url.as_str(), "https://demo.firebaseio.com/.json");

        let nested = normalize_base_url("http://localhost:9000/ns").unwrap();
        let url = endpoint_url(&nested, &DbPath::parse("a/b")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/ns/a/b.json");
    }

    #[test]
    fn endpoint_url_rejects_invalid_keys() {
        let base = normalize_base_url("https://demo.firebaseio.com").unwrap();
        assert!(endpoint_url(&base, &DbPath::parse("users/a#b")).is_err());
    }

    #[test]
    fn location_url_has_no_trailing_slash() {
        let base = normalize_base_url("https://demo.firebaseio.com/").unwrap();
        assert_eq!(
            location_url(&base, &DbPath::root()),
            "https://demo.firebaseio.com"
        );
        assert_eq!(
            location_url(&base, &DbPath::parse("users/alice")),
            "https://demo.firebaseio.com/users/alice"
        );
    }

    #[test]
    fn sanitize_url_for_error_strips_auth_token() {
        let url = Url::parse("https://demo.firebaseio.com/x.json?auth=secret#frag").unwrap();
        let safe = sanitize_url_for_error(&url);
        assert_eq!(safe.as_str(), "https://demo.firebaseio.com/x.json");
    }
}
