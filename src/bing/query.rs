use crate::bing::{BingError, Result};
use reqwest::Url;

/// Build a fully qualified URL from a base (scheme + host), an endpoint path and
/// an ordered list of query parameters.
///
/// The endpoint may carry its own query string; those parameters are kept and
/// `params` are appended after them. Scheme and host always come from `base`,
/// even if `endpoint` is itself an absolute URL.
pub fn build_url<K, V>(base: &str, endpoint: &str, params: &[(K, V)]) -> Result<Url>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base)
        .map_err(|e| BingError::InvalidArgument(format!("invalid base URL `{base}`: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(BingError::InvalidArgument(format!(
            "base URL `{base}` has no host"
        )));
    }

    let (path, query, fragment) = endpoint_parts(endpoint);

    if path.starts_with('/') {
        url.set_path(&path);
    } else {
        url.set_path(&format!("/{path}"));
    }
    url.set_query(query.as_deref().filter(|q| !q.is_empty()));
    url.set_fragment(fragment.as_deref().filter(|f| !f.is_empty()));

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
}

/// Split a URL into its query-less form and its decoded query pairs.
///
/// The pairs are meant to be re-sent as request parameters so the path and the
/// query travel separately.
#[must_use]
pub fn split_query(url: &Url) -> (Url, Vec<(String, String)>) {
    let params = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut bare = url.clone();
    bare.set_query(None);
    bare.set_fragment(None);

    (bare, params)
}

/// Path, query and fragment of an endpoint, dropping any scheme/host it carries.
fn endpoint_parts(endpoint: &str) -> (String, Option<String>, Option<String>) {
    if let Some(absolute) = Url::parse(endpoint).ok().filter(Url::has_host) {
        return (
            absolute.path().to_string(),
            absolute.query().map(str::to_string),
            absolute.fragment().map(str::to_string),
        );
    }

    let (rest, fragment) = match endpoint.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment.to_string())),
        None => (endpoint, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (rest, None),
    };

    (path.to_string(), query, fragment)
}
