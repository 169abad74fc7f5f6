/// Source URL handling: display hostnames, unique sources, restricted pages
use url::Url;

/// Schemes the browser never lets an extension capture from
const RESTRICTED_SCHEMES: &[&str] = &[
    "chrome",
    "chrome-extension",
    "chrome-search",
    "edge",
    "about",
    "view-source",
    "devtools",
    "moz-extension",
    "file",
];

/// Hosts that forbid script injection even over https
const RESTRICTED_HOSTS: &[&str] = &["chrome.google.com", "chromewebstore.google.com"];

/// Hostname of a source URL, if it parses and has one
pub fn hostname(source: &str) -> Option<String> {
    Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
}

/// Hostname for display, falling back to the raw source string
pub fn display_domain(source: &str) -> String {
    hostname(source).unwrap_or_else(|| source.to_string())
}

/// Unique display domains in first-seen order, each paired with the first full
/// source URL that resolved to it
pub fn unique_sources<'a, I>(sources: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    sources.into_iter().fold(Vec::new(), |mut unique: Vec<(String, String)>, source| {
        let domain = display_domain(source);
        if !unique.iter().any(|(d, _)| *d == domain) {
            unique.push((domain, source.to_string()));
        }
        unique
    })
}

/// Unique raw source URLs in first-seen order
pub fn unique_links<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(*source))
        .map(str::to_string)
        .collect()
}

/// Whether the page at `page_url` refuses capture
pub fn is_restricted_page(page_url: &str) -> bool {
    match Url::parse(page_url.trim()) {
        Ok(url) => {
            RESTRICTED_SCHEMES.contains(&url.scheme())
                || url.host_str().is_some_and(|host| {
                    RESTRICTED_HOSTS.contains(&host)
                        && (host != "chrome.google.com" || url.path().starts_with("/webstore"))
                })
        }
        // Pages without a parseable URL are never injectable
        Err(_) => true,
    }
}
