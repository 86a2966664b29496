use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Slash-separated path of raw node names from the tree root, e.g. `/sitecore/content/home`
pub type NodePath = String;

/// A node of the externally owned content tree.
///
/// Nodes are only ever read; children are referenced by full path and kept in
/// store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub name: String,
    pub display_name: Option<String>,
    pub full_path: NodePath,
    pub children: Vec<NodePath>,
}

impl ContentNode {
    /// Display name if set and non-empty, otherwise the raw name
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(display) if !display.is_empty() => display,
            _ => &self.name,
        }
    }
}

/// The site handling the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContext {
    pub name: String,
    /// Host part used for server-qualified URLs
    #[serde(default)]
    pub host_name: String,
    /// Tree path where the site's content begins
    pub root_path: NodePath,
    /// Tree path of the site's home node
    pub start_path: NodePath,
    #[serde(default)]
    pub language: Option<String>,
}

impl SiteContext {
    /// Tree path a host should resolve for a decoded URL path on this site.
    ///
    /// `/products/red-widget` on a site starting at `/sitecore/content/home`
    /// becomes `/sitecore/content/home/products/red-widget`.
    pub fn item_path_for(&self, url_path: &str) -> NodePath {
        let base = self.start_path.trim_end_matches('/');
        let rest = url_path.trim_start_matches('/');

        if rest.is_empty() {
            if base.is_empty() {
                return "/".to_string();
            }
            return base.to_string();
        }

        format!("{}/{}", base, rest)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Options forwarded to the base URL generator.
///
/// A plain value; callers build one per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlOptions {
    pub language: Option<String>,
    /// Prefix the path with `/{language}`
    pub language_embedding: bool,
    /// Append the configured file extension
    pub add_extension: bool,
    pub always_include_server_url: bool,
    /// Let the generator pick the site owning the node instead of the request site
    pub site_resolving: bool,
    pub use_display_name: bool,
    pub lowercase_urls: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Normal,
    Edit,
    Preview,
    Debug,
}

impl RenderMode {
    pub fn is_normal(self) -> bool {
        self == RenderMode::Normal
    }
}

/// Everything the redirect policy needs to know about one inbound request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    /// Path part of the requested URL, as sent by the client
    pub url_path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub secure: bool,
    /// Tree path the host derived for this request
    pub item_path: NodePath,
    pub site: SiteContext,
    pub mode: RenderMode,
    /// Node already resolved by an earlier stage of the host pipeline
    pub resolved: Option<ContentNode>,
    /// File on disk the host already matched for this request
    pub physical_file: Option<PathBuf>,
}

impl RequestContext {
    /// A normal-mode, non-secure request with the item path derived from the site
    pub fn new(site: SiteContext, method: impl Into<String>, url_path: impl Into<String>) -> Self {
        let url_path = url_path.into();
        let item_path = site.item_path_for(&crate::decode::percent_decode(&url_path));

        Self {
            method: method.into(),
            url_path,
            query: None,
            secure: false,
            item_path,
            site,
            mode: RenderMode::Normal,
            resolved: None,
            physical_file: None,
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("get")
    }
}

/// Case-insensitive, segment-aware prefix test: `/a/b` is within `/a` but
/// `/ab` is not.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let ancestor = ancestor.trim_end_matches('/');
    if ancestor.is_empty() {
        return path.starts_with('/');
    }

    let Some(head) = path.get(..ancestor.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(ancestor) {
        return false;
    }

    matches!(path.as_bytes().get(ancestor.len()), None | Some(b'/'))
}
