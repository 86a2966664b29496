//! Friendly URL generation for content nodes.

use log::{debug, trace};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::config::LinkProviderConfig;
use crate::decode::{percent_decode, NameDecoder, StandardDecoder};
use crate::model::{is_within, ContentNode, SiteContext, UrlOptions};
use crate::normalize::normalize;
use crate::store::ContentStore;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Produces the store-native URL of a node, before any friendly rewriting.
pub trait BaseUrlGenerator: Send + Sync {
    fn base_url(&self, node: &ContentNode, site: &SiteContext, options: &UrlOptions) -> String;
}

/// Default base generator.
///
/// The URL path is the node's path below the owning site's start path, with
/// names encoded through the store's name replacements.
pub struct SiteUrlBuilder<'a> {
    sites: &'a [SiteContext],
    store: &'a dyn ContentStore,
    encoder: StandardDecoder,
    extension: String,
}

impl<'a> SiteUrlBuilder<'a> {
    pub fn new(
        sites: &'a [SiteContext],
        store: &'a dyn ContentStore,
        config: &LinkProviderConfig,
    ) -> Self {
        Self {
            sites,
            store,
            encoder: config.decoder(),
            extension: config.extension.clone(),
        }
    }

    /// Site with the deepest start path containing the node
    fn owning_site(&self, node: &ContentNode) -> Option<&'a SiteContext> {
        self.sites
            .iter()
            .filter(|site| is_within(&node.full_path, &site.start_path))
            .max_by_key(|site| site.start_path.trim_end_matches('/').len())
    }

    fn encoded_path(&self, node: &ContentNode, site: &SiteContext, options: &UrlOptions) -> String {
        let start = site.start_path.trim_end_matches('/');
        let (mut current, relative) = if is_within(&node.full_path, start) {
            (start.to_string(), &node.full_path[start.len()..])
        } else {
            (String::new(), node.full_path.as_str())
        };

        let mut segments = Vec::new();
        for name in relative.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(name);

            let label = match self.store.lookup(&current) {
                Some(found) if options.use_display_name => found.label(),
                _ => name,
            };
            let encoded = self.encoder.encode_store_name(label);
            segments.push(utf8_percent_encode(&encoded, SEGMENT).to_string());
        }

        let mut path = String::new();
        if options.language_embedding {
            if let Some(language) = options.language.as_ref().or(site.language.as_ref()) {
                path.push('/');
                path.push_str(language);
            }
        }

        for segment in &segments {
            path.push('/');
            path.push_str(segment);
        }

        if path.is_empty() {
            return "/".to_string();
        }
        if options.add_extension && !segments.is_empty() {
            path.push_str(&self.extension);
        }
        if options.lowercase_urls {
            path = path.to_lowercase();
        }
        path
    }
}

impl BaseUrlGenerator for SiteUrlBuilder<'_> {
    fn base_url(&self, node: &ContentNode, site: &SiteContext, options: &UrlOptions) -> String {
        let owner = if options.site_resolving {
            self.owning_site(node).unwrap_or(site)
        } else {
            site
        };

        let path = self.encoded_path(node, owner, options);
        let cross_site = !owner.is_named(&site.name);

        if (options.always_include_server_url || cross_site) && !owner.host_name.is_empty() {
            format!("http://{}{}", owner.host_name, path)
        } else {
            path
        }
    }
}

/// Rewrites base URLs into friendly, normalized URLs.
pub struct LinkProvider<'a> {
    config: &'a LinkProviderConfig,
    store: &'a dyn ContentStore,
    base: &'a dyn BaseUrlGenerator,
    decoder: &'a dyn NameDecoder,
}

impl<'a> LinkProvider<'a> {
    pub fn new(
        config: &'a LinkProviderConfig,
        store: &'a dyn ContentStore,
        base: &'a dyn BaseUrlGenerator,
        decoder: &'a dyn NameDecoder,
    ) -> Self {
        Self {
            config,
            store,
            base,
            decoder,
        }
    }

    /// Whether the base generator's URL should be used as-is
    pub fn should_bypass(&self, node: &ContentNode, site: &SiteContext) -> bool {
        if !self.config.applies_to_site(&site.name) {
            debug!("friendly urls disabled for site {}", site.name);
            return true;
        }

        if self.config.is_administrative(self.store.name()) {
            return true;
        }

        if self.config.only_apply_for_site_content && !is_within(&node.full_path, &site.start_path)
        {
            debug!(
                "{} is outside {}, keeping base url",
                node.full_path, site.start_path
            );
            return true;
        }

        false
    }

    /// Friendly URL of `node` as seen from a request on `site`.
    ///
    /// Same-site links are relative; links to nodes outside the site, or when
    /// the caller asks for a server URL, carry scheme and host.
    pub fn item_url(
        &self,
        node: &ContentNode,
        site: &SiteContext,
        options: &UrlOptions,
        secure: bool,
    ) -> String {
        if self.should_bypass(node, site) {
            return self.base.base_url(node, site, options);
        }

        let forced = UrlOptions {
            always_include_server_url: true,
            site_resolving: true,
            ..options.clone()
        };
        let raw = self.base.base_url(node, site, &forced);
        let (raw_path, host) = split_url(&raw);

        let mut path = normalize(raw_path.trim_start_matches('/'), self.decoder);
        if self.config.trailing_slash && !path.is_empty() && !path.ends_with('/') {
            path.push('/');
        }
        trace!("{} -> base {} -> /{}", node.full_path, raw, path);

        if self.needs_server_url(node, site, options) {
            let scheme = if secure { "https" } else { "http" };
            let host = host.unwrap_or_else(|| site.host_name.clone());
            return format!("{}://{}/{}", scheme, host, path);
        }

        format!("/{}", path)
    }

    fn needs_server_url(&self, node: &ContentNode, site: &SiteContext, options: &UrlOptions) -> bool {
        let root_path = site.root_path.trim_end_matches('/');
        let root_matches = self
            .store
            .lookup(&site.root_path)
            .is_some_and(|root| root.full_path.trim_end_matches('/').eq_ignore_ascii_case(root_path));

        !root_matches || options.always_include_server_url || !is_within(&node.full_path, root_path)
    }
}

/// Decoded path and host of a generated URL.
///
/// Protocol-relative URLs get an `http` scheme; anything that still does not
/// parse is treated as a bare path. The path is taken as written: the `url`
/// crate folds `.`/`..` segments and backslashes, and every segment has to
/// stay one tree name.
fn split_url(raw: &str) -> (String, Option<String>) {
    let repaired = if raw.starts_with("://") {
        format!("http{}", raw)
    } else if raw.starts_with("//") {
        format!("http:{}", raw)
    } else {
        raw.to_string()
    };

    match Url::parse(&repaired) {
        Ok(url) => (
            percent_decode(written_path(&repaired)),
            url.host_str().filter(|h| !h.is_empty()).map(str::to_string),
        ),
        Err(_) => (percent_decode(strip_query(&repaired)), None),
    }
}

/// Path of an absolute URL before dot-segment removal
fn written_path(url: &str) -> &str {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    match after_scheme.find(['/', '\\', '?', '#']) {
        Some(start) => strip_query(&after_scheme[start..]),
        None => "",
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or_default()
}
