//! Per-request orchestration: resolve the node, then force its canonical URL.

use log::debug;
use serde::Serialize;

use crate::config::LinkProviderConfig;
use crate::decode::NameDecoder;
use crate::link::{BaseUrlGenerator, LinkProvider};
use crate::model::{ContentNode, RequestContext, UrlOptions};
use crate::normalize::to_relative_url;
use crate::resolver::PathResolver;
use crate::store::ContentStore;

/// A permanent redirect the host should send before it stops processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub status: u16,
    pub location: String,
}

impl Redirect {
    pub const MOVED_PERMANENTLY: u16 = 301;

    pub fn permanent(location: String) -> Self {
        Self {
            status: Self::MOVED_PERMANENTLY,
            location,
        }
    }

    /// Response headers, redirects must not be cached by intermediaries
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Location", self.location.clone()),
            ("Cache-Control", "no-cache".to_string()),
            ("Pragma", "no-cache".to_string()),
            ("Expires", "-1".to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RequestOutcome {
    /// The host already served a file, or the request targets the administrative store
    Skipped,
    /// Nothing matched; the host's not-found handling takes over
    NoItemResolved,
    /// A node was found but the canonical URL is not enforced for this request
    Resolved { node: ContentNode },
    ResolvedCanonical { node: ContentNode },
    ResolvedNonCanonical {
        node: ContentNode,
        /// Only set for GET requests
        redirect: Option<Redirect>,
    },
}

impl RequestOutcome {
    pub fn node(&self) -> Option<&ContentNode> {
        match self {
            RequestOutcome::Skipped | RequestOutcome::NoItemResolved => None,
            RequestOutcome::Resolved { node }
            | RequestOutcome::ResolvedCanonical { node }
            | RequestOutcome::ResolvedNonCanonical { node, .. } => Some(node),
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            RequestOutcome::ResolvedNonCanonical { redirect, .. } => redirect.as_ref(),
            _ => None,
        }
    }
}

pub struct RedirectPolicy<'a> {
    config: &'a LinkProviderConfig,
    store: &'a dyn ContentStore,
    decoder: &'a dyn NameDecoder,
    resolver: PathResolver<'a>,
    links: LinkProvider<'a>,
}

impl<'a> RedirectPolicy<'a> {
    pub fn new(
        config: &'a LinkProviderConfig,
        store: &'a dyn ContentStore,
        base: &'a dyn BaseUrlGenerator,
        decoder: &'a dyn NameDecoder,
    ) -> Self {
        Self {
            config,
            store,
            decoder,
            resolver: PathResolver::new(store, decoder),
            links: LinkProvider::new(config, store, base, decoder),
        }
    }

    /// Decide what happens to one inbound request
    pub fn process(&self, request: &RequestContext) -> RequestOutcome {
        if request.physical_file.is_some() {
            return RequestOutcome::Skipped;
        }
        if self.config.is_administrative(self.store.name()) {
            return RequestOutcome::Skipped;
        }

        let node = match &request.resolved {
            Some(node) => Some(node.clone()),
            None if !request.item_path.is_empty() => {
                let path = self.decoder.decode_store_name(&request.item_path);
                self.resolver.resolve(&path, &request.site)
            }
            None => None,
        };

        let Some(node) = node else {
            return RequestOutcome::NoItemResolved;
        };

        if !request.mode.is_normal() || !self.config.force_friendly_url {
            return RequestOutcome::Resolved { node };
        }

        let options = UrlOptions {
            language: request.site.language.clone(),
            ..UrlOptions::default()
        };
        let friendly_url = self
            .links
            .item_url(&node, &request.site, &options, request.secure);

        let requested = to_relative_url(&request.url_path);
        let friendly = to_relative_url(&friendly_url);
        if requested == friendly {
            return RequestOutcome::ResolvedCanonical { node };
        }

        if !request.is_get() {
            debug!(
                "{} {} is not canonical ({}), not redirecting",
                request.method, requested, friendly
            );
            return RequestOutcome::ResolvedNonCanonical {
                node,
                redirect: None,
            };
        }

        let location = match request.query.as_deref() {
            Some(query) if !query.is_empty() => format!("{}?{}", friendly_url, query),
            _ => friendly_url,
        };
        debug!("redirecting {} to {}", requested, location);

        RequestOutcome::ResolvedNonCanonical {
            node,
            redirect: Some(Redirect::permanent(location)),
        }
    }
}
