use log::{debug, log_enabled, trace, warn, Level};

use crate::decode::NameDecoder;
use crate::model::{is_within, ContentNode, SiteContext};
use crate::normalize::normalize;
use crate::store::ContentStore;

/// Resolves friendly request paths to content nodes by walking the tree one
/// segment at a time.
pub struct PathResolver<'a> {
    store: &'a dyn ContentStore,
    decoder: &'a dyn NameDecoder,
}

impl<'a> PathResolver<'a> {
    pub fn new(store: &'a dyn ContentStore, decoder: &'a dyn NameDecoder) -> Self {
        Self { store, decoder }
    }

    /// Find the node addressed by `request_path`, a tree path below the
    /// site's root.
    ///
    /// Every segment has to match a child of the node reached so far;
    /// partial matches resolve to nothing.
    pub fn resolve(&self, request_path: &str, site: &SiteContext) -> Option<ContentNode> {
        let root_path = site.root_path.trim_end_matches('/');
        if site.root_path.is_empty() || !is_within(request_path, root_path) {
            debug!("{} is not below site root {:?}", request_path, site.root_path);
            return None;
        }

        let relative = &request_path[root_path.len()..];
        let mut resolved_path = site.root_path.clone();

        for segment in relative.split('/').filter(|s| !s.trim().is_empty()) {
            let Some(child) = self.find_child(&resolved_path, segment) else {
                debug!("no child of {} matches {:?}", resolved_path, segment);
                return None;
            };
            resolved_path = child.full_path.clone();
        }

        let node = self.store.lookup(&resolved_path).cloned();
        if let Some(node) = &node {
            debug!("resolved {} to {}", request_path, node.full_path);
        }
        node
    }

    /// First child of `parent_path`, in store order, whose normalized name or
    /// display name equals the normalized segment. Later children are only
    /// examined to report ambiguity when warnings are logged.
    fn find_child(&self, parent_path: &str, segment: &str) -> Option<&'a ContentNode> {
        let parent = self.store.lookup(parent_path)?;
        let wanted = normalize(segment, self.decoder);
        trace!("looking for {:?} under {}", wanted, parent_path);

        let children = self.store.children(parent);
        let mut matches = children.into_iter().filter(|child| self.matches(child, &wanted));

        let first = matches.next()?;
        if log_enabled!(Level::Warn) {
            let shadowed: Vec<&str> = matches.map(|child| child.name.as_str()).collect();
            if !shadowed.is_empty() {
                warn!(
                    "segment {:?} under {} matches {:?} and also {:?}; using the first",
                    segment, parent_path, first.name, shadowed
                );
            }
        }

        Some(first)
    }

    fn matches(&self, child: &ContentNode, wanted: &str) -> bool {
        if normalize(&child.name, self.decoder).eq_ignore_ascii_case(wanted) {
            return true;
        }

        child
            .display_name
            .as_deref()
            .filter(|display| !display.is_empty())
            .is_some_and(|display| normalize(display, self.decoder).eq_ignore_ascii_case(wanted))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::decode::StandardDecoder;
    use crate::store::MemoryStore;

    /// Counts how many names go through normalization
    #[derive(Default)]
    struct CountingDecoder {
        inner: StandardDecoder,
        calls: AtomicUsize,
    }

    impl NameDecoder for CountingDecoder {
        fn decode_entities(&self, input: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.decode_entities(input)
        }

        fn decode_store_name(&self, input: &str) -> String {
            self.inner.decode_store_name(input)
        }
    }

    #[test]
    fn test_first_match_stops_the_scan() {
        let store = MemoryStore::from_yaml(
            "web",
            r#"
- name: root
  children:
    - name: Red Widget
    - name: red-widget
    - name: red_widget
"#,
        )
        .unwrap();
        let site = SiteContext {
            name: "main".to_string(),
            host_name: "example.com".to_string(),
            root_path: "/root".to_string(),
            start_path: "/root".to_string(),
            language: None,
        };
        let decoder = CountingDecoder::default();
        let resolver = PathResolver::new(&store, &decoder);

        let node = resolver.resolve("/root/red-widget", &site).unwrap();
        assert_eq!(node.name, "Red Widget");

        // the segment and the first child; no logger is installed in tests
        assert_eq!(decoder.calls.load(Ordering::SeqCst), 2);
    }
}
