use anyhow::anyhow;
use waymark_core::{ContentStore, LinkProvider, SiteUrlBuilder, UrlOptions};

use crate::cli::UrlArgs;
use crate::state::AppState;

pub fn handle_url(state: &AppState, args: &UrlArgs) -> anyhow::Result<String> {
    let store = state.store()?;
    let site = state.site(&args.site)?;
    let node = store
        .lookup(&args.node)
        .ok_or_else(|| anyhow!("no node at {}", args.node))?;

    let config = &state.config.link_provider;
    let base = SiteUrlBuilder::new(&state.config.sites, store, config);
    let links = LinkProvider::new(config, store, &base, &state.decoder);

    let options = UrlOptions {
        language: site.language.clone(),
        always_include_server_url: args.absolute,
        use_display_name: args.display_names,
        ..UrlOptions::default()
    };

    Ok(links.item_url(node, site, &options, args.secure))
}
