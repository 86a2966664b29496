use anyhow::bail;
use waymark_core::decode::{percent_decode, NameDecoder};
use waymark_core::PathResolver;

use crate::state::AppState;

pub fn handle_resolve(state: &AppState, site: &str, path: &str) -> anyhow::Result<String> {
    let store = state.store()?;
    let site = state.site(site)?;

    let item_path = site.item_path_for(&percent_decode(path));
    let item_path = state.decoder.decode_store_name(&item_path);
    log::debug!("{} maps to item path {}", path, item_path);

    match PathResolver::new(store, &state.decoder).resolve(&item_path, site) {
        Some(node) => Ok(node.full_path),
        None => bail!("unresolved: {}", path),
    }
}
