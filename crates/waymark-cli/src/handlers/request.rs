use waymark_core::{RedirectPolicy, RequestContext, RequestOutcome, SiteUrlBuilder};

use crate::cli::RequestArgs;
use crate::state::AppState;

pub fn handle_request(state: &AppState, args: &RequestArgs) -> anyhow::Result<String> {
    let store = state.store()?;
    let site = state.site(&args.site)?;

    let config = &state.config.link_provider;
    let base = SiteUrlBuilder::new(&state.config.sites, store, config);
    let policy = RedirectPolicy::new(config, store, &base, &state.decoder);

    let mut request = RequestContext::new(site.clone(), args.method.clone(), args.path.clone());
    request.query = args.query.clone();
    request.secure = args.secure;
    request.mode = args.mode.into();

    let outcome = policy.process(&request);

    if args.json {
        return Ok(serde_json::to_string_pretty(&outcome)?);
    }

    Ok(match &outcome {
        RequestOutcome::Skipped => "skipped".to_string(),
        RequestOutcome::NoItemResolved => "404".to_string(),
        RequestOutcome::Resolved { node } | RequestOutcome::ResolvedCanonical { node } => {
            format!("200 {}", node.full_path)
        }
        RequestOutcome::ResolvedNonCanonical { node, redirect } => match redirect {
            Some(redirect) => format!("{} {}", redirect.status, redirect.location),
            None => format!("200 {} (not canonical)", node.full_path),
        },
    })
}
