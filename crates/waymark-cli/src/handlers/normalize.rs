use crate::state::AppState;

pub fn handle_normalize(state: &AppState, text: &[String]) -> String {
    text.iter()
        .map(|raw| waymark_core::normalize(raw, &state.decoder))
        .collect::<Vec<_>>()
        .join("\n")
}
