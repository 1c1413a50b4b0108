use super::{
    action::{Action, UpdateResult},
    command::Command,
    features,
    state::AppState,
};
use tracing::trace;

pub fn update(state: &mut AppState, action: Action) -> Option<Command> {
    if let UpdateResult::Handled(cmd) = features::ui::update(state, &action) {
        return cmd;
    }
    if let UpdateResult::Handled(cmd) = features::rebase::update(state, &action) {
        return cmd;
    }
    trace!(?action, "Unhandled action");
    None
}
