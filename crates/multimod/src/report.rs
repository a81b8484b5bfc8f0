use crate::ui::{log_hint, log_success_list, log_success_value, log_warning};
use multimod_core::SetUpdate;

/// Summarize what a branch-producing command did for each module set.
pub fn report_set_updates(updates: &[SetUpdate]) {
    let mut branches = Vec::new();
    for update in updates {
        match update {
            SetUpdate::UpToDate { module_set } => {
                log_success_value(module_set, "already up to date");
            }
            SetUpdate::Committed {
                module_set,
                branch,
                commit,
            } => {
                let summary = format!("committed {} on {branch}", commit.short());
                log_success_value(module_set, &summary);
                branches.push(branch.clone());
            }
            SetUpdate::Uncommitted { module_set, branch } => {
                log_warning(&format!("{module_set}: changes left uncommitted on {branch}"));
            }
        }
    }

    if !branches.is_empty() {
        log_success_list("New branches", &branches);
        log_hint("Review each branch with `git diff <base>...<branch>`, then push it for review.");
    }
}
