use crate::cli::TagArgs;
use crate::context::CommandContext;
use crate::ui::{log_hint, log_success_list, log_success_value};
use multimod_core::{TagOptions, TagOutcome, errors::Result, run_tag};

pub fn run(args: &TagArgs) -> Result<()> {
    let ctx = CommandContext::from_cwd()?;
    let options = TagOptions {
        versioning_file: ctx.versioning_file(args.versioning_file.as_deref()),
        module_set_name: args.module_set_name.clone(),
        commit: args.commit.clone(),
        delete: args.delete_module_set_tags,
    };

    match run_tag(&ctx.repo, &options)? {
        TagOutcome::Created { commit, tags } => {
            log_success_value("Tagged commit", commit.as_str());
            log_success_list("Tags", &tags);
            log_hint("Push the new tags with `git push <remote> <tag>...`.");
        }
        TagOutcome::Deleted { commit, tags } => {
            log_success_value("Untagged commit", commit.as_str());
            log_success_list("Deleted tags", &tags);
        }
    }
    Ok(())
}
