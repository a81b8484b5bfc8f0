use crate::cli::PrereleaseArgs;
use crate::context::CommandContext;
use crate::report::report_set_updates;
use crate::ui::select_module_sets;
use multimod_core::{PrereleaseOptions, VersioningFile, errors::Result, run_prerelease};

pub fn run(args: &PrereleaseArgs) -> Result<()> {
    let ctx = CommandContext::from_cwd()?;
    let versioning_file = ctx.versioning_file(args.versioning_file.as_deref());

    let module_set_names = if args.module_set_names.is_empty() && !args.all_module_sets {
        let file = VersioningFile::load(&versioning_file)?;
        select_module_sets(
            &file.module_set_names(),
            "Select module sets to prepare (space to toggle, enter to confirm)",
        )?
    } else {
        args.module_set_names.clone()
    };

    let options = PrereleaseOptions {
        versioning_file,
        module_set_names,
        all_module_sets: args.all_module_sets,
        no_commit: args.no_commit,
        skip_make: args.skip_make,
        make_targets: ctx.config.make_targets.clone(),
    };

    let updates = run_prerelease(&ctx.repo, &options)?;
    report_set_updates(&updates);
    Ok(())
}
