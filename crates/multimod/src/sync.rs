use crate::cli::SyncArgs;
use crate::context::CommandContext;
use crate::report::report_set_updates;
use crate::ui::select_module_sets;
use multimod_core::{SyncOptions, VersioningFile, errors::Result, run_sync};

pub fn run(args: &SyncArgs) -> Result<()> {
    let ctx = CommandContext::from_cwd()?;
    let other_versioning_file = ctx.resolve(&args.other_versioning_file);

    let module_set_names = if args.module_set_names.is_empty() && !args.all_module_sets {
        let other = VersioningFile::load(&other_versioning_file)?;
        select_module_sets(
            &other.module_set_names(),
            "Select module sets to sync (space to toggle, enter to confirm)",
        )?
    } else {
        args.module_set_names.clone()
    };

    let options = SyncOptions {
        versioning_file: ctx.versioning_file(args.versioning_file.as_deref()),
        other_versioning_file,
        other_repo_root: args.other_repo_root.as_deref().map(|p| ctx.resolve(p)),
        module_set_names,
        all_module_sets: args.all_module_sets,
        skip_tidy: args.skip_go_mod_tidy,
    };

    let updates = run_sync(&ctx.repo, &options)?;
    report_set_updates(&updates);
    Ok(())
}
