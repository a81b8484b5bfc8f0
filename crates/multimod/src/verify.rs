use crate::cli::VerifyArgs;
use crate::context::CommandContext;
use crate::ui::log_success_value;
use multimod_core::{errors::Result, run_verify};

pub fn run(args: &VerifyArgs) -> Result<()> {
    let ctx = CommandContext::from_cwd()?;
    let versioning_file = ctx.versioning_file(args.versioning_file.as_deref());

    let versioning = run_verify(&versioning_file, ctx.root())?;
    log_success_value(
        "Versioning file is consistent",
        &format!(
            "{} modules in {} module sets",
            versioning.module_info_map.len(),
            versioning.module_set_map.len()
        ),
    );
    Ok(())
}
