//! Category command handlers.

use tabled::Tabled;
use venntry_core::AppContext;
use venntry_core::api::Category;

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
        }
    }
}

pub async fn handle(
    ctx: &AppContext,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(ctx)?;

    match args.command {
        CategoriesCommand::List => {
            let all = util::settled(ctx.products().get_all_categories().await, || {
                util::selection_or_superseded(ctx, "category list")
            })?;
            let out = output::render_list(
                global.output,
                &all,
                |c| CategoryRow::from(c),
                |c| c.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
