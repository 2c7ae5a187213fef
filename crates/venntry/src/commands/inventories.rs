//! Inventory command handlers.

use tabled::Tabled;
use venntry_core::api::{Inventory, InventoryRequest};
use venntry_core::{AppContext, Validate};

use crate::cli::{GlobalOpts, InventoriesArgs, InventoriesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InventoryRow {
    #[tabled(rename = "")]
    current: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn row(inv: &Inventory, current: Option<uuid::Uuid>) -> InventoryRow {
    InventoryRow {
        current: if current == Some(inv.id) { "*" } else { "" },
        id: inv.id.to_string(),
        name: inv.name.clone(),
        created: inv
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

fn detail(inv: &Inventory) -> String {
    output::detail(&[("ID", inv.id.to_string()), ("Name", inv.name.clone())])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: InventoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let service = ctx.inventories();

    match args.command {
        InventoriesCommand::List => {
            let all = util::settled(service.list_inventories().await, || {
                util::superseded("inventory list")
            })?;
            let current = ctx.selection().current_inventory_id();
            let out = output::render_list(
                global.output,
                &all,
                |inv| row(inv, current),
                |inv| inv.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoriesCommand::Create { name, select } => {
            let req = InventoryRequest { name };
            req.validate()?;
            let inv = service.create_inventory(&req, select).await?;
            let out = output::render_single(global.output, &inv, detail, |i| i.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::success(global, "Inventory created");
            Ok(())
        }

        InventoriesCommand::Update { id, name } => {
            let id = util::parse_id("id", &id)?;
            let req = InventoryRequest { name };
            req.validate()?;
            let inv = service.update_inventory(&id, &req).await?;
            let out = output::render_single(global.output, &inv, detail, |i| i.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::success(global, "Inventory updated");
            Ok(())
        }

        InventoriesCommand::Delete { id } => {
            let id = util::parse_id("id", &id)?;
            if !util::confirm(
                &format!("Delete inventory {id} and all of its products and warehouses?"),
                global,
            )? {
                return Ok(());
            }
            service.delete_inventory(&id).await?;
            output::success(global, "Inventory deleted");
            Ok(())
        }

        InventoriesCommand::Select { id } => {
            let id = util::parse_id("id", &id)?;
            let all = util::settled(service.list_inventories().await, || {
                util::superseded("inventory list")
            })?;
            let inv = all
                .into_iter()
                .find(|inv| inv.id == id)
                .ok_or_else(|| CliError::NotFound {
                    message: format!("Inventory '{id}' not found; run: venntry inventories list"),
                })?;
            let name = inv.name.clone();
            service.select(inv)?;
            output::success(global, format_args!("Using inventory '{name}'"));
            Ok(())
        }

        InventoriesCommand::Current => {
            let inv = service.current().ok_or(CliError::NoInventorySelected)?;
            let out = output::render_single(global.output, &inv, detail, |i| i.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoriesCommand::Clear => {
            service.clear()?;
            output::success(global, "Selection cleared");
            Ok(())
        }
    }
}
