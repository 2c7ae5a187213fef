//! Warehouse command handlers.

use tabled::Tabled;
use venntry_core::api::{Warehouse, WarehouseRequest};
use venntry_core::{AppContext, Validate};

use crate::cli::{GlobalOpts, WarehouseFields, WarehousesArgs, WarehousesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WarehouseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Products")]
    products: usize,
}

impl From<&Warehouse> for WarehouseRow {
    fn from(w: &Warehouse) -> Self {
        Self {
            id: w.id.to_string(),
            name: w.name.clone(),
            location: w.location.clone().unwrap_or_default(),
            capacity: w.capacity.map(|c| c.to_string()).unwrap_or_default(),
            products: w.products.len(),
        }
    }
}

fn detail(w: &Warehouse) -> String {
    let mut out = output::detail(&[
        ("ID", w.id.to_string()),
        ("Name", w.name.clone()),
        ("Location", w.location.clone().unwrap_or_default()),
        (
            "Capacity",
            w.capacity.map(|c| c.to_string()).unwrap_or_default(),
        ),
    ]);
    for p in &w.products {
        out.push_str(&format!("\n  - {} ({}) x{}", p.name, p.sku, p.quantity));
    }
    out
}

fn request(fields: WarehouseFields) -> Result<WarehouseRequest, CliError> {
    let req = WarehouseRequest {
        name: fields.name,
        location: fields.location,
        capacity: fields.capacity,
    };
    req.validate()?;
    Ok(req)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: WarehousesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let service = ctx.warehouses();

    match args.command {
        WarehousesCommand::List => {
            let all = util::settled(service.get_all_warehouses().await, || {
                util::selection_or_superseded(ctx, "warehouse list")
            })?;
            let out = output::render_list(
                global.output,
                &all,
                |w| WarehouseRow::from(w),
                |w| w.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WarehousesCommand::Get { id } => {
            let id = util::parse_id("id", &id)?;
            let warehouse = util::settled(service.get_warehouse(&id).await, || {
                util::superseded("warehouse")
            })?;
            let out =
                output::render_single(global.output, &warehouse, detail, |w| w.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WarehousesCommand::Create(fields) => {
            let req = request(fields)?;
            let warehouse = service.create_warehouse(&req).await?;
            let out =
                output::render_single(global.output, &warehouse, detail, |w| w.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::success(global, "Warehouse created");
            Ok(())
        }

        WarehousesCommand::Update { id, fields } => {
            let id = util::parse_id("id", &id)?;
            let req = request(fields)?;
            let warehouse = service.update_warehouse(&id, &req).await?;
            let out =
                output::render_single(global.output, &warehouse, detail, |w| w.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::success(global, "Warehouse updated");
            Ok(())
        }

        WarehousesCommand::Delete { id } => {
            let id = util::parse_id("id", &id)?;
            if !util::confirm(&format!("Delete warehouse {id}?"), global)? {
                return Ok(());
            }
            service.delete_warehouse(&id).await?;
            output::success(global, "Warehouse deleted");
            Ok(())
        }
    }
}
