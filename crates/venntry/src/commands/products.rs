//! Product command handlers.

use tabled::Tabled;
use venntry_core::api::{ImageFile, ImageRequest, Product, ProductRequest};
use venntry_core::{ActionError, AppContext, Validate, actions};

use crate::cli::{GlobalOpts, ProductFields, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: &'static str,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            quantity: p.quantity.to_string(),
            price: format!("{:.2}", p.price),
            stock: if p.needs_restock() { "low" } else { "ok" },
        }
    }
}

fn detail(p: &Product) -> String {
    let join = |items: Vec<String>| {
        if items.is_empty() {
            "-".to_owned()
        } else {
            items.join(", ")
        }
    };
    output::detail(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("SKU", p.sku.clone()),
        ("Code", p.code.clone().unwrap_or_default()),
        ("Brand", p.brand.clone().unwrap_or_default()),
        ("Model", p.model.clone().unwrap_or_default()),
        ("Description", p.description.clone().unwrap_or_default()),
        ("Quantity", p.quantity.to_string()),
        ("Restock level", p.restock_level.to_string()),
        ("Optimal level", p.optimal_level.to_string()),
        ("Cost", format!("{:.2}", p.cost)),
        ("Price", format!("{:.2}", p.price)),
        (
            "Categories",
            join(p.categories.iter().map(|c| c.name.clone()).collect()),
        ),
        (
            "Warehouses",
            join(p.warehouses.iter().map(|w| w.name.clone()).collect()),
        ),
        ("Images", join(p.images.iter().map(|i| i.url.clone()).collect())),
    ])
}

// ── Request building ────────────────────────────────────────────────

/// Validate the flags, then upload any image files and attach them.
async fn build_request(
    ctx: &AppContext,
    fields: ProductFields,
    global: &GlobalOpts,
) -> Result<ProductRequest, CliError> {
    let mut req = ProductRequest {
        name: fields.name,
        sku: fields.sku,
        code: fields.code,
        brand: fields.brand,
        model: fields.model,
        description: fields.description,
        quantity: fields.quantity,
        restock_level: fields.restock_level,
        optimal_level: fields.optimal_level,
        cost: fields.cost,
        price: fields.price,
        images: Vec::new(),
        categories: fields.categories,
        warehouses: fields.warehouses,
    };
    req.validate()?;

    for (i, path) in fields.images.iter().enumerate() {
        let file = ImageFile::from_path(path).map_err(ActionError::from)?;
        let uploaded = util::with_spinner(
            global,
            &format!("Uploading {}", path.display()),
            actions::upload_image(ctx, file),
        )
        .await?;
        req.images.push(ImageRequest {
            is_primary: i == 0,
            ..ImageRequest::from(uploaded)
        });
    }
    Ok(req)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let service = ctx.products();

    match args.command {
        ProductsCommand::List { low_stock } => {
            let mut all = util::settled(service.get_all_products().await, || {
                util::selection_or_superseded(ctx, "product list")
            })?;
            if low_stock {
                all.retain(Product::needs_restock);
            }
            let out = output::render_list(
                global.output,
                &all,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let id = util::parse_id("id", &id)?;
            let product = util::settled(service.get_product(&id).await, || {
                util::superseded("product")
            })?;
            let out =
                output::render_single(global.output, &product, detail, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create(fields) => {
            let inventory = ctx
                .inventories()
                .current()
                .ok_or(CliError::NoInventorySelected)?;
            let req = build_request(ctx, fields, global).await?;
            let product = service.create_product(&req).await?;
            let out =
                output::render_single(global.output, &product, detail, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::success(global, format_args!("Product created in '{}'", inventory.name));
            Ok(())
        }

        ProductsCommand::Update { id, fields } => {
            let id = util::parse_id("id", &id)?;
            let req = build_request(ctx, fields, global).await?;
            let product = service.update_product(&id, &req).await?;
            let out =
                output::render_single(global.output, &product, detail, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::success(global, "Product updated");
            Ok(())
        }

        ProductsCommand::Delete { id } => {
            let id = util::parse_id("id", &id)?;
            if !util::confirm(&format!("Delete product {id}?"), global)? {
                return Ok(());
            }
            service.delete_product(&id).await?;
            output::success(global, "Product deleted");
            Ok(())
        }
    }
}
