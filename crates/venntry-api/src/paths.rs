//! Resource paths, relative to the API base URL.
//!
//! These strings double as cache keys in `venntry-core`, so every
//! endpoint method builds its path through here.

use uuid::Uuid;

pub const REGISTER: &str = "/auth/register";
pub const LOGIN: &str = "/auth/login";
pub const CHECK_TOKEN: &str = "/auth/check-token";
pub const USER_PROFILE: &str = "/auth/user-profile";
pub const INVENTORIES: &str = "/inventories";

pub fn inventory(id: &Uuid) -> String {
    format!("/inventories/{id}")
}

pub fn inventory_products(inventory_id: &Uuid) -> String {
    format!("/inventories/{inventory_id}/products")
}

pub fn inventory_warehouses(inventory_id: &Uuid) -> String {
    format!("/inventories/{inventory_id}/warehouses")
}

pub fn inventory_categories(inventory_id: &Uuid) -> String {
    format!("/inventories/{inventory_id}/categories")
}

pub fn product(id: &Uuid) -> String {
    format!("/products/{id}")
}

pub fn warehouse(id: &Uuid) -> String {
    format!("/warehouses/{id}")
}
