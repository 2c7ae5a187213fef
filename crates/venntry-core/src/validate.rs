// ── Client-side request validation ──
//
// Field rules for every request type, checked before anything is sent.
// Messages are the ones shown next to form fields.

use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;
use venntry_api::{
    ImageRequest, InventoryRequest, LoginRequest, ProductRequest, RegisterRequest,
    WarehouseRequest,
};

/// Field name to first failing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless it already has one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

// ── Rule helpers ─────────────────────────────────────────────────────

fn chars(s: &str) -> usize {
    s.chars().count()
}

fn required(errs: &mut ValidationErrors, field: &str, value: &str, msg: &str) {
    if value.trim().is_empty() {
        errs.add(field, msg);
    }
}

fn max_len(errs: &mut ValidationErrors, field: &str, value: &str, max: usize, msg: &str) {
    if chars(value) > max {
        errs.add(field, msg);
    }
}

fn opt_max_len(
    errs: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
    msg: &str,
) {
    if let Some(value) = value {
        max_len(errs, field, value, max, msg);
    }
}

fn non_negative_amount(errs: &mut ValidationErrors, field: &str, value: f64, msg: &str) {
    if !value.is_finite() {
        errs.add(field, "Enter a valid number");
    } else if value < 0.0 {
        errs.add(field, msg);
    }
}

fn non_negative_count(errs: &mut ValidationErrors, field: &str, value: i64, msg: &str) {
    if value < 0 {
        errs.add(field, msg);
    }
}

/// Loose structural email check: one `@`, a non-empty local part, and a
/// dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let labels: Vec<&str> = domain.split('.').collect();
    !local.is_empty()
        && !domain.contains('@')
        && labels.len() >= 2
        && labels.iter().all(|label| !label.is_empty())
}

fn email(errs: &mut ValidationErrors, value: &str, invalid_msg: &str) {
    if !is_valid_email(value) {
        errs.add("email", invalid_msg);
    }
    max_len(errs, "email", value, 100, "Email must not exceed 100 characters");
}

fn password(errs: &mut ValidationErrors, value: &str) {
    if chars(value) < 5 {
        errs.add("password", "Password must be at least 5 characters");
    }
}

fn name(errs: &mut ValidationErrors, value: &str) {
    required(errs, "name", value, "Name is required");
    max_len(errs, "name", value, 100, "Name must not exceed 100 characters");
}

// ── Schemas ──────────────────────────────────────────────────────────

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        required(&mut errs, "username", &self.username, "Username is required");
        max_len(
            &mut errs,
            "username",
            &self.username,
            50,
            "Username must not exceed 50 characters",
        );
        email(&mut errs, &self.email, "Please enter a valid email address");
        password(&mut errs, &self.password);
        errs.into_result()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        email(&mut errs, &self.email, "Invalid email address");
        password(&mut errs, &self.password);
        errs.into_result()
    }
}

impl Validate for InventoryRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        name(&mut errs, &self.name);
        errs.into_result()
    }
}

impl Validate for WarehouseRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        name(&mut errs, &self.name);
        opt_max_len(
            &mut errs,
            "location",
            self.location.as_deref(),
            200,
            "Location must not exceed 200 characters",
        );
        if let Some(capacity) = self.capacity {
            non_negative_count(
                &mut errs,
                "capacity",
                capacity,
                "Capacity must be at least 0",
            );
        }
        errs.into_result()
    }
}

impl Validate for ImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        required(&mut errs, "url", &self.url, "URL is required");
        required(&mut errs, "fileKey", &self.file_key, "File key is required");
        errs.into_result()
    }
}

impl Validate for ProductRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        name(&mut errs, &self.name);
        required(&mut errs, "sku", &self.sku, "SKU is required");
        max_len(&mut errs, "sku", &self.sku, 20, "SKU must not exceed 20 characters");
        opt_max_len(
            &mut errs,
            "code",
            self.code.as_deref(),
            20,
            "Code must not exceed 20 characters",
        );
        opt_max_len(
            &mut errs,
            "brand",
            self.brand.as_deref(),
            50,
            "Brand must not exceed 50 characters",
        );
        opt_max_len(
            &mut errs,
            "model",
            self.model.as_deref(),
            50,
            "Model must not exceed 50 characters",
        );
        opt_max_len(
            &mut errs,
            "description",
            self.description.as_deref(),
            200,
            "Description must not exceed 200 characters",
        );

        non_negative_count(
            &mut errs,
            "quantity",
            self.quantity,
            "Quantity must be at least 0",
        );
        non_negative_count(
            &mut errs,
            "restockLevel",
            self.restock_level,
            "Restock level must be at least 0",
        );
        non_negative_count(
            &mut errs,
            "optimalLevel",
            self.optimal_level,
            "Optimal level must be at least 0",
        );
        non_negative_amount(&mut errs, "cost", self.cost, "Cost price must be at least 0");
        non_negative_amount(
            &mut errs,
            "price",
            self.price,
            "Selling price must be at least 0",
        );

        for (i, image) in self.images.iter().enumerate() {
            if let Err(image_errs) = image.validate() {
                for (field, message) in image_errs.into_fields() {
                    errs.add(format!("images[{i}].{field}"), message);
                }
            }
        }
        for (i, category) in self.categories.iter().enumerate() {
            let field = format!("categories[{i}]");
            required(&mut errs, &field, category, "Category name is required");
            max_len(
                &mut errs,
                &field,
                category,
                50,
                "Category name must not exceed 50 characters",
            );
        }
        for (i, warehouse) in self.warehouses.iter().enumerate() {
            if Uuid::parse_str(warehouse).is_err() {
                errs.add(format!("warehouses[{i}]"), "Add a valid warehouse");
            }
        }
        errs.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn product() -> ProductRequest {
        ProductRequest {
            name: "Widget".into(),
            sku: "W-1".into(),
            quantity: 1,
            cost: 1.0,
            price: 2.0,
            ..ProductRequest::default()
        }
    }

    #[test]
    fn email_check() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("ada@example..com"));
    }

    #[test]
    fn register_reports_each_field() {
        let errs = RegisterRequest {
            username: String::new(),
            email: "nope".into(),
            password: "1234".into(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errs.get("username"), Some("Username is required"));
        assert_eq!(errs.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errs.get("password"), Some("Password must be at least 5 characters"));
    }

    #[test]
    fn login_accepts_valid_input() {
        let req = LoginRequest {
            email: "ada@example.com".into(),
            password: "12345".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn length_limits_count_characters() {
        let req = InventoryRequest {
            name: "é".repeat(100),
        };
        assert!(req.validate().is_ok());
        let req = InventoryRequest {
            name: "é".repeat(101),
        };
        assert_eq!(
            req.validate().unwrap_err().get("name"),
            Some("Name must not exceed 100 characters")
        );
    }

    #[test]
    fn warehouse_capacity_must_not_be_negative() {
        let req = WarehouseRequest {
            name: "Main".into(),
            location: Some("x".repeat(201)),
            capacity: Some(-1),
        };
        let errs = req.validate().unwrap_err();
        assert!(errs.get("location").is_some());
        assert_eq!(errs.get("capacity"), Some("Capacity must be at least 0"));
    }

    #[test]
    fn product_numbers_must_be_finite_and_non_negative() {
        let mut req = product();
        req.cost = f64::NAN;
        req.price = -1.0;
        req.quantity = -3;
        let errs = req.validate().unwrap_err();
        assert_eq!(errs.get("cost"), Some("Enter a valid number"));
        assert_eq!(errs.get("price"), Some("Selling price must be at least 0"));
        assert_eq!(errs.get("quantity"), Some("Quantity must be at least 0"));
    }

    #[test]
    fn product_nested_rules() {
        let mut req = product();
        req.images = vec![ImageRequest {
            url: String::new(),
            file_key: "k".into(),
            is_primary: true,
        }];
        req.categories = vec!["ok".into(), "c".repeat(51)];
        req.warehouses = vec!["not-a-uuid".into(), Uuid::new_v4().to_string()];

        let errs = req.validate().unwrap_err();
        assert_eq!(errs.get("images[0].url"), Some("URL is required"));
        assert!(errs.get("categories[0]").is_none());
        assert!(errs.get("categories[1]").is_some());
        assert_eq!(errs.get("warehouses[0]"), Some("Add a valid warehouse"));
        assert!(errs.get("warehouses[1]").is_none());
    }

    #[test]
    fn display_joins_fields() {
        let mut errs = ValidationErrors::new();
        errs.add("b", "second");
        errs.add("a", "first");
        errs.add("a", "ignored");
        assert_eq!(errs.to_string(), "a: first; b: second");
    }
}
