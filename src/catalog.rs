//! In-memory product catalogue
//!
//! The service the binary mounts under `/products`. Products live in a
//! `BTreeMap` keyed by id, so listings come back in creation order.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Mutex;

use crate::controller::{Controller, Endpoint, Service, ServiceError, ServiceResult, SuccessStatuses};
use crate::request::Inputs;
use crate::routing::Router;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct Store {
    products: BTreeMap<u64, Product>,
    next_id: u64,
}

#[derive(Debug, Default)]
pub struct ProductCatalog {
    store: Mutex<Store>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue pre-filled with `products`, ids assigned in order
    pub fn with_products<I>(products: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut store = Store::default();
        for (name, price) in products {
            store.next_id += 1;
            let id = store.next_id;
            store.products.insert(
                id,
                Product {
                    id,
                    name,
                    price,
                    description: None,
                },
            );
        }
        Self {
            store: Mutex::new(store),
        }
    }

    fn list(&self, input: &Inputs) -> Result<ServiceResult, ServiceError> {
        let store = self.lock()?;
        let needle = input
            .get("q")
            .and_then(Value::as_str)
            .map(str::to_lowercase);

        let products: Vec<&Product> = store
            .products
            .values()
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|q| p.name.to_lowercase().contains(q))
            })
            .collect();

        ServiceResult::from_data(&products)
    }

    fn show(&self, input: &Inputs) -> Result<ServiceResult, ServiceError> {
        let id = product_id(input)?;
        let store = self.lock()?;
        let product = store.products.get(&id).ok_or_else(not_found)?;
        ServiceResult::from_data(product)
    }

    fn create(&self, input: &Inputs) -> Result<ServiceResult, ServiceError> {
        let fields = match ProductFields::validate(input, true) {
            Ok(fields) => fields,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };

        let mut store = self.lock()?;
        store.next_id += 1;
        let id = store.next_id;
        let product = Product {
            id,
            name: fields.name.unwrap_or_default(),
            price: fields.price.unwrap_or_default(),
            description: fields.description,
        };
        store.products.insert(id, product.clone());

        Ok(ServiceResult::from_data(&product)?.with_message("Product created"))
    }

    fn update(&self, input: &Inputs) -> Result<ServiceResult, ServiceError> {
        let id = product_id(input)?;
        let fields = match ProductFields::validate(input, false) {
            Ok(fields) => fields,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };

        let mut store = self.lock()?;
        let product = store.products.get_mut(&id).ok_or_else(not_found)?;
        if let Some(name) = fields.name {
            product.name = name;
        }
        if let Some(price) = fields.price {
            product.price = price;
        }
        if fields.description.is_some() {
            product.description = fields.description;
        }

        Ok(ServiceResult::from_data(&*product)?.with_message("Product updated"))
    }

    fn delete(&self, input: &Inputs) -> Result<ServiceResult, ServiceError> {
        let id = product_id(input)?;
        let mut store = self.lock()?;
        store.products.remove(&id).ok_or_else(not_found)?;
        Ok(ServiceResult::default())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, ServiceError> {
        self.store
            .lock()
            .map_err(|_| ServiceError::runtime("Catalogue store is unavailable"))
    }
}

impl Service for ProductCatalog {
    fn call(&self, operation: &str, input: Inputs) -> Result<ServiceResult, ServiceError> {
        match operation {
            "list" => self.list(&input),
            "show" => self.show(&input),
            "create" => self.create(&input),
            "update" => self.update(&input),
            "delete" => self.delete(&input),
            other => Err(ServiceError::UnknownOperation(other.to_string())),
        }
    }
}

/// Writable product fields after validation
struct ProductFields {
    name: Option<String>,
    price: Option<f64>,
    description: Option<String>,
}

impl ProductFields {
    /// Collect per-field messages; `required` demands name and price
    fn validate(input: &Inputs, required: bool) -> Result<Self, Value> {
        let mut errors = Map::new();

        let name = match input.get("name") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            None if !required => None,
            _ => {
                errors.insert("name".into(), "Name is required".into());
                None
            }
        };

        let price = match input.get("price") {
            Some(value) => match parse_price(value) {
                Some(p) => Some(p),
                None => {
                    errors.insert("price".into(), "Price must be a non-negative number".into());
                    None
                }
            },
            None if !required => None,
            None => {
                errors.insert("price".into(), "Price is required".into());
                None
            }
        };

        let description = input
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        if errors.is_empty() {
            Ok(Self {
                name,
                price,
                description,
            })
        } else {
            Err(Value::Object(errors))
        }
    }
}

/// Numbers arrive as JSON numbers from bodies and as strings from forms
fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

fn product_id(input: &Inputs) -> Result<u64, ServiceError> {
    let id = match input.get("id") {
        Some(Value::String(s)) => s.parse().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    id.ok_or_else(|| ServiceError::invalid_argument("Invalid product id"))
}

fn not_found() -> ServiceError {
    ServiceError::invalid_argument("Product not found")
}

/// Router serving `catalog` under `/products`
pub fn router(catalog: ProductCatalog) -> Router {
    let endpoint: Rc<dyn Endpoint> =
        Rc::new(Controller::new(catalog, SuccessStatuses::rest_conventions()));
    Router::new().resource("/products", &endpoint)
}
