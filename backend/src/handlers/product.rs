//! HTTP handlers for product endpoints
//!
//! Create and update take the catalog form as multipart so the image can
//! ride along. An image that fails to upload leaves the product without one.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use shared::{parse_price, Product, INVENTORY_ROLES};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::ObjectStorageClient;
use crate::middleware::{require_role, CurrentUser};
use crate::services::product::{ProductInput, ProductWithCategory};
use crate::services::ProductService;
use crate::AppState;

/// Uploaded image waiting for storage
#[derive(Debug, Default)]
struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Catalog form fields as received
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<String>,
    category_id: Option<String>,
    store_stock: Option<String>,
    warehouse_stock: Option<String>,
    image_url: Option<String>,
    current_image_url: Option<String>,
    image: Option<ImageUpload>,
}

impl ProductForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid image: {}", e)))?;
                if !bytes.is_empty() {
                    form.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))?;
                form.set(&name, value);
            }
        }

        Ok(form)
    }

    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "price" => &mut self.price,
            "category_id" => &mut self.category_id,
            // `stock` / `stock_warehouse` are the legacy form names
            "store_stock" | "stock" => &mut self.store_stock,
            "warehouse_stock" | "stock_warehouse" => &mut self.warehouse_stock,
            "image_url" => &mut self.image_url,
            "current_image_url" => &mut self.current_image_url,
            _ => return,
        };
        let trimmed = value.trim();
        *slot = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Resolve the image URL and build the service input
    async fn into_input(self, storage: &ObjectStorageClient) -> AppResult<ProductInput> {
        let name = self.name.ok_or_else(|| {
            AppError::validation("name", "Name is required", "El nombre es obligatorio")
        })?;
        let price = parse_form_price(self.price.as_deref())?;
        let category_id = parse_category(self.category_id.as_deref())?;
        let store_stock = parse_stock("store_stock", self.store_stock.as_deref())?;
        let warehouse_stock = parse_stock("warehouse_stock", self.warehouse_stock.as_deref())?;

        // A URL uploaded by the client wins, then the existing one, then a new upload
        let mut image_url = self.image_url.or(self.current_image_url);
        if image_url.is_none() {
            if let Some(image) = self.image {
                match storage
                    .upload_image(&image.file_name, &image.content_type, image.bytes)
                    .await
                {
                    Ok(url) => image_url = Some(url),
                    Err(e) => tracing::error!("Product image upload failed: {}", e),
                }
            }
        }

        Ok(ProductInput {
            name,
            price,
            category_id,
            store_stock,
            warehouse_stock,
            image_url,
        })
    }
}

fn parse_form_price(raw: Option<&str>) -> AppResult<Decimal> {
    let raw = raw.ok_or_else(|| {
        AppError::validation("price", "Price is required", "El precio es obligatorio")
    })?;
    parse_price(raw).map_err(|m| AppError::validation("price", m, "Precio inválido"))
}

/// `none` or an empty select means uncategorized
fn parse_category(raw: Option<&str>) -> AppResult<Option<Uuid>> {
    match raw {
        None | Some("none") => Ok(None),
        Some(id) => Uuid::parse_str(id).map(Some).map_err(|_| {
            AppError::validation("category_id", "Invalid category", "Categoría inválida")
        }),
    }
}

fn parse_stock(field: &str, raw: Option<&str>) -> AppResult<i32> {
    match raw {
        None => Ok(0),
        Some(value) => value.parse::<i32>().map_err(|_| {
            AppError::validation(field, "Stock must be a whole number", "Stock inválido")
        }),
    }
}

/// List products with their categories
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductWithCategory>>> {
    let service = ProductService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    Ok(Json(service.get(product_id).await?))
}

/// Create a product from the catalog form
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Product>)> {
    require_role(&current_user.0, INVENTORY_ROLES)?;

    let input = ProductForm::read(multipart)
        .await?
        .into_input(&state.storage)
        .await?;
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product; entered stock resets the baselines
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<Product>> {
    require_role(&current_user.0, INVENTORY_ROLES)?;

    let input = ProductForm::read(multipart)
        .await?
        .into_input(&state.storage)
        .await?;
    let service = ProductService::new(state.db);
    Ok(Json(service.update(product_id, input).await?))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&current_user.0, INVENTORY_ROLES)?;
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_accepts_legacy_names() {
        let mut form = ProductForm::default();
        form.set("stock", "12".to_string());
        form.set("stock_warehouse", " 40 ".to_string());
        form.set("unknown", "x".to_string());
        assert_eq!(form.store_stock.as_deref(), Some("12"));
        assert_eq!(form.warehouse_stock.as_deref(), Some("40"));
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let mut form = ProductForm::default();
        form.set("image_url", "   ".to_string());
        assert!(form.image_url.is_none());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(Some("none")).unwrap(), None);
        assert_eq!(parse_category(None).unwrap(), None);
        assert!(parse_category(Some("not-a-uuid")).is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_category(Some(&id.to_string())).unwrap(), Some(id));
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("store_stock", None).unwrap(), 0);
        assert_eq!(parse_stock("store_stock", Some("7")).unwrap(), 7);
        assert!(parse_stock("store_stock", Some("7.5")).is_err());
    }

    #[test]
    fn test_price_required() {
        assert!(parse_form_price(None).is_err());
        assert_eq!(parse_form_price(Some("2.50")).unwrap(), Decimal::new(250, 2));
    }
}
