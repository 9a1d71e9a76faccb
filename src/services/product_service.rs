use crate::database::JsonStore;
use crate::models::{AddProductRequest, DeleteProductRequest, Product, UpdateProductRequest};
use crate::utils::AppError;

/// Append a product to a store's list, assigning the next product id.
pub async fn add_product(db: &JsonStore, request: &AddProductRequest) -> Result<Product, AppError> {
    db.update_stores(|stores| {
        let store = stores
            .iter_mut()
            .find(|s| s.id == request.store_id)
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        let id = store
            .products
            .iter()
            .filter_map(|p| p.id)
            .max()
            .unwrap_or(0)
            + 1;
        let mut product = request.product.clone();
        product.id = Some(id);
        store.products.push(product.clone());
        Ok(product)
    })
    .await
}

/// Replace the product at `product_index`, keeping its original id.
pub async fn update_product(db: &JsonStore, request: &UpdateProductRequest) -> Result<(), AppError> {
    db.update_stores(|stores| {
        let store = stores
            .iter_mut()
            .find(|s| s.id == request.store_id)
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        let slot = store
            .products
            .get_mut(request.product_index)
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

        let original_id = slot.id;
        *slot = request.product.clone();
        if original_id.is_some() {
            slot.id = original_id;
        }
        Ok(())
    })
    .await
}

/// Remove the product at `product_index`.
pub async fn delete_product(db: &JsonStore, request: &DeleteProductRequest) -> Result<(), AppError> {
    db.update_stores(|stores| {
        let store = stores
            .iter_mut()
            .find(|s| s.id == request.store_id)
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        if request.product_index >= store.products.len() {
            return Err(AppError::NotFound("Product not found".into()));
        }
        store.products.remove(request.product_index);
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegisterShopRequest, StoreCategory};
    use crate::services::auth_service;

    async fn shop_with_empty_catalog(db: &JsonStore) -> u64 {
        auth_service::register_shop(
            db,
            &RegisterShopRequest {
                shop_name: "Tech Hub".into(),
                owner_name: "Amit Kumar".into(),
                phone: "+91 555".into(),
                email: "amit@techhub.com".into(),
                address: "789 Electronics Market".into(),
                pincode: "110003".into(),
                category: StoreCategory::Electronics,
                password: "tech123".into(),
                products: Some(Vec::new()),
            },
        )
        .await
        .unwrap()
    }

    fn product(name: &str, price: &str) -> Product {
        Product {
            id: None,
            name: name.into(),
            price: price.into(),
            available: true,
            description: None,
        }
    }

    #[tokio::test]
    async fn add_assigns_stable_ids_and_update_preserves_them() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();
        let store_id = shop_with_empty_catalog(&db).await;

        let first = add_product(
            &db,
            &AddProductRequest {
                store_id,
                product: product("Earphones", "₹599"),
            },
        )
        .await
        .unwrap();
        assert_eq!(first.id, Some(1));

        update_product(
            &db,
            &UpdateProductRequest {
                store_id,
                product_index: 0,
                product: product("Earphones Pro", "₹899"),
            },
        )
        .await
        .unwrap();

        let stores = db.stores().await;
        let updated = &stores[0].products[0];
        assert_eq!(updated.name, "Earphones Pro");
        // Replacing by index keeps the server-assigned id.
        assert_eq!(updated.id, Some(1));
    }

    #[tokio::test]
    async fn delete_is_index_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();
        let store_id = shop_with_empty_catalog(&db).await;

        for name in ["A", "B", "C"] {
            add_product(
                &db,
                &AddProductRequest {
                    store_id,
                    product: product(name, "₹10"),
                },
            )
            .await
            .unwrap();
        }

        delete_product(
            &db,
            &DeleteProductRequest {
                store_id,
                product_index: 1,
            },
        )
        .await
        .unwrap();

        let stores = db.stores().await;
        let names: Vec<&str> = stores[0].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let out_of_range = delete_product(
            &db,
            &DeleteProductRequest {
                store_id,
                product_index: 5,
            },
        )
        .await;
        assert!(matches!(out_of_range, Err(AppError::NotFound(_))));
    }
}
