//! Cart commands.

use corner_shop_core::{CartItemId, CartSummary, ProductId, Quantity};
use corner_shop_storefront::catalog::CatalogClient;

use super::CliError;

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the catalog API call fails.
#[allow(clippy::print_stdout)]
pub async fn show(client: &CatalogClient) -> Result<(), CliError> {
    let cart = client.get_cart().await?;
    println!("{}", format_cart(&cart));
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the quantity is out of range or the call fails.
#[allow(clippy::print_stdout)]
pub async fn add(client: &CatalogClient, product_id: &str, qty: i64) -> Result<(), CliError> {
    let qty = quantity(qty)?;
    let message = client.add_to_cart(&ProductId::new(product_id), qty).await?;
    println!("{message}");
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns an error if the quantity is out of range or the call fails.
#[allow(clippy::print_stdout)]
pub async fn update(
    client: &CatalogClient,
    item_id: &str,
    product_id: &str,
    qty: i64,
) -> Result<(), CliError> {
    let qty = quantity(qty)?;
    let message = client
        .update_cart_item(&CartItemId::new(item_id), &ProductId::new(product_id), qty)
        .await?;
    println!("{message}");
    Ok(())
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the call fails.
#[allow(clippy::print_stdout)]
pub async fn remove(client: &CatalogClient, item_id: &str) -> Result<(), CliError> {
    let message = client.remove_cart_item(&CartItemId::new(item_id)).await?;
    println!("{message}");
    Ok(())
}

/// Remove every cart line.
///
/// # Errors
///
/// Returns an error if the call fails.
#[allow(clippy::print_stdout)]
pub async fn clear(client: &CatalogClient) -> Result<(), CliError> {
    let message = client.clear_cart().await?;
    println!("{message}");
    Ok(())
}

fn quantity(value: i64) -> Result<Quantity, CliError> {
    Quantity::new(value).map_err(|e| CliError::Invalid(e.to_string()))
}

fn format_cart(cart: &CartSummary) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = format!("{:<24} {:<32} {:>5} {:>12}\n", "LINE", "PRODUCT", "QTY", "TOTAL");
    for item in &cart.items {
        out.push_str(&format!(
            "{:<24} {:<32} {:>5} {:>12}\n",
            item.id,
            item.product.title,
            item.qty,
            item.final_total.display()
        ));
    }
    out.push_str(&format!("\nSubtotal: {}", cart.total.display()));
    out.push_str(&format!("\nTotal:    {}", cart.final_total.display()));
    out
}
