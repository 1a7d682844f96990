//! Product listing and detail commands.

use corner_shop_core::{Product, ProductId, ProductPage};
use corner_shop_storefront::catalog::CatalogClient;

use super::CliError;

/// Print one page of products as a table.
///
/// # Errors
///
/// Returns an error if the catalog API call fails.
#[allow(clippy::print_stdout)]
pub async fn list(client: &CatalogClient, page: u32, category: Option<&str>) -> Result<(), CliError> {
    let page = client.list_products(page, category).await?;
    println!("{}", format_page(&page));
    Ok(())
}

/// Print the details of one product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the call fails.
#[allow(clippy::print_stdout)]
pub async fn show(client: &CatalogClient, id: &str) -> Result<(), CliError> {
    let product = client.get_product(&ProductId::new(id)).await?;
    println!("{}", format_product(&product));
    Ok(())
}

fn format_page(page: &ProductPage) -> String {
    if page.products.is_empty() {
        return "No products found.".to_string();
    }

    let mut out = format!("{:<24} {:<32} {:<16} {:>12}\n", "ID", "TITLE", "CATEGORY", "PRICE");
    for product in &page.products {
        out.push_str(&format!(
            "{:<24} {:<32} {:<16} {:>12}\n",
            product.id,
            product.title,
            product.category,
            product.price.display()
        ));
    }

    let p = &page.pagination;
    out.push_str(&format!("\nPage {} of {}", p.current_page, p.total_pages));
    if !p.category.is_empty() {
        out.push_str(&format!(" ({})", p.category));
    }
    out
}

fn format_product(product: &Product) -> String {
    let mut out = format!("{} [{}]\n", product.title, product.id);
    out.push_str(&format!("Category: {}\n", product.category));
    if product.is_discounted() {
        out.push_str(&format!(
            "Price:    {} (was {}) per {}\n",
            product.price.display(),
            product.original_price.display(),
            product.unit
        ));
    } else {
        out.push_str(&format!(
            "Price:    {} per {}\n",
            product.price.display(),
            product.unit
        ));
    }
    if !product.description.is_empty() {
        out.push_str(&format!("\n{}\n", product.description));
    }
    if !product.content.is_empty() {
        out.push_str(&format!("\n{}\n", product.content));
    }
    out
}

#[cfg(test)]
mod tests {
    use corner_shop_core::{Pagination, Price};

    use super::*;

    fn product(price: i64, original: i64) -> Product {
        Product {
            id: ProductId::new("-Lp1"),
            title: "Rice Crackers".to_string(),
            category: "Snacks".to_string(),
            image_url: String::new(),
            images_url: vec![],
            content: String::new(),
            description: "Crunchy".to_string(),
            price: Price::from_whole(price),
            original_price: Price::from_whole(original),
            unit: "bag".to_string(),
            is_enabled: true,
        }
    }

    #[test]
    fn test_format_empty_page() {
        assert_eq!(format_page(&ProductPage::default()), "No products found.");
    }

    #[test]
    fn test_format_page_lists_rows_and_position() {
        let page = ProductPage {
            products: vec![product(80, 100)],
            pagination: Pagination {
                total_pages: 3,
                current_page: 2,
                has_pre: true,
                has_next: true,
                category: "Snacks".to_string(),
            },
        };

        let out = format_page(&page);
        assert!(out.contains("-Lp1"));
        assert!(out.contains("Rice Crackers"));
        assert!(out.ends_with("Page 2 of 3 (Snacks)"));
    }

    #[test]
    fn test_format_product_shows_discount() {
        let out = format_product(&product(80, 100));
        assert!(out.contains("(was NT$100)"));

        let out = format_product(&product(100, 100));
        assert!(!out.contains("was"));
        assert!(out.contains("Crunchy"));
    }
}
