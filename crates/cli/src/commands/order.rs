//! Order command.

use corner_shop_core::{FieldErrors, OrderForm};
use corner_shop_storefront::catalog::CatalogClient;

use super::CliError;

/// Validate the form and place an order for the current cart.
///
/// Nothing is sent when a field is invalid.
///
/// # Errors
///
/// Returns an error listing the invalid fields, or if the call fails.
#[allow(clippy::print_stdout)]
pub async fn submit(client: &CatalogClient, form: &OrderForm) -> Result<(), CliError> {
    let order = form
        .validate()
        .map_err(|invalid| CliError::Invalid(describe(&invalid.0)))?;

    let receipt = client.submit_order(&order).await?;
    println!("Order {} placed", receipt.order_id);
    if !receipt.message.is_empty() {
        println!("{}", receipt.message);
    }
    Ok(())
}

fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}", field.as_str()))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_fields_in_order() {
        let form = OrderForm {
            name: "Lin".to_string(),
            email: "abc@x".to_string(),
            tel: "123".to_string(),
            address: "Taipei".to_string(),
            message: String::new(),
        };
        let errors = form.validate().unwrap_err().0;

        let text = describe(&errors);
        assert!(text.starts_with("email: "));
        assert!(text.contains("; tel: "));
        assert!(!text.contains("name:"));
    }
}
