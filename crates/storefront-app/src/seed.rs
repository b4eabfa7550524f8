use rust_decimal::Decimal;
use storefront_hex::domain::product::{NewProduct, VariantOptions};

fn product(
    title: &str,
    description: &str,
    cents: i64,
    inventory: u32,
    options: &[(&str, &[&str])],
) -> NewProduct {
    let variant_options: VariantOptions = options
        .iter()
        .map(|(dimension, values)| {
            (
                dimension.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect();
    NewProduct {
        title: title.into(),
        description: Some(description.into()),
        image_url: None,
        price: Decimal::new(cents, 2),
        inventory,
        variant_options,
    }
}

/// Demo catalog loaded on start-up when `SEED_CATALOG` is set.
pub fn demo_catalog() -> Vec<NewProduct> {
    vec![
        product(
            "Laptop Pro 14",
            "14 inch laptop with a long-lasting battery.",
            199_999,
            50,
            &[
                ("color", &["Space Grey", "Silver"]),
                ("storage", &["512GB", "1TB"]),
            ],
        ),
        product(
            "Green Oval Earring",
            "Oval earring in green stone.",
            2_499,
            200,
            &[("material", &["Gold", "Silver"]), ("size", &["Small", "Medium"])],
        ),
        product(
            "Phone X",
            "Smartphone with dual cameras.",
            89_999,
            80,
            &[("color", &["Silver", "Space Grey"]), ("storage", &["64GB", "256GB"])],
        ),
        product(
            "Diver Watch",
            "Steel watch with a rotating bezel.",
            1_399_999,
            15,
            &[("bezel", &["Black", "Blue"])],
        ),
        product(
            "Golden Shoes",
            "Comfortable shoes with a faux leather finish.",
            4_999,
            150,
            &[("size", &["6", "7", "8", "9", "10"])],
        ),
        product(
            "Canvas Tote",
            "Plain canvas bag.",
            1_500,
            0,
            &[],
        ),
    ]
}
