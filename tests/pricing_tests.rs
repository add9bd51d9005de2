use stepper_core::errors::PricingError;
use stepper_core::pricing::{self, Catalog};

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert("Camisa".to_string(), 30.0);
    catalog.insert("Pantalón".to_string(), 45.0);
    catalog.insert("Traje".to_string(), 90.0);
    catalog
}

#[test]
fn order_totals_feed_the_discount_tier() {
    let quote = pricing::quote(&["Traje", "Camisa"], &catalog()).expect("quote");
    assert_eq!(quote.subtotal, 120.0);
    assert_eq!(quote.percent, 20);
    assert_eq!(quote.final_price, 96.0);
    assert_eq!(quote.savings, 24.0);

    let middle = pricing::quote(&["Camisa", "Camisa"], &catalog()).expect("quote");
    assert_eq!(middle.percent, 10);
    assert_eq!(middle.final_price, 54.0);
}

#[test]
fn repeated_products_count_every_time() {
    let total = pricing::order_total(&["Camisa", "Camisa", "Camisa"], &catalog()).expect("total");
    assert_eq!(total, 90.0);
    assert_eq!(pricing::order_total::<&str>(&[], &catalog()), Ok(0.0));
}

#[test]
fn unknown_products_are_reported() {
    assert_eq!(
        pricing::quote(&["Sombrero"], &catalog()),
        Err(PricingError::UnknownProduct("Sombrero".into()))
    );
}

#[test]
fn tier_boundaries_belong_to_the_lower_tier() {
    assert_eq!(pricing::discount(50.0).map(|d| d.percent), Ok(0));
    assert_eq!(pricing::discount(100.0).map(|d| d.percent), Ok(10));
    assert_eq!(pricing::discount(100.01).map(|d| d.percent), Ok(20));
}
