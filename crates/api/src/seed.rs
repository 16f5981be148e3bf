//! Catalog seeding for fresh deployments.

use domain::store::{ProductCatalog, Result};
use domain::{Category, Money, Product};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Seeds the starter catalog if the store is empty; otherwise does nothing.
pub async fn seed_products<C: ProductCatalog>(catalog: &C) -> Result<()> {
    let count = catalog.count().await?;
    if count > 0 {
        tracing::info!(count, "products already exist, skipping seed");
        return Ok(());
    }

    let products = vec![
        Product::new("Blueberry Muffins", Category::Pastries, Money::from_cents(499))
            .with_description(
                "Fresh blueberry muffins with a tender crumb and burst of juicy blueberries",
            )
            .with_image("fruit-tart.jpg")
            .with_details(
                "100g",
                strings(&["Wheat", "Eggs", "Milk", "Blueberries"]),
                strings(&[
                    "Flour",
                    "Sugar",
                    "Eggs",
                    "Milk",
                    "Blueberries",
                    "Baking Powder",
                    "Vanilla",
                ]),
            ),
        Product::new("Bagel", Category::Breads, Money::from_cents(349))
            .with_description("Chewy classic New York-style bagel, perfect for breakfast")
            .with_image("sourdough.jpg")
            .with_details(
                "120g",
                strings(&["Wheat", "Sesame Seeds"]),
                strings(&["Flour", "Water", "Salt", "Yeast", "Sesame Seeds"]),
            ),
        Product::new("Oatmeal Raisin Cookies", Category::Cookies, Money::from_cents(599))
            .with_description("Wholesome oatmeal cookies loaded with plump raisins")
            .with_image("chocolate-chip.jpg")
            .with_details(
                "250g (6 cookies)",
                strings(&["Wheat", "Eggs", "Milk", "Oats", "Raisins"]),
                strings(&[
                    "Oats",
                    "Flour",
                    "Butter",
                    "Sugar",
                    "Eggs",
                    "Raisins",
                    "Vanilla",
                    "Baking Soda",
                ]),
            ),
        Product::new("Tiramisu", Category::Desserts, Money::from_cents(899))
            .with_description("Classic Italian dessert with layers of mascarpone cream and coffee")
            .with_image("tiramisu.jpg")
            .with_details(
                "200g",
                strings(&["Eggs", "Milk", "Coffee", "Cocoa"]),
                strings(&[
                    "Mascarpone",
                    "Eggs",
                    "Sugar",
                    "Ladyfingers",
                    "Coffee",
                    "Cocoa Powder",
                ]),
            ),
        Product::new("Vanilla Cupcake", Category::Cakes, Money::from_cents(399))
            .with_description("Light and fluffy vanilla cupcake with creamy frosting")
            .with_image("cake.jpg")
            .with_details(
                "85g",
                strings(&["Wheat", "Eggs", "Milk"]),
                strings(&[
                    "Flour",
                    "Sugar",
                    "Eggs",
                    "Milk",
                    "Butter",
                    "Vanilla",
                    "Baking Powder",
                ]),
            ),
        Product::new("Macarons", Category::Pastries, Money::from_cents(1299))
            .with_description("Colorful French almond meringue cookies with smooth shells")
            .with_image("macarons.jpg")
            .with_details(
                "150g (6 pieces)",
                strings(&["Almonds", "Eggs"]),
                strings(&[
                    "Almond Flour",
                    "Egg Whites",
                    "Sugar",
                    "Food Coloring",
                    "Powdered Sugar",
                ]),
            ),
        Product::new("Chocolate Chip Cookies", Category::Cookies, Money::from_cents(449))
            .with_description("Classic soft cookies packed with chocolate chips")
            .with_image("chocolate-chip.jpg")
            .with_details(
                "300g (12 cookies)",
                strings(&["Wheat", "Eggs", "Milk", "Chocolate"]),
                strings(&[
                    "Flour",
                    "Butter",
                    "Sugar",
                    "Eggs",
                    "Vanilla",
                    "Chocolate Chips",
                    "Baking Soda",
                ]),
            ),
        Product::new("Whole Wheat Bread", Category::Breads, Money::from_cents(649))
            .with_description("Nutritious whole wheat loaf with a rustic crust")
            .with_image("whole-wheat.jpg")
            .with_details(
                "400g",
                strings(&["Wheat"]),
                strings(&["Whole Wheat Flour", "Water", "Yeast", "Salt", "Honey"]),
            ),
        Product::new("Sourdough Bread", Category::Breads, Money::from_cents(799))
            .with_description("Tangy artisan sourdough with a crispy crust and airy crumb")
            .with_image("sourdough.jpg")
            .with_details(
                "450g",
                strings(&["Wheat"]),
                strings(&["Flour", "Water", "Salt", "Sourdough Starter"]),
            ),
        Product::new("Croissant", Category::Pastries, Money::from_cents(499))
            .with_description("Buttery French croissant with crispy, flaky layers")
            .with_image("croissant.jpg")
            .with_details(
                "80g",
                strings(&["Wheat", "Milk", "Eggs"]),
                strings(&["Flour", "Butter", "Water", "Salt", "Yeast", "Sugar"]),
            ),
        Product::new("Fruit Tart", Category::Desserts, Money::from_cents(999))
            .with_description("Elegant tart with creamy custard and fresh seasonal fruits")
            .with_image("fruit-tart.jpg")
            .with_details(
                "200g",
                strings(&["Wheat", "Eggs", "Milk", "Fruits"]),
                strings(&["Tart Shell", "Custard Cream", "Fresh Fruits", "Apricot Glaze"]),
            ),
        Product::new("Red Velvet Cake", Category::Cakes, Money::from_cents(1099))
            .with_description("Rich red velvet cake with cream cheese frosting")
            .with_image("red-velvet.jpg")
            .with_details(
                "300g",
                strings(&["Wheat", "Eggs", "Milk", "Cocoa"]),
                strings(&[
                    "Flour",
                    "Cocoa Powder",
                    "Eggs",
                    "Milk",
                    "Red Food Coloring",
                    "Cream Cheese",
                ]),
            ),
        Product::new("Chocolate Cake", Category::Cakes, Money::from_cents(999))
            .with_description("Decadent dark chocolate cake with rich chocolate frosting")
            .with_image("chocolate-cake.jpg")
            .with_details(
                "250g",
                strings(&["Wheat", "Eggs", "Milk", "Chocolate"]),
                strings(&[
                    "Flour",
                    "Cocoa Powder",
                    "Sugar",
                    "Eggs",
                    "Milk",
                    "Chocolate",
                    "Butter",
                ]),
            ),
    ];

    let seeded = products.len();
    for product in products {
        catalog.create(product).await?;
    }

    tracing::info!(seeded, "seeded starter catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_store::InMemoryCatalog;

    #[tokio::test]
    async fn seeds_empty_catalog_once() {
        let catalog = InMemoryCatalog::new();

        seed_products(&catalog).await.unwrap();
        let first_count = catalog.count().await.unwrap();
        assert_eq!(first_count, 13);

        // Second run is a no-op.
        seed_products(&catalog).await.unwrap();
        assert_eq!(catalog.count().await.unwrap(), first_count);
    }

    #[tokio::test]
    async fn seeded_products_cover_every_category() {
        let catalog = InMemoryCatalog::new();
        seed_products(&catalog).await.unwrap();

        for category in Category::ALL {
            let found = catalog.find_available(Some(category)).await.unwrap();
            assert!(!found.is_empty(), "no products in {category:?}");
        }

        let pastries = catalog
            .find_available(Some(Category::Pastries))
            .await
            .unwrap();
        assert!(pastries.iter().any(|p| p.name == "Blueberry Muffins"));
    }
}
