//! Catalog sources
//!
//! The built-in motorcycle lineup, plus loading a replacement catalog from
//! a JSON file (see `Config::catalog_path`).

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::domain::{Catalog, Product};

const IMAGE_BASE: &str = "https://images.unsplash.com";

fn image(photo: &str) -> String {
    format!("{}/{}?w=800&q=80", IMAGE_BASE, photo)
}

fn usd(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

/// The built-in lineup, in display order
pub fn builtin_products() -> Vec<Product> {
    vec![
        Product::new(
            1,
            "Kawasaki Ninja ZX-10R",
            usd(17_399),
            4.9,
            "Track-bred superbike with a 998cc inline-four and race-derived electronics.",
            image("photo-1558981806-ec527fa84c39"),
        )
        .with_badge("Bestseller")
        .with_colors(["Lime Green", "Metallic Matte Graphenesteel Gray"]),
        Product::new(
            2,
            "Yamaha MT-07",
            usd(7_999),
            4.7,
            "Torque-rich 689cc naked bike, light and easy for everyday riding.",
            image("photo-1568772585407-9361f9bf3a87"),
        )
        .with_colors(["Icon Blue", "Cyan Storm", "Matte Raven Black"]),
        Product::new(
            3,
            "BMW R 1250 GS Adventure",
            usd(22_845),
            4.8,
            "Boxer-powered adventure tourer with a 30-litre tank for long expeditions.",
            image("photo-1609630875171-b1321377ee65"),
        )
        .with_badge("Premium")
        .with_colors(["Triple Black", "Rallye"]),
        Product::new(
            4,
            "Ducati Panigale V4",
            usd(28_995),
            4.9,
            "MotoGP-derived Desmosedici Stradale V4 with 214 hp.",
            image("photo-1547549082-6bc09f2049ae"),
        )
        .with_badge("New")
        .with_colors(["Ducati Red"]),
        Product::new(
            5,
            "Harley-Davidson Fat Boy 114",
            usd(21_999),
            4.6,
            "Milwaukee-Eight 114 cruiser with solid-disc wheels and wide bars.",
            image("photo-1558980664-769d59546b3d"),
        )
        .with_colors(["Vivid Black", "Billiard Gray"]),
        Product::new(
            6,
            "Honda CBR650R",
            usd(9_899),
            4.5,
            "Inline-four sportbike tuned for the street, comfortable enough to commute.",
            image("photo-1580310614729-ccd69652491d"),
        )
        .with_colors(["Grand Prix Red", "Matte Black Metallic"]),
        Product::new(
            7,
            "Triumph Bonneville T120",
            usd(12_995),
            4.6,
            "Modern classic with a 1200cc parallel twin and timeless British styling.",
            image("photo-1571068316344-75bc76f77890"),
        )
        .with_colors(["Jet Black", "Cordovan Red"]),
        Product::new(
            8,
            "KTM 390 Duke",
            usd(5_899),
            4.4,
            "Light, agile single-cylinder naked bike, a favourite for new riders.",
            image("photo-1449426468159-d96dbf08f19f"),
        )
        .with_badge("Beginner")
        .with_colors(["Electronic Orange", "Atlantic Blue"]),
        Product::new(
            9,
            "Suzuki Hayabusa",
            usd(18_999),
            4.8,
            "Legendary hyperbike with a 1340cc four and relentless top-end pull.",
            image("photo-1591637333184-19aa84b3e01f"),
        )
        .with_colors(["Glass Sparkle Black", "Pearl Brilliant White"]),
        Product::new(
            10,
            "Indian Chief Dark Horse",
            usd(19_499),
            4.5,
            "Blacked-out cruiser with a Thunderstroke 116 V-twin.",
            image("photo-1605152276897-4f618f831968"),
        )
        .with_colors(["Black Smoke"]),
        Product::new(
            11,
            "Aprilia RSV4 Factory",
            usd(26_999),
            4.8,
            "V4 superbike with semi-active Öhlins suspension and winglets.",
            image("photo-1614165936126-2ed18e471b10"),
        )
        .with_colors(["Ultra Dark", "Aprilia Racing"]),
        Product::new(
            12,
            "Honda Gold Wing Tour",
            usd(33_200),
            4.7,
            "Flat-six luxury tourer with airbag option, heated seats and a premium audio system.",
            image("photo-1622185135505-2d795003994a"),
        )
        .with_badge("Luxury")
        .with_colors(["Pearl Glare White", "Bordeaux Red Metallic"]),
    ]
}

/// The built-in catalog
pub fn builtin_catalog() -> Result<Catalog> {
    Catalog::new(builtin_products()).context("Built-in catalog is invalid")
}

/// Load a catalog from a JSON file holding an array of products
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    Catalog::from_json(&content)
        .with_context(|| format!("Invalid catalog file: {}", path.display()))
}
