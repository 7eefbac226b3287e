//! End-to-end demo: encode a small plant catalog, build a profile from a
//! few liked plants, and print ranked recommendations.
//!
//! Run with: `cargo run --example recommend_plants`

use vivero::prelude::*;

fn main() -> Result<()> {
    let mut schema = Schema::new(vec![
        AttributeDef::boolean("blooms"),
        AttributeDef::numeric("height", "m").with_priority(0.5),
        AttributeDef::color("flower_color"),
        AttributeDef::categorical("family").with_priority(2.0),
    ])?;

    let mut catalog = vec![
        Item::new("Rosa canina")
            .with("blooms", true)
            .with("height", 2.5)
            .with("flower_color", "Red")
            .with("family", "Rosaceae"),
        Item::new("Rosa rubiginosa")
            .with("blooms", true)
            .with("height", 1.8)
            .with("flower_color", "Red")
            .with("family", "Rosaceae"),
        Item::new("Phyllostachys aurea")
            .with("blooms", false)
            .with("height", 6.0)
            .with("flower_color", "Green")
            .with("family", "Poaceae"),
        Item::new("Lavandula angustifolia")
            .with("blooms", true)
            .with("height", 0.6)
            .with("flower_color", "Purple")
            .with("family", "Lamiaceae"),
        Item::new("Helianthus annuus")
            .with("blooms", true)
            .with("height", 2.0)
            .with("flower_color", "Yellow")
            .with("family", "Asteraceae"),
    ];
    init_features(&mut schema, &mut catalog)?;
    println!(
        "encoded {} plants into {}-slot vectors",
        catalog.len(),
        schema.n_features()
    );

    // The user likes both roses.
    let exemplars: Vec<Exemplar> = ["Rosa canina", "Rosa rubiginosa"]
        .iter()
        .filter_map(|name| find_item(&catalog, name))
        .map(Exemplar::new)
        .collect();
    let profile = build_profile(&catalog, &exemplars, &schema)?;

    if let Some(family) = schema.attribute_index("family") {
        if let Some(diversity) = profile.diversity(family) {
            println!("family diversity: {diversity:.3} bits");
        }
    }

    println!("\nrecommendations:");
    let ranked = recommend(&catalog, &exemplars, &schema, &profile, true)?;
    for rec in &ranked {
        println!("  {:<24} {:.4}", catalog[rec.item].name(), rec.score);
    }

    // A new delivery arrives: one hydrangea. Its family is new, so the
    // whole catalog is re-encoded under the wider layout, and the profile
    // has to be rebuilt before scoring again.
    let mut delivery = vec![Item::new("Hydrangea macrophylla")
        .with("blooms", true)
        .with("height", 1.5)
        .with("flower_color", "Blue")
        .with("family", "Hydrangeaceae")];
    encode_batch(&mut schema, &mut delivery, &mut catalog)?;
    catalog.extend(delivery);

    let profile = build_profile(&catalog, &exemplars, &schema)?;
    let ranked = recommend(&catalog, &exemplars, &schema, &profile, true)?;
    println!("\nafter the delivery ({} slots):", schema.n_features());
    for rec in &ranked {
        println!("  {:<24} {:.4}", catalog[rec.item].name(), rec.score);
    }

    Ok(())
}
