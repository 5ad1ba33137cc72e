//! Seed data generator: writes a randomized restaurant file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::store::{Hours, Restaurant, TableInventory, Tables};

const CUISINES: &[&str] = &[
    "Italian", "Japanese", "Mexican", "Chinese", "American", "Indian", "Thai", "French", "Greek",
    "Korean", "Vietnamese", "Spanish", "Mediterranean", "Brazilian", "Lebanese",
];

const LOCATIONS: &[&str] = &[
    "Downtown", "Riverfront", "Westside", "Eastside", "Northend", "Southside", "Midtown",
    "Uptown", "Oceanview", "Lakeside", "Central District", "Financial District",
];

const FEATURES: &[&str] = &[
    "outdoor seating", "kid-friendly", "wheelchair accessible", "takeout", "delivery", "bar",
    "live music", "vegetarian options", "vegan options", "gluten-free options", "private dining",
    "romantic", "trendy", "casual", "fine dining", "pet-friendly",
];

const PRICE_RANGES: &[&str] = &["$", "$$", "$$$", "$$$$"];

const NAME_PREFIXES: &[&str] = &[
    "The", "Little", "Golden", "Royal", "Blue", "Green", "Red", "Silver", "Grand", "Classic",
    "Urban", "Village", "Rustic", "Modern", "Vintage",
];

const NAME_SUFFIXES: &[&str] = &[
    "Bistro", "Kitchen", "Grill", "Restaurant", "Cafe", "Diner", "Eatery", "House",
    "Bar & Grill", "Steakhouse", "Trattoria", "Palace", "Garden", "Lounge", "Table",
];

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// How many restaurants to generate
    #[arg(short, long, default_value_t = 30)]
    pub count: u32,

    /// Where to write the restaurant file
    #[arg(short, long, default_value = "data/restaurants.json")]
    pub output: PathBuf,
}

/// Generate and write the restaurant file, then print a cuisine summary.
pub fn run_seed(args: SeedArgs) -> anyhow::Result<()> {
    let restaurants = generate_restaurants(args.count);

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&restaurants)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} restaurants to {}",
        restaurants.len(),
        args.output.display()
    );

    let mut counts: Vec<(String, usize)> = Vec::new();
    for restaurant in &restaurants {
        match counts.iter_mut().find(|(c, _)| *c == restaurant.cuisine) {
            Some((_, n)) => *n += 1,
            None => counts.push((restaurant.cuisine.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    println!("\nCuisine distribution:");
    for (cuisine, count) in counts {
        println!("- {cuisine}: {count}");
    }

    Ok(())
}

/// Generate `count` randomized restaurants with sequential `rest{NNN}` ids.
pub fn generate_restaurants(count: u32) -> Vec<Restaurant> {
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|i| {
            let cuisine = pick(&mut rng, CUISINES);
            let location = pick(&mut rng, LOCATIONS);
            let price_range = pick(&mut rng, PRICE_RANGES);
            let name = generate_name(&mut rng, &cuisine);

            let small = rng.gen_range(3..=12);
            let medium = rng.gen_range(3..=10);
            let large = rng.gen_range(1..=5);
            let capacity = small * 2 + medium * 4 + large * 8;

            let feature_count = rng.gen_range(2..=5);
            let features: Vec<String> = FEATURES
                .choose_multiple(&mut rng, feature_count)
                .map(|f| f.to_string())
                .collect();

            let rating = (rng.gen_range(3.0..=5.0f64) * 10.0).round() / 10.0;
            let open = format!("{:02}:00", rng.gen_range(7..=12));
            let close = format!("{:02}:00", rng.gen_range(20..=23));

            Restaurant {
                id: format!("rest{:03}", i + 1),
                name,
                location: location.clone(),
                cuisine: cuisine.clone(),
                capacity,
                tables: Tables {
                    small: TableInventory { capacity: 2, count: small },
                    medium: TableInventory { capacity: 4, count: medium },
                    large: TableInventory { capacity: 8, count: large },
                },
                hours: Hours { open, close },
                price_range: price_range.clone(),
                features,
                description: format!(
                    "A {price_range} {} restaurant located in {location}.",
                    cuisine.to_lowercase()
                ),
                rating,
            }
        })
        .collect()
}

fn generate_name(rng: &mut impl Rng, cuisine: &str) -> String {
    // Roughly a third of names work the cuisine in.
    if rng.gen_bool(0.3) {
        format!("{} {cuisine} {}", pick(rng, NAME_PREFIXES), pick(rng, NAME_SUFFIXES))
    } else {
        format!("{} {}", pick(rng, NAME_PREFIXES), pick(rng, NAME_SUFFIXES))
    }
}

fn pick(rng: &mut impl Rng, options: &[&str]) -> String {
    options
        .choose(rng)
        .copied()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TableType;

    #[test]
    fn generated_restaurants_are_well_formed() {
        let restaurants = generate_restaurants(25);
        assert_eq!(restaurants.len(), 25);
        assert_eq!(restaurants[0].id, "rest001");
        assert_eq!(restaurants[24].id, "rest025");

        for r in &restaurants {
            assert_eq!(
                r.capacity,
                r.tables.get(TableType::Small).count * 2
                    + r.tables.get(TableType::Medium).count * 4
                    + r.tables.get(TableType::Large).count * 8
            );
            assert!((3.0..=5.0).contains(&r.rating));
            assert!(r.features.len() >= 2 && r.features.len() <= 5);
            assert!(r.hours.open < r.hours.close);
            assert!(!r.name.is_empty());
            assert!(r.description.contains(&r.location));
        }
    }
}
