//! Property-based tests using proptest.
//!
//! These tests verify the invariants of encoding, profile building and
//! scoring over randomly generated catalogs.

use proptest::prelude::*;
use vivero::prelude::*;

const FAMILIES: [&str; 6] = [
    "Rosaceae",
    "Poaceae",
    "Asteraceae",
    "Fabaceae",
    "Lamiaceae",
    "Orchidaceae",
];
const COLORS: [&str; 5] = ["Red", "Blue", "Green", "White", "Yellow"];

fn garden_schema() -> Schema {
    Schema::new(vec![
        AttributeDef::boolean("blooms"),
        AttributeDef::numeric("height", "m"),
        AttributeDef::color("flower_color"),
        AttributeDef::categorical("family"),
    ])
    .expect("valid schema")
}

// Strategy for generating catalogs of well-formed items.
fn catalog_strategy(max: usize) -> impl Strategy<Value = Vec<Item>> {
    proptest::collection::vec(
        (
            any::<bool>(),
            0.05f32..30.0,
            0..COLORS.len(),
            0..FAMILIES.len(),
            proptest::option::of(0..FAMILIES.len()),
        ),
        1..max,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (blooms, height, color, family, second))| {
                let family = match second {
                    Some(s) if s != family => format!("{},{}", FAMILIES[family], FAMILIES[s]),
                    _ => FAMILIES[family].to_string(),
                };
                Item::new(format!("plant-{i}"))
                    .with("blooms", blooms)
                    .with("height", height)
                    .with("flower_color", COLORS[color])
                    .with("family", family)
            })
            .collect()
    })
}

// Strategy bundling a catalog with a batch split point.
fn catalog_with_split(max: usize) -> impl Strategy<Value = (Vec<Item>, usize)> {
    catalog_strategy(max).prop_flat_map(|items| {
        let len = items.len();
        (Just(items), 0..=len)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn encoded_slots_stay_in_unit_interval(mut items in catalog_strategy(30)) {
        let mut schema = garden_schema();
        init_features(&mut schema, &mut items).expect("encode");
        let blooms = schema.attribute("blooms").expect("blooms attr").slot_offset();
        for item in &items {
            prop_assert_eq!(item.features().len(), schema.n_features());
            for &v in item.features() {
                prop_assert!((0.0..=1.0).contains(&v), "slot {} out of range", v);
            }
            // Boolean slots are exact, never approximate.
            let flag = item.value("blooms").and_then(RawValue::as_flag).expect("flag");
            prop_assert_eq!(item.features()[blooms], if flag { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn reencoding_is_idempotent(mut items in catalog_strategy(30)) {
        let mut schema = garden_schema();
        init_features(&mut schema, &mut items).expect("first pass");
        let before: Vec<Vec<f32>> = items.iter().map(|p| p.features().to_vec()).collect();

        init_features(&mut schema, &mut items).expect("second pass");
        for (item, old) in items.iter().zip(&before) {
            prop_assert_eq!(item.features(), old.as_slice());
        }
    }

    #[test]
    fn split_batches_match_single_pass((items, split) in catalog_with_split(30)) {
        let mut once_schema = garden_schema();
        let mut once = items.clone();
        init_features(&mut once_schema, &mut once).expect("single pass");

        let mut twice_schema = garden_schema();
        let mut twice = items;
        {
            let (first, rest) = twice.split_at_mut(split);
            init_features(&mut twice_schema, first).expect("first batch");
            encode_batch(&mut twice_schema, rest, first).expect("second batch");
        }

        prop_assert_eq!(once_schema.n_features(), twice_schema.n_features());
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert_eq!(a.features(), b.features());
        }
    }

    #[test]
    fn true_ratio_stays_centered(mut items in catalog_strategy(30), pick in 0..100usize) {
        let mut schema = garden_schema();
        init_features(&mut schema, &mut items).expect("encode");
        let exemplars = [Exemplar::new(pick % items.len())];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");

        match profile.get(0).expect("blooms stats") {
            AttributeStats::TrueRatio { ratio } => {
                prop_assert!((-0.5..=0.5).contains(ratio));
            }
            other => prop_assert!(false, "expected TrueRatio, got {:?}", other),
        }
    }

    #[test]
    fn distribution_total_matches_counts(mut items in catalog_strategy(30), pick in 0..100usize) {
        let mut schema = garden_schema();
        init_features(&mut schema, &mut items).expect("encode");
        let exemplars = [
            Exemplar::new(pick % items.len()),
            Exemplar::new((pick / 2) % items.len()),
        ];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        let family = schema.attribute_index("family").expect("family attr");

        match profile.get(family).expect("family stats") {
            AttributeStats::Categories { distribution } => {
                let (total, counts) = distribution.split_last().expect("non-empty");
                let sum: f32 = counts.iter().sum();
                prop_assert!(counts.iter().all(|&c| c >= 0.0));
                prop_assert!((total - sum).abs() < 1e-4);
            }
            other => prop_assert!(false, "expected Categories, got {:?}", other),
        }
    }

    #[test]
    fn scores_are_finite_and_sorted(mut items in catalog_strategy(30), pick in 0..100usize) {
        let mut schema = garden_schema();
        init_features(&mut schema, &mut items).expect("encode");
        let exemplars = [Exemplar::new(pick % items.len())];
        let profile = build_profile(&items, &exemplars, &schema).expect("profile");
        let ranked =
            recommend(&items, &exemplars, &schema, &profile, false).expect("score");

        prop_assert_eq!(ranked.len(), items.len());
        for rec in &ranked {
            prop_assert!(rec.score.is_finite());
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn growth_preserves_family_block(mut items in catalog_strategy(20)) {
        let mut schema = garden_schema();
        init_features(&mut schema, &mut items).expect("first batch");

        let family = schema.attribute("family").expect("family attr");
        let old_range = family.slot_range();
        let old_blocks: Vec<Vec<f32>> = items
            .iter()
            .map(|p| p.features()[old_range.clone()].to_vec())
            .collect();

        // Force growth with a token no generated item carries.
        let mut batch = vec![Item::new("newcomer")
            .with("blooms", true)
            .with("height", 1.0)
            .with("flower_color", "Red")
            .with("family", "Zyzzyxaceae")];
        encode_batch(&mut schema, &mut batch, &mut items).expect("growth batch");

        let family = schema.attribute("family").expect("family attr");
        let offset = family.slot_offset();
        for (item, old_block) in items.iter().zip(&old_blocks) {
            let prefix = &item.features()[offset..offset + old_block.len()];
            prop_assert_eq!(prefix, old_block.as_slice());
        }
    }
}
