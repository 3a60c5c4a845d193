//! Spawn-time taste rolling, the visit decision, and purchase planning.
//!
//! Tastes are drawn once per traveler: a few liked items, then a few hated
//! ones from the leftover pool so the two sets can never overlap. Planning
//! spends the gold budget on liked slots priciest-first, then sweeps the
//! remaining slots with a decaying impulse-buy chance.

use rand::prelude::*;

use crate::shared::*;

use super::TravelerTastes;

pub fn roll_tastes(
    rng: &mut impl Rng,
    sellable: &[ItemId],
    gold_min: u32,
    gold_max: u32,
) -> TravelerTastes {
    let liked_n = rng.gen_range(2..=3).min(sellable.len());
    let liked: Vec<ItemId> = sellable.choose_multiple(rng, liked_n).cloned().collect();
    let remaining: Vec<ItemId> = sellable
        .iter()
        .filter(|id| !liked.contains(*id))
        .cloned()
        .collect();
    let hated_n = rng.gen_range(2..=3).min(remaining.len());
    let hated: Vec<ItemId> = remaining.choose_multiple(rng, hated_n).cloned().collect();
    let gold = rng.gen_range(gold_min..=gold_max);
    TravelerTastes { liked, hated, gold }
}

/// Whether the traveler detours to the stand. Anything liked on the board
/// wins outright; an all-hated board repels; a mixed board is a coin flip.
pub fn decide_visit(
    rng: &mut impl Rng,
    tastes: &TravelerTastes,
    listed: &[ItemId],
    neutral_chance: f32,
) -> bool {
    if listed.is_empty() {
        return false;
    }
    if listed.iter().any(|id| tastes.liked.contains(id)) {
        return true;
    }
    if listed.iter().all(|id| tastes.hated.contains(id)) {
        return false;
    }
    rng.gen::<f32>() < neutral_chance
}

/// Builds the slot itinerary. Liked slots are bought priciest-first while
/// the running gold budget covers them; the remaining non-hated slots are
/// then swept in board order, each bought at a chance that starts at the
/// configured base and drops by the decrement per neutral purchase.
pub fn plan_purchases(
    rng: &mut impl Rng,
    tastes: &TravelerTastes,
    stand: &RoadsideStand,
    registry: &ItemRegistry,
    buy_base: f32,
    buy_decay: f32,
) -> Vec<usize> {
    let mut plan = Vec::new();
    let mut gold = tastes.gold;

    let mut liked_slots: Vec<(usize, u32)> = Vec::new();
    for (i, slot) in stand.slots.iter().enumerate() {
        let Some(id) = slot else { continue };
        if !tastes.liked.contains(id) {
            continue;
        }
        if let Some(price) = registry.sell_price(id) {
            liked_slots.push((i, price));
        }
    }
    liked_slots.sort_by(|a, b| b.1.cmp(&a.1));
    for (slot, price) in liked_slots {
        if price <= gold {
            plan.push(slot);
            gold -= price;
        }
    }

    let mut chance = buy_base;
    for (i, slot) in stand.slots.iter().enumerate() {
        if chance <= 0.0 {
            break;
        }
        let Some(id) = slot else { continue };
        if plan.contains(&i) || tastes.liked.contains(id) || tastes.hated.contains(id) {
            continue;
        }
        let Some(price) = registry.sell_price(id) else {
            continue;
        };
        if price > gold {
            continue;
        }
        if rng.gen::<f32>() < chance {
            plan.push(i);
            gold -= price;
            chance -= buy_decay;
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn sellable_pool() -> Vec<ItemId> {
        ["daisy", "tulip", "chicory", "wild_berry", "morel", "copper_ore", "iron_ore", "stone"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn registry_with(prices: &[(&str, u32)]) -> ItemRegistry {
        let mut registry = ItemRegistry::default();
        for (id, price) in prices {
            registry.items.insert(
                id.to_string(),
                ItemDef {
                    id: id.to_string(),
                    name: id.to_string(),
                    category: ItemCategory::Forage,
                    sell_price: *price,
                    stack_limit: 99,
                },
            );
        }
        registry
    }

    fn stand_with(listings: &[Option<&str>]) -> RoadsideStand {
        let mut stand = RoadsideStand::default();
        for (i, listing) in listings.iter().enumerate() {
            stand.slots[i] = listing.map(|s| s.to_string());
        }
        stand
    }

    #[test]
    fn tastes_are_disjoint_and_bounded() {
        let pool = sellable_pool();
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let tastes = roll_tastes(&mut rng, &pool, 30, 150);
            assert!((2..=3).contains(&tastes.liked.len()));
            assert!((2..=3).contains(&tastes.hated.len()));
            assert!((30..=150).contains(&tastes.gold));
            for id in &tastes.liked {
                assert!(!tastes.hated.contains(id), "{} both liked and hated", id);
            }
        }
    }

    #[test]
    fn tiny_pools_shrink_the_taste_sets() {
        let pool: Vec<ItemId> = vec!["daisy".to_string(), "tulip".to_string()];
        let mut rng = StdRng::seed_from_u64(8);
        let tastes = roll_tastes(&mut rng, &pool, 10, 10);
        assert_eq!(tastes.liked.len(), 2);
        assert!(tastes.hated.is_empty());
        assert_eq!(tastes.gold, 10);
    }

    #[test]
    fn anything_liked_on_the_board_wins_the_visit() {
        let tastes = TravelerTastes {
            liked: vec!["daisy".to_string()],
            hated: vec!["stone".to_string(), "fiber".to_string()],
            gold: 50,
        };
        let listed = vec![
            "stone".to_string(),
            "fiber".to_string(),
            "daisy".to_string(),
        ];
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(decide_visit(&mut rng, &tastes, &listed, 0.0));
        }
    }

    #[test]
    fn all_hated_or_empty_boards_repel() {
        let tastes = TravelerTastes {
            liked: vec!["daisy".to_string()],
            hated: vec!["stone".to_string(), "fiber".to_string()],
            gold: 50,
        };
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(!decide_visit(&mut rng, &tastes, &[], 1.0));
            let listed = vec!["stone".to_string(), "fiber".to_string()];
            assert!(!decide_visit(&mut rng, &tastes, &listed, 1.0));
        }
    }

    #[test]
    fn neutral_boards_follow_the_configured_chance() {
        let tastes = TravelerTastes {
            liked: vec!["daisy".to_string()],
            hated: vec!["stone".to_string()],
            gold: 50,
        };
        let listed = vec!["tulip".to_string()];
        let mut rng = StdRng::seed_from_u64(77);
        assert!(decide_visit(&mut rng, &tastes, &listed, 1.0));
        assert!(!decide_visit(&mut rng, &tastes, &listed, 0.0));
    }

    #[test]
    fn plan_never_includes_hated_slots() {
        let registry = registry_with(&[("daisy", 12), ("stone", 2), ("tulip", 18)]);
        let stand = stand_with(&[
            Some("stone"),
            Some("daisy"),
            Some("tulip"),
            Some("stone"),
            None,
            None,
        ]);
        let tastes = TravelerTastes {
            liked: vec!["daisy".to_string()],
            hated: vec!["stone".to_string()],
            gold: 1000,
        };
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = plan_purchases(&mut rng, &tastes, &stand, &registry, 1.0, 0.0);
            assert!(!plan.contains(&0), "hated slot planned (seed {})", seed);
            assert!(!plan.contains(&3), "hated slot planned (seed {})", seed);
            assert!(plan.contains(&1));
        }
    }

    #[test]
    fn liked_slots_are_bought_priciest_first_within_budget() {
        let registry = registry_with(&[("daisy", 5), ("tulip", 50), ("chicory", 20)]);
        let stand = stand_with(&[Some("daisy"), Some("tulip"), Some("chicory"), None, None, None]);
        let tastes = TravelerTastes {
            liked: vec!["daisy".to_string(), "tulip".to_string(), "chicory".to_string()],
            hated: vec![],
            gold: 60,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_purchases(&mut rng, &tastes, &stand, &registry, 0.0, 0.0);
        // Tulip (50) first, chicory (20) no longer affordable, daisy (5) fits.
        assert_eq!(plan, vec![1, 0]);
    }

    #[test]
    fn broke_travelers_plan_nothing() {
        let registry = registry_with(&[("daisy", 12)]);
        let stand = stand_with(&[Some("daisy"), None, None, None, None, None]);
        let tastes = TravelerTastes {
            liked: vec!["daisy".to_string()],
            hated: vec![],
            gold: 5,
        };
        let mut rng = StdRng::seed_from_u64(2);
        assert!(plan_purchases(&mut rng, &tastes, &stand, &registry, 1.0, 0.15).is_empty());
    }

    #[test]
    fn neutral_chance_decays_to_zero() {
        let registry = registry_with(&[("wild_berry", 8), ("morel", 11), ("chicory", 15)]);
        let stand = stand_with(&[
            Some("wild_berry"),
            Some("morel"),
            Some("chicory"),
            None,
            None,
            None,
        ]);
        let tastes = TravelerTastes {
            liked: vec![],
            hated: vec![],
            gold: 500,
        };
        // Base 1.0 guarantees the first neutral buy; decay 1.0 kills the
        // chance immediately after, so exactly one slot lands in the plan.
        let mut rng = StdRng::seed_from_u64(3);
        let plan = plan_purchases(&mut rng, &tastes, &stand, &registry, 1.0, 1.0);
        assert_eq!(plan, vec![0]);
    }
}
