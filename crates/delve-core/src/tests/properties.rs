//! Property tests for the rules every tick must keep.

use glam::Vec2;
use proptest::prelude::*;

use crate::config::{PlayerConfig, SessionConfig};
use crate::descriptor::TilePos;
use crate::entity::{DamageOutcome, EntityTag, Health};
use crate::input::{InputFrame, Intents};
use crate::interaction::{
    confirm_offer, unlock_door, DoorOutcome, TradeEffect, TradeOffer, TradeOutcome,
};
use crate::player::Player;
use crate::session::Session;

use super::helpers::{hostile_at, walled_room};

const MOVES: [Intents; 9] = [
    Intents::empty(),
    Intents::UP,
    Intents::DOWN,
    Intents::LEFT,
    Intents::RIGHT,
    Intents::UP.union(Intents::LEFT),
    Intents::UP.union(Intents::RIGHT),
    Intents::DOWN.union(Intents::LEFT),
    Intents::DOWN.union(Intents::RIGHT),
];

fn frame(choice: u8) -> InputFrame {
    let walk = MOVES[usize::from(choice) % MOVES.len()];
    let attack = if choice >= 200 {
        Intents::ATTACK
    } else {
        Intents::empty()
    };
    InputFrame::new(walk | attack)
}

fn crowded_session(seed: u64) -> Session {
    let mut level = walled_room();
    level.containers = vec![TilePos::new(6, 4), TilePos::new(3, 6)];
    level.hostiles = vec![hostile_at(6, 2), hostile_at(2, 6), hostile_at(7, 7)];
    level.doors = vec![TilePos::new(4, 7)];
    Session::new(seed, SessionConfig::default(), level).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn movers_never_overlap_solids(
        seed in any::<u64>(),
        inputs in prop::collection::vec(any::<u8>(), 1..120),
    ) {
        let mut session = crowded_session(seed);
        for choice in inputs {
            session.step(&frame(choice));

            let world = session.world();
            let solids: Vec<_> = world
                .arena
                .live_entities()
                .filter(|e| e.is_solid())
                .map(|e| (e.id(), e.rect()))
                .collect();

            for (id, rect) in &solids {
                prop_assert!(
                    !world.player.body.hit.intersects(rect),
                    "player overlaps {} at tick {}",
                    id,
                    session.tick()
                );
            }
            for hostile in world.arena.live_entities().filter(|e| e.tag() == EntityTag::Hostile) {
                let hit = hostile.rect();
                for (id, rect) in &solids {
                    prop_assert!(!hit.intersects(rect), "hostile {} overlaps {}", hostile.id(), id);
                }
            }
        }
    }

    #[test]
    fn health_stays_in_range_and_dies_once(hits in prop::collection::vec(0_u8..50, 0..30)) {
        let mut health = Health::new(100.0);
        let mut deaths = 0;
        let mut dealt = 0_u32;
        for hit in hits {
            dealt += u32::from(hit);
            if health.apply_damage(f32::from(hit)) == DamageOutcome::Died {
                deaths += 1;
            }
            prop_assert!(health.current() >= 0.0 && health.current() <= health.max());
        }
        prop_assert!(deaths <= 1);
        prop_assert_eq!(deaths == 1, dealt >= 100);
    }

    #[test]
    fn trades_are_all_or_nothing(
        currency in 0_u32..20,
        cost in 0_u32..20,
        amount in 0_u32..10,
        arrows in any::<bool>(),
    ) {
        let mut player = Player::spawn(Vec2::ZERO, 64.0, &PlayerConfig::default());
        player.currency = currency;
        let effect = if arrows {
            TradeEffect::Ammunition(amount)
        } else {
            TradeEffect::HealConsumable(amount)
        };
        let before = player.clone();

        let outcome = confirm_offer(&TradeOffer::new("offer", cost, effect), &mut player);

        if currency >= cost {
            prop_assert_eq!(outcome, TradeOutcome::Purchased { cost, effect });
            prop_assert_eq!(player.currency, currency - cost);
            let (ammo, bottles) = if arrows { (amount, 0) } else { (0, amount) };
            prop_assert_eq!(player.ammunition, before.ammunition + ammo);
            prop_assert_eq!(player.heal_consumables, before.heal_consumables + bottles);
        } else {
            prop_assert_eq!(outcome, TradeOutcome::Rejected { cost, currency });
            prop_assert_eq!(player, before);
        }
    }

    #[test]
    fn each_key_opens_one_door(keys in 0_u32..5, attempts in 0_u32..8) {
        let mut player = Player::spawn(Vec2::ZERO, 64.0, &PlayerConfig::default());
        player.keys = keys;
        let opened = (0..attempts)
            .filter(|_| unlock_door(&mut player) == DoorOutcome::Unlocked)
            .count();
        prop_assert_eq!(opened, keys.min(attempts) as usize);
        prop_assert_eq!(player.keys, keys.saturating_sub(attempts));
    }
}
