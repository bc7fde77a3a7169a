//! Drop rolling for resolved encounter options.

use log::debug;
use rand::Rng;

use encounter_shared::DropEntry;

/// A reward granted by a drop roll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropAward {
    pub asset_id: u32,
    pub quantity: u32,
}

/// Roll a drop table. Every entry rolls independently: `chance` gates the
/// drop and the quantity is uniform in `min..=max`.
pub fn roll_drops(entries: &[DropEntry]) -> Vec<DropAward> {
    let mut rng = rand::thread_rng();
    let mut awards = Vec::new();

    for entry in entries {
        let chance = entry.chance.clamp(0.0, 1.0);
        if chance < 1.0 && !rng.gen_bool(chance as f64) {
            continue;
        }

        let quantity = if entry.max_quantity > entry.min_quantity {
            rng.gen_range(entry.min_quantity..=entry.max_quantity)
        } else {
            entry.min_quantity
        };

        debug!("Dropped asset {} x{}", entry.asset_id, quantity);
        awards.push(DropAward {
            asset_id: entry.asset_id,
            quantity,
        });
    }

    awards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(asset_id: u32, min: u32, max: u32, chance: f32) -> DropEntry {
        DropEntry {
            asset_id,
            min_quantity: min,
            max_quantity: max,
            chance,
        }
    }

    #[test]
    fn certain_drops_always_land() {
        let awards = roll_drops(&[entry(3, 1, 1, 1.0)]);
        assert_eq!(
            awards,
            vec![DropAward {
                asset_id: 3,
                quantity: 1,
            }]
        );
    }

    #[test]
    fn zero_chance_never_drops() {
        for _ in 0..100 {
            assert!(roll_drops(&[entry(3, 1, 1, 0.0)]).is_empty());
        }
    }

    #[test]
    fn quantity_stays_in_range() {
        for _ in 0..100 {
            let awards = roll_drops(&[entry(2, 2, 5, 1.0)]);
            assert_eq!(awards.len(), 1);
            assert!((2..=5).contains(&awards[0].quantity));
        }
    }

    #[test]
    fn entries_roll_independently() {
        let awards = roll_drops(&[entry(1, 1, 1, 1.0), entry(2, 1, 1, 0.0), entry(3, 1, 1, 1.0)]);
        let ids: Vec<u32> = awards.iter().map(|a| a.asset_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
