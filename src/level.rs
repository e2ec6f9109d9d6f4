//! Level generation
//!
//! Produces the snapshot a round starts from. Scattered levels draw from a
//! seeded `Pcg32`, so the same seed always yields the same level.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::{LevelLayout, LevelSettings, Settings};
use crate::sim::{BlobRecord, EntityId, EntityRecord, Snapshot};

pub struct LevelGenerator {
    level: LevelSettings,
    width: f64,
    height: f64,
    rng: Pcg32,
    /// Last id handed out; ids keep counting across levels
    last_id: EntityId,
}

impl LevelGenerator {
    pub fn new(settings: &Settings, width: f64, height: f64) -> Self {
        Self {
            level: settings.level.clone(),
            width,
            height,
            rng: Pcg32::seed_from_u64(settings.seed),
            last_id: 0,
        }
    }

    /// Build a fresh level at logical time `timestamp`
    pub fn generate(&mut self, timestamp: f64) -> Snapshot {
        let mut snapshot = Snapshot {
            timestamp,
            ..Default::default()
        };
        for _ in 0..self.level.blob_count {
            let blob = match self.level.layout {
                LevelLayout::Centered => self.centered_blob(),
                LevelLayout::Scattered => self.scattered_blob(),
            };
            snapshot.objects.insert(blob.id, EntityRecord::Blob(blob));
        }
        log::info!(
            "Generated {} level with {} blobs",
            self.level.layout.as_str(),
            snapshot.objects.len()
        );
        snapshot
    }

    fn next_id(&mut self) -> EntityId {
        self.last_id += 1;
        self.last_id
    }

    fn centered_blob(&mut self) -> BlobRecord {
        BlobRecord {
            id: self.next_id(),
            x: self.width / 2.0,
            y: self.height / 2.0,
            vx: 0.0,
            vy: 0.0,
            r: self.level.max_radius,
            dead: false,
        }
    }

    fn scattered_blob(&mut self) -> BlobRecord {
        let id = self.next_id();
        let x = self.random_whole(self.width);
        let y = self.random_whole(self.height);
        let r = self.random_whole(self.level.max_radius);
        BlobRecord {
            id,
            x,
            y,
            vx: self.random_speed(),
            vy: self.random_speed(),
            r,
            dead: false,
        }
    }

    /// Whole number in `[0, max)`
    fn random_whole(&mut self, max: f64) -> f64 {
        (self.rng.random::<f64>() * max).floor()
    }

    /// Biased toward positive: `[-max_speed / 2, 3 * max_speed / 2)`
    fn random_speed(&mut self) -> f64 {
        let speed = self.rng.random::<f64>() * self.level.max_speed * 2.0;
        speed - self.level.max_speed / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HEIGHT, WIDTH};

    fn settings(layout: LevelLayout, blob_count: u32, seed: u64) -> Settings {
        Settings {
            seed,
            level: LevelSettings {
                blob_count,
                max_speed: 2.0,
                max_radius: 30.0,
                layout,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_centered_level() {
        let mut generator = LevelGenerator::new(&settings(LevelLayout::Centered, 2, 0), WIDTH, HEIGHT);
        let snap = generator.generate(0.0);
        assert_eq!(snap.objects.len(), 2);
        assert_eq!(snap.timestamp, 0.0);
        for (key, rec) in &snap.objects {
            let EntityRecord::Blob(b) = rec else {
                panic!("expected a blob");
            };
            assert_eq!(*key, b.id);
            assert!(b.id >= 1);
            assert_eq!((b.x, b.y), (320.0, 480.0));
            assert_eq!((b.vx, b.vy), (0.0, 0.0));
            assert_eq!(b.r, 30.0);
        }
    }

    #[test]
    fn test_scattered_ranges() {
        let mut generator = LevelGenerator::new(&settings(LevelLayout::Scattered, 200, 42), WIDTH, HEIGHT);
        let snap = generator.generate(10.0);
        assert_eq!(snap.objects.len(), 200);
        for rec in snap.objects.values() {
            let EntityRecord::Blob(b) = rec else {
                panic!("expected a blob");
            };
            assert!((0.0..WIDTH).contains(&b.x) && b.x.fract() == 0.0);
            assert!((0.0..HEIGHT).contains(&b.y) && b.y.fract() == 0.0);
            assert!((0.0..30.0).contains(&b.r) && b.r.fract() == 0.0);
            assert!((-1.0..3.0).contains(&b.vx));
            assert!((-1.0..3.0).contains(&b.vy));
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let s = settings(LevelLayout::Scattered, 8, 1234);
        let a = LevelGenerator::new(&s, WIDTH, HEIGHT).generate(0.0);
        let b = LevelGenerator::new(&s, WIDTH, HEIGHT).generate(0.0);
        assert_eq!(a, b);

        let c = LevelGenerator::new(&settings(LevelLayout::Scattered, 8, 4321), WIDTH, HEIGHT).generate(0.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ids_keep_counting_across_levels() {
        let mut generator = LevelGenerator::new(&settings(LevelLayout::Centered, 3, 0), WIDTH, HEIGHT);
        assert_eq!(generator.generate(0.0).max_id(), 3);
        let second = generator.generate(0.0);
        assert_eq!(second.objects.keys().copied().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn test_empty_level() {
        let mut generator = LevelGenerator::new(&settings(LevelLayout::Scattered, 0, 0), WIDTH, HEIGHT);
        let snap = generator.generate(0.0);
        assert!(snap.objects.is_empty());
        assert_eq!(snap.max_id(), 0);
    }
}
