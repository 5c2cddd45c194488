use std::env;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, Criterion, Throughput};

use boxmatch_core::{AreaId, AreaStyle, AreaTree, Color, Rect, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("BOXMATCH_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupWeight {
    Light,
    Heavy,
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size_light: usize,
    pub sample_size_heavy: usize,
    pub measurement_light: Duration,
    pub measurement_heavy: Duration,
}

impl BenchConfig {
    /// Listing sizes (records per page) benchmarked in this tier.
    pub fn listing_sizes(&self) -> &'static [usize] {
        match self.tier {
            BenchTier::Quick => &[10, 40],
            BenchTier::Full => &[10, 40, 120],
        }
    }
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("BOXMATCH_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size_light, sample_size_heavy, measurement_light, measurement_heavy) = match tier {
        BenchTier::Quick => (20, 10, Duration::from_secs(3), Duration::from_secs(5)),
        BenchTier::Full => (30, 20, Duration::from_secs(5), Duration::from_secs(10)),
    };

    BenchConfig {
        tier,
        seed,
        sample_size_light,
        sample_size_heavy,
        measurement_light,
        measurement_heavy,
    }
}

pub fn configure_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, cfg: &BenchConfig, weight: GroupWeight) {
    match weight {
        GroupWeight::Light => {
            group.sample_size(cfg.sample_size_light);
            group.measurement_time(cfg.measurement_light);
        }
        GroupWeight::Heavy => {
            group.sample_size(cfg.sample_size_heavy);
            group.measurement_time(cfg.measurement_heavy);
        }
    }
}

/// Seeded layout noise for synthetic pages (xorshift).
pub struct Jitter(u64);

impl Jitter {
    pub fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    fn step(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Offset in `[0, max)` points.
    pub fn offset(&mut self, max: f64) -> f64 {
        (self.step() >> 11) as f64 / (1u64 << 53) as f64 * max
    }

    /// True with probability `num / den`.
    pub fn chance(&mut self, num: u64, den: u64) -> bool {
        self.step() % den < num
    }

    /// Count in `1..=max`.
    pub fn count(&mut self, max: usize) -> usize {
        1 + (self.step() % max as u64) as usize
    }
}

pub fn bench_criterion() -> Criterion {
    Criterion::default().configure_from_args()
}

pub fn records_throughput(records: usize) -> Throughput {
    Throughput::Elements(records as u64)
}

/// A two-column product listing: per record a bold title, a price below it,
/// an optional note after the title and one to three labels on the price
/// line. Positions jitter by a few points.
pub fn listing(seed: u64, records: usize) -> (AreaTree, Vec<AreaId>) {
    let mut jitter = Jitter::new(seed);
    let rows = records.div_ceil(2);
    let mut tree = AreaTree::new(1000.0, 60.0 + rows as f64 * 60.0);
    let root = tree.root();
    let title_style = AreaStyle::new(12.0, 1.0, 0.0, Color::BLACK);
    let plain = AreaStyle::new(10.0, 0.0, 0.0, Color::rgb(0x33, 0x33, 0x33));
    let label = AreaStyle::new(9.0, 0.0, 1.0, Color::rgb(0x99, 0x00, 0x00));
    let mut ids = Vec::new();

    let mut add = |tree: &mut AreaTree, parent: AreaId, rect: Rect, style: &AreaStyle, text: String, tag: &str| {
        let id = tree.add_area(parent, rect, style.clone(), text).expect("parent exists");
        tree.add_tag(id, Tag::from(tag), 1.0).expect("area exists");
        ids.push(id);
    };

    for i in 0..records {
        let col = (i % 2) as f64;
        let row = (i / 2) as f64;
        let x = 20.0 + col * 480.0 + jitter.offset(2.0);
        let y = 40.0 + row * 60.0 + jitter.offset(3.0);
        let cell = tree
            .add_area(root, Rect::new(x - 5.0, y - 5.0, x + 460.0, y + 45.0), AreaStyle::default(), "")
            .expect("root exists");
        add(&mut tree, cell, Rect::new(x, y, x + 200.0, y + 12.0), &title_style, format!("Item {i}"), "title");
        add(&mut tree, cell, Rect::new(x, y + 15.0, x + 60.0, y + 25.0), &plain, format!("{i}.99"), "price");
        if jitter.chance(2, 3) {
            add(&mut tree, cell, Rect::new(x + 210.0, y, x + 300.0, y + 12.0), &plain, "in stock".into(), "note");
        }
        let labels = jitter.count(3);
        for l in 0..labels {
            let lx = x + 80.0 + l as f64 * 50.0;
            add(&mut tree, cell, Rect::new(lx, y + 15.0, lx + 40.0, y + 25.0), &label, "new".into(), "label");
        }
    }
    (tree, ids)
}
