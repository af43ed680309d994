use std::path::PathBuf;

use anyhow::{Context, Result};

const ADJECTIVES: &[&str] = &[
    "Silent", "Crimson", "Last", "Hidden", "Broken", "Golden", "Distant", "Eternal", "Burning",
    "Forgotten", "Midnight", "Wild",
];
const NOUNS: &[&str] = &[
    "Harbor", "Empire", "Promise", "Frontier", "Garden", "Signal", "Witness", "Voyage", "Kingdom",
    "Shadow", "Bridge", "Orchard",
];
const AGE_RATINGS: &[(&str, f64)] = &[
    ("G", 0.08),
    ("PG", 0.22),
    ("PG-13", 0.35),
    ("R", 0.30),
    ("Not Rated", 0.05),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Pick a label according to its weight.
    fn weighted<'a>(&mut self, items: &'a [(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for (label, weight) in items {
            if target < *weight {
                return label;
            }
            target -= weight;
        }
        items[items.len() - 1].0
    }
}

fn main() -> Result<()> {
    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("moviesCleaned.csv"));
    let mut rng = SimpleRng::new(42);
    let n_movies = 250;

    let mut writer = csv::Writer::from_path(&out)
        .with_context(|| format!("creating {}", out.display()))?;
    writer.write_record([
        "Rank",
        "Title",
        "Release Year",
        "Fan Rating",
        "Age Rating",
        "Duration (min)",
        "Votes",
    ])?;

    for rank in 1..=n_movies {
        let title = format!("The {} {}", rng.pick(ADJECTIVES), rng.pick(NOUNS));
        let age = rng.weighted(AGE_RATINGS);

        // Older films skew slightly higher in a top list.
        let year = 1950 + (rng.next_f64() * 75.0) as i64;
        let base = 8.6 - (rank as f64 / n_movies as f64) * 0.9 - (year - 1950) as f64 * 0.002;
        let rating = (base + rng.gauss(0.0, 0.15)).clamp(1.0, 10.0);
        let duration = rng.gauss(128.0, 22.0).clamp(70.0, 240.0).round() as i64;
        let votes = (rng.gauss(600_000.0, 250_000.0).max(25_000.0)) as i64;

        // A few dirty cells survive cleaning and must load as missing.
        let year_cell = if rank % 37 == 0 {
            "N/A".to_string()
        } else {
            year.to_string()
        };
        let rating_cell = if rank % 53 == 0 {
            "unrated".to_string()
        } else {
            format!("{rating:.1}")
        };

        writer.write_record([
            rank.to_string(),
            title,
            year_cell,
            rating_cell,
            age.to_string(),
            duration.to_string(),
            votes.to_string(),
        ])?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {} movies to {}", n_movies, out.display());
    Ok(())
}
