use anyhow::{Context, Result};

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

    /// Pick from `(value, weight)` pairs.
    fn weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for &(value, weight) in choices {
            if target < weight {
                return value;
            }
            target -= weight;
        }
        choices[choices.len() - 1].0
    }
}

const SEX: [(&str, f64); 2] = [("male", 0.69), ("female", 0.31)];
const JOB: [(&str, f64); 4] = [("0", 0.02), ("1", 0.20), ("2", 0.63), ("3", 0.15)];
const HOUSING: [(&str, f64); 3] = [("own", 0.71), ("rent", 0.18), ("free", 0.11)];
// Empty string is written as an empty cell, i.e. a missing level.
const SAVING: [(&str, f64); 5] = [
    ("little", 0.60),
    ("moderate", 0.10),
    ("quite rich", 0.06),
    ("rich", 0.05),
    ("", 0.19),
];
const CHECKING: [(&str, f64); 4] = [("little", 0.27), ("moderate", 0.27), ("rich", 0.06), ("", 0.40)];
const PURPOSE: [(&str, f64); 8] = [
    ("car", 0.34),
    ("radio/TV", 0.28),
    ("furniture/equipment", 0.18),
    ("business", 0.10),
    ("education", 0.06),
    ("repairs", 0.02),
    ("domestic appliances", 0.01),
    ("vacation/others", 0.01),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "german_credit_data.csv";
    let n_rows = 1000;

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "",
        "Age",
        "Sex",
        "Job",
        "Housing",
        "Saving accounts",
        "Checking account",
        "Credit amount",
        "Duration",
        "Purpose",
    ])?;

    for i in 0..n_rows {
        let age = rng.gauss(35.5, 11.4).round().clamp(19.0, 75.0) as i64;
        let duration = (rng.gauss(20.9, 12.0).round().clamp(4.0, 72.0) as i64 / 3 * 3).max(4);
        // Log-normal amounts, longer loans borrow more.
        let amount = (rng.gauss(7.8, 0.6).exp() * (1.0 + duration as f64 / 60.0))
            .round()
            .clamp(250.0, 18424.0) as i64;

        writer.write_record([
            i.to_string(),
            age.to_string(),
            rng.weighted(&SEX).to_string(),
            rng.weighted(&JOB).to_string(),
            rng.weighted(&HOUSING).to_string(),
            rng.weighted(&SAVING).to_string(),
            rng.weighted(&CHECKING).to_string(),
            amount.to_string(),
            duration.to_string(),
            rng.weighted(&PURPOSE).to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} credit applications to {output_path}");
    Ok(())
}
