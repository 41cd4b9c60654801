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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// Log-normal draw; export values are heavily right-skewed.
    fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (mu + sigma * z).exp()
    }
}

const CITIES: &[&str] = &[
    "Águas Mornas - SC",
    "Alfenas - MG",
    "Franca - SP",
    "Campinas - SP",
    "Joinville - SC",
    "Uberlândia - MG",
    "Londrina - PR",
    "Salvador",
];

const BLOCKS: &[&str] = &[
    "European Union",
    "Europe",
    "Asia (excluding Middle East)",
    "North America",
    "South America",
];

/// (SH2 description, SH4 descriptions, log-scale FOB mean)
const PRODUCTS: &[(&str, &[&str], f64)] = &[
    ("Coffee, tea, mate and spices", &["Coffee, roasted or not", "Mate"], 11.0),
    ("Footwear", &["Footwear with leather uppers", "Other footwear"], 10.0),
    ("Nuclear reactors, boilers, machinery", &["Pumps for liquids", "Centrifuges"], 12.0),
    ("Meat and edible offal", &["Poultry meat", "Bovine meat, frozen"], 12.5),
    ("Wood and articles of wood", &["Sawn wood", "Plywood"], 9.5),
];

const YEARS: &[i64] = &[2019, 2020, 2021, 2022, 2023];
const ROWS: usize = 600;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_exports.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "Year",
        "Data",
        "City",
        "Economic Block",
        "SH2 Description",
        "SH4 Description",
        "US$ FOB",
        "Net Weight",
    ])?;

    for i in 0..ROWS {
        let year = *rng.pick(YEARS);
        let month = rng.below(12) + 1;
        let (sh2, sh4s, mu) = *rng.pick(PRODUCTS);
        let fob = rng.log_normal(mu, 1.2);
        // USD per kg varies by product; keep weights proportional with noise.
        let weight = fob / rng.log_normal(1.0, 0.6);

        let date = match i % 97 {
            13 => "not a date".to_string(),
            41 => String::new(),
            _ if i % 2 == 0 => format!("{year}-{month:02}-01"),
            _ => format!("{month:02}/01/{year}"),
        };
        let fob = if i % 53 == 7 { String::new() } else { format!("{fob:.2}") };
        let weight = if i % 61 == 11 { "0".to_string() } else { format!("{weight:.1}") };

        writer.write_record([
            year.to_string(),
            date,
            rng.pick(CITIES).to_string(),
            rng.pick(BLOCKS).to_string(),
            sh2.to_string(),
            rng.pick(sh4s).to_string(),
            fob,
            weight,
        ])?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} export records to {output_path}");
    Ok(())
}
