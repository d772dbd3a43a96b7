use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rr_templates::fits::{write_fits, Card, ImageData, Pixels};

/// Write a synthetic SDSS-style stellar template file
#[derive(Parser, Debug)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output FITS file
    #[arg(short, long, default_value = "spEigenStar-sample.fits")]
    output: PathBuf,

    /// OBJECT value written to the header
    #[arg(long, default_value = "STAR")]
    object: String,
}

/// log10 wavelength of the first pixel and the step, as in SDSS eigenspectra.
const COEFF0: f64 = 3.5500;
const COEFF1: f64 = 1e-4;
const NPIX: usize = 2000;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Black-body-ish continuum with absorption lines, in arbitrary flux units.
fn generate_spectrum(
    wavelengths: &[f64],
    temperature: f64,
    lines: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wave| {
            let x = 1.4388e8 / (wave * temperature);
            let continuum = 1.0 / (wave.powi(5) * (x.exp() - 1.0)) * 1e18;
            let absorption: f64 = lines
                .iter()
                .map(|&(mu, sigma, depth)| gaussian(wave, mu, sigma, depth))
                .sum();
            continuum * (1.0 - absorption.min(0.95)) + rng.gauss(0.0, noise_level)
        })
        .collect()
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    let wavelengths: Vec<f64> = (0..NPIX)
        .map(|i| 10f64.powf(COEFF0 + i as f64 * COEFF1))
        .collect();

    // (label, effective temperature); a trailing "(n)" is an Indo-US id.
    let subtypes = [
        ("O", 35000.0),
        ("B6", 14000.0),
        ("A0", 9500.0),
        ("F5", 6500.0),
        ("G2 (127)", 5800.0),
        ("K1/K2", 5000.0),
        ("M2-III (1034)", 3500.0),
        ("CV", 12000.0),
    ];

    // Balmer, Ca H&K, Mg b, Na D
    let lines = [
        (3934.8, 3.0, 0.4),
        (3969.6, 3.0, 0.4),
        (4102.9, 4.0, 0.3),
        (4341.7, 4.0, 0.3),
        (4862.7, 5.0, 0.35),
        (5176.7, 3.0, 0.2),
        (5895.6, 2.5, 0.25),
        (6564.6, 6.0, 0.4),
    ];

    let mut values = Vec::with_capacity(NPIX * subtypes.len());
    let mut cards = vec![
        Card::new("OBJECT", args.object.as_str()).with_comment("Spectral class"),
        Card::new("COEFF0", COEFF0).with_comment("log10 wavelength of first pixel"),
        Card::new("COEFF1", COEFF1).with_comment("log10 wavelength step"),
    ];

    for (i, &(label, temperature)) in subtypes.iter().enumerate() {
        let spectrum = generate_spectrum(&wavelengths, temperature, &lines, 0.002, &mut rng);
        let peak = spectrum.iter().cloned().fold(f64::MIN, f64::max);
        values.extend(spectrum.iter().map(|v| (v / peak) as f32));
        cards.push(Card::new(&format!("NAME{i}"), label));
    }

    let data = ImageData::new(vec![subtypes.len(), NPIX], Pixels::F32(values))
        .context("building template array")?;
    write_fits(&args.output, &cards, &[], Some(&data))
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {} templates ({} pixels each) to {}",
        subtypes.len(),
        NPIX,
        args.output.display()
    );
    Ok(())
}
