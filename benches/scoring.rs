use agri_monitor::scoring::{classify_health, score_soil, soil_trends, SoilReading, SoilTrendPoint};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

struct Sample(SoilReading, f64);

impl SoilTrendPoint for Sample {
    fn ph_level(&self) -> f64 {
        self.0.ph_level
    }

    fn moisture(&self) -> f64 {
        self.0.moisture
    }

    fn nutrient_average(&self) -> f64 {
        self.0.nutrient_average()
    }

    fn health_score(&self) -> f64 {
        self.1
    }
}

fn readings(n: usize) -> Vec<SoilReading> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            SoilReading::new(5.0 + (t * 0.01) % 4.0, t % 100.0, 60.0 + t % 40.0, 50.0 + t % 45.0, 65.0 + t % 35.0)
        })
        .collect()
}

fn bench_score_soil(c: &mut Criterion) {
    let batch = readings(10_000);

    c.bench_function("scoring.score_soil.10k", |b| {
        b.iter(|| {
            batch
                .iter()
                .map(|r| score_soil(black_box(r)).health_score)
                .sum::<f64>()
        });
    });

    c.bench_function("scoring.classify_health.sweep", |b| {
        b.iter(|| (0..=1000).map(|i| classify_health(black_box(i as f64 / 10.0)) as u8 as u32).sum::<u32>());
    });
}

fn bench_soil_trends(c: &mut Criterion) {
    let series: Vec<Sample> = readings(1_000)
        .into_iter()
        .map(|r| {
            let score = score_soil(&r).health_score;
            Sample(r, score)
        })
        .collect();

    c.bench_function("scoring.soil_trends.1k", |b| {
        b.iter(|| soil_trends(black_box(&series)));
    });
}

criterion_group!(benches, bench_score_soil, bench_soil_trends);
criterion_main!(benches);
