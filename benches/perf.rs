use std::fmt::Write as _;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use match_result_terminal::classifier::{
    Classifier, ForestArtifact, RandomForest, TreeArtifact, TreeNode,
};
use match_result_terminal::feature_schema::FeatureSchema;
use match_result_terminal::predictor::predict_match;
use match_result_terminal::resolver::resolve_latest_stats;
use match_result_terminal::stats_table::StatsTable;

const TEAMS: [&str; 20] = [
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Ipswich",
    "Leicester",
    "Liverpool",
    "Man City",
    "Man United",
    "Newcastle",
    "Nott'm Forest",
    "Southampton",
    "Tottenham",
    "West Ham",
    "Wolves",
];

const FEATURES: [&str; 4] = ["home_xg_avg", "away_xg_avg", "home_pts_form", "away_pts_form"];

fn synthetic_season(rounds: usize, rng: &mut StdRng) -> String {
    let mut csv = String::from(
        "date,wk,day,day_id,time,time_id,home,away,match_result,\
         home_gls_srd,away_gls_srd,home_gls_cnd,away_gls_cnd,target_ttl_gls_srd,\
         home_xg_avg,away_xg_avg,home_pts_form,away_pts_form\n",
    );
    for wk in 0..rounds {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 8, 16)
            .unwrap()
            .checked_add_days(chrono::Days::new((wk * 7) as u64))
            .unwrap();
        for pair in 0..TEAMS.len() / 2 {
            let home = TEAMS[(pair + wk) % TEAMS.len()];
            let away = TEAMS[(pair + wk + TEAMS.len() / 2) % TEAMS.len()];
            let hg = rng.gen_range(0..5);
            let ag = rng.gen_range(0..5);
            let result = match hg.cmp(&ag) {
                std::cmp::Ordering::Greater => "Home Win",
                std::cmp::Ordering::Equal => "Draw",
                std::cmp::Ordering::Less => "Away Win",
            };
            writeln!(
                csv,
                "{date},{},Sat,6,15:00,15,\"{home}\",\"{away}\",{result},\
                 {hg},{ag},{ag},{hg},{},{:.2},{:.2},{},{}",
                wk + 1,
                hg + ag,
                rng.gen_range(0.4..2.8),
                rng.gen_range(0.4..2.8),
                rng.gen_range(0..16),
                rng.gen_range(0..16),
            )
            .unwrap();
        }
    }
    csv
}

/// Complete binary trees of depth 3 over the four features.
fn synthetic_forest(trees: usize, rng: &mut StdRng) -> RandomForest {
    let trees = (0..trees)
        .map(|_| {
            let mut nodes = Vec::with_capacity(15);
            for idx in 0..7 {
                let feature = rng.gen_range(0..FEATURES.len());
                let threshold = if feature < 2 {
                    rng.gen_range(0.5..2.5)
                } else {
                    rng.gen_range(2.0..14.0)
                };
                nodes.push(TreeNode::Split {
                    feature,
                    threshold,
                    left: 2 * idx + 1,
                    right: 2 * idx + 2,
                });
            }
            for _ in 0..8 {
                nodes.push(TreeNode::Leaf {
                    value: (0..3).map(|_| rng.gen_range(1.0..40.0)).collect(),
                });
            }
            TreeArtifact { nodes }
        })
        .collect();
    RandomForest::from_artifact(ForestArtifact {
        version: 1,
        generated_at: None,
        source: Some("bench".to_string()),
        classes: vec!["Away Win".into(), "Draw".into(), "Home Win".into()],
        feature_names: FEATURES.iter().map(|f| f.to_string()).collect(),
        trees,
    })
    .unwrap()
}

fn bench_table_parse(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let csv = synthetic_season(38, &mut rng);
    c.bench_function("stats_table_parse", |b| {
        b.iter(|| {
            let table = StatsTable::parse(black_box(&csv)).unwrap();
            black_box(table.len());
        })
    });
}

fn bench_resolve_latest(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let table = StatsTable::parse(&synthetic_season(38, &mut rng)).unwrap();
    c.bench_function("resolve_latest_stats", |b| {
        b.iter(|| {
            let record = resolve_latest_stats(&table, black_box("Arsenal"), black_box("Chelsea"));
            black_box(record.is_some());
        })
    });
}

fn bench_forest_predict(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(23);
    let forest = synthetic_forest(100, &mut rng);
    let x = [1.6, 1.1, 9.0, 7.0];
    c.bench_function("forest_predict_proba", |b| {
        b.iter(|| {
            let probs = forest.predict_proba(black_box(&x)).unwrap();
            black_box(probs[0]);
        })
    });
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(31);
    let table = StatsTable::parse(&synthetic_season(38, &mut rng)).unwrap();
    let forest = synthetic_forest(100, &mut rng);
    let schema = FeatureSchema::build(&table, &forest).unwrap();
    c.bench_function("resolve_and_predict", |b| {
        b.iter(|| {
            let record = resolve_latest_stats(&table, "Liverpool", "Man City").unwrap();
            let prediction = predict_match(black_box(&record), &forest, &schema).unwrap();
            black_box(prediction.probs.home_win);
        })
    });
}

criterion_group!(
    perf,
    bench_table_parse,
    bench_resolve_latest,
    bench_forest_predict,
    bench_end_to_end
);
criterion_main!(perf);
