//! Integration test: preprocessing consistency end-to-end
//!
//! Covers the scenarios that matter for train/serve skew: fitted statistics
//! on partially-missing corpora, unseen categories at serving time, and
//! identical vectors through the training and serving paths.

use lifeboat::data::{RawRecord, Scalar};
use lifeboat::lookup::LookupStore;
use lifeboat::preprocessing::{PreprocessConfig, Preprocessor, ScalerKind};
use lifeboat::schema::Schema;
use lifeboat::training::Trainer;
use lifeboat::LifeboatError;

fn passenger(
    id: i64,
    pclass: i64,
    sex: &str,
    age: Option<f64>,
    fare: f64,
    embarked: Option<&str>,
    survived: Option<i64>,
) -> RawRecord {
    let mut r = RawRecord::new();
    r.insert("PassengerId", Scalar::Number(id as f64));
    r.insert("Pclass", Scalar::Number(pclass as f64));
    r.insert("Sex", Scalar::Text(sex.to_string()));
    if let Some(age) = age {
        r.insert("Age", Scalar::Number(age));
    }
    r.insert("SibSp", Scalar::Number(0.0));
    r.insert("Parch", Scalar::Number(0.0));
    r.insert("Fare", Scalar::Number(fare));
    if let Some(embarked) = embarked {
        r.insert("Embarked", Scalar::Text(embarked.to_string()));
    }
    if let Some(survived) = survived {
        r.insert("Survived", Scalar::Number(survived as f64));
    }
    r
}

fn varied_corpus(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            passenger(
                i as i64,
                1 + (i % 3) as i64,
                if i % 2 == 0 { "female" } else { "male" },
                Some(20.0 + i as f64),
                8.0 + 3.0 * i as f64,
                Some(["S", "C", "Q"][i % 3]),
                Some((i % 2 == 0) as i64),
            )
        })
        .collect()
}

#[test]
fn test_three_row_scenario_median_and_mode() {
    // One row missing Age and Embarked: imputed Age is the median of the
    // other two, imputed Embarked the mode of the two present values.
    let corpus = vec![
        passenger(1, 3, "male", Some(20.0), 7.25, Some("S"), Some(0)),
        passenger(2, 1, "female", Some(40.0), 71.28, Some("S"), Some(1)),
        passenger(3, 3, "female", None, 7.92, None, Some(1)),
    ];

    let mut pre = Preprocessor::with_config(
        Schema::titanic(),
        PreprocessConfig {
            scaler: ScalerKind::None,
        },
    );
    let matrix = pre.fit_transform(&corpus).unwrap();

    let age = pre.feature_index("Age").unwrap();
    assert_eq!(matrix[[2, age]], 30.0);

    let embarked_s = pre.feature_index("Embarked=S").unwrap();
    assert_eq!(matrix[[2, embarked_s]], 1.0);
}

#[test]
fn test_empty_corpus_produces_no_artifact() {
    let mut pre = Preprocessor::new(Schema::titanic());
    let result = pre.fit(&[]);
    assert!(matches!(result, Err(LifeboatError::EmptyCorpus)));
    assert!(!pre.is_fitted());
}

#[test]
fn test_unseen_category_keeps_width_and_stays_usable() {
    // Fit on a subset that never embarks at Q, then transform a Q record.
    let subset: Vec<RawRecord> = varied_corpus(12)
        .into_iter()
        .filter(|r| r.category("Embarked").as_deref() != Some("Q"))
        .collect();

    let mut pre = Preprocessor::new(Schema::titanic());
    pre.fit(&subset).unwrap();
    let width = pre.output_width();
    assert!(pre.feature_index("Embarked=Q").is_none());

    let q_passenger = passenger(99, 2, "male", Some(30.0), 12.0, Some("Q"), None);
    let matrix = pre.transform(std::slice::from_ref(&q_passenger)).unwrap();
    assert_eq!(matrix.ncols(), width);

    let s = pre.feature_index("Embarked=S").unwrap();
    let c = pre.feature_index("Embarked=C").unwrap();
    assert_eq!(matrix[[0, s]], 0.0);
    assert_eq!(matrix[[0, c]], 0.0);
}

#[test]
fn test_transform_is_pure() {
    let corpus = varied_corpus(10);
    let mut pre = Preprocessor::new(Schema::titanic());
    pre.fit(&corpus).unwrap();

    let once = pre.transform(&corpus).unwrap();
    let twice = pre.transform(&corpus).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_training_and_serving_paths_agree() {
    // A record reachable both from the training corpus and from the lookup
    // store must produce the identical feature vector through either path.
    let corpus = varied_corpus(20);
    let schema = Schema::titanic();

    let (artifact, _) = Trainer::default().run(&corpus, &schema).unwrap();
    let lookup = LookupStore::build(&corpus, &schema);

    for id in 0..20 {
        let corpus_row = &corpus[id];
        let via_training = artifact
            .preprocessor
            .transform(std::slice::from_ref(corpus_row))
            .unwrap();

        let resolved = lookup.resolve(&id.to_string()).unwrap();
        let via_serving = artifact
            .preprocessor
            .transform(std::slice::from_ref(resolved))
            .unwrap();

        assert_eq!(via_training, via_serving, "skew for passenger {id}");
    }
}

#[test]
fn test_unseen_category_still_yields_a_verdict() {
    // Train on passengers that never embarked at Q, serve one that did.
    let corpus = varied_corpus(20);
    let schema = Schema::titanic();
    let subset: Vec<RawRecord> = corpus
        .iter()
        .filter(|r| r.category("Embarked").as_deref() != Some("Q"))
        .cloned()
        .collect();

    let (artifact, _) = Trainer::default().run(&subset, &schema).unwrap();
    let lookup = LookupStore::build(&corpus, &schema);
    let engine = lifeboat::inference::InferenceEngine::new(artifact, lookup);

    // Passenger 2 embarked at Q (ids cycle S, C, Q).
    let verdict = engine.predict("2").unwrap();
    assert!((0.5..=1.0).contains(&verdict.confidence));
    assert_eq!(verdict.features.category("Embarked").as_deref(), Some("Q"));
}

#[test]
fn test_output_width_is_invariant_across_inputs() {
    let corpus = varied_corpus(15);
    let mut pre = Preprocessor::new(Schema::titanic());
    pre.fit(&corpus).unwrap();
    let width = pre.output_width();

    let inputs = vec![
        passenger(100, 2, "male", None, 5.0, None, None),
        passenger(101, 1, "unknown-sex", Some(1.0), 0.0, Some("X"), None),
        RawRecord::new(),
    ];
    for input in &inputs {
        let matrix = pre.transform(std::slice::from_ref(input)).unwrap();
        assert_eq!(matrix.ncols(), width);
    }
}
