use uboost::prelude::*;


const UNIFORM: [&str; 1] = ["column0"];


fn generate(n_sample: usize, seed: u64) -> Sample {
    SampleGenerator::new(n_sample)
        .n_features(10)
        .distance(0.6)
        .seed(seed)
        .generate()
        .unwrap()
}


/// Tests for `UBoostBDT`.
#[cfg(test)]
pub mod uboost_tests {
    use super::*;

    #[test]
    fn cuts() {
        let train = generate(1000, 42);
        let tree = DecisionTreeBuilder::new()
            .min_samples_leaf(10)
            .max_depth(6)
            .build();

        let signal = train.indices_of(1.0);
        let signal_sample = train.select_rows(&signal).unwrap();

        for algorithm in [Algorithm::Samme, Algorithm::SammeR] {
            for eff in [0.1, 0.3, 0.5, 0.7, 0.9] {
                let params = UBoostParams::new(UNIFORM)
                    .target_efficiency(eff)
                    .n_neighbors(20)
                    .n_estimators(20)
                    .algorithm(algorithm);
                let mut booster = UBoostBDT::init(&train, params).unwrap();
                let model = booster.run(&tree).unwrap();

                let cuts = model.score_cuts();
                assert_eq!(cuts.len(), 20);
                assert_eq!(model.score_cut(), cuts[19]);

                let passed = (signal.len() as f64 * eff).round() as usize;
                let stages = model.staged_predict_score(&signal_sample)
                    .unwrap();
                for (round, (scores, cut)) in stages.zip(cuts).enumerate() {
                    let upper = scores.iter()
                        .filter(|&&s| s > cut - 1e-7)
                        .count();
                    let lower = scores.iter()
                        .filter(|&&s| s > cut + 1e-7)
                        .count();
                    assert!(
                        lower <= passed && passed <= upper,
                        "{algorithm:?}, efficiency {eff}, round {round}: \
                         expected {lower} <= {passed} <= {upper}."
                    );
                }
            }
        }
    }


    #[test]
    fn probas() {
        let train = generate(1000, 1);
        let test = generate(1000, 2);
        let tree = DecisionTreeBuilder::new().max_depth(5).build();

        for algorithm in [Algorithm::Samme, Algorithm::SammeR] {
            let params = UBoostParams::new(UNIFORM)
                .n_neighbors(10)
                .n_estimators(10)
                .algorithm(algorithm);
            let mut booster = UBoostBDT::init(&train, params).unwrap();
            let model = booster.run(&tree).unwrap();

            let proba = model.predict_proba(&test).unwrap();
            let staged = model.staged_predict_proba(&test)
                .unwrap()
                .last()
                .unwrap();
            assert_eq!(proba.len(), staged.len());
            for (p, q) in proba.iter().zip(&staged) {
                assert!((p[0] - q[0]).abs() < 1e-3);
                assert!((p[1] - q[1]).abs() < 1e-3);
            }

            let expect = model.predict_score(&test).unwrap();
            let result = model.staged_predict_score(&test)
                .unwrap()
                .last()
                .unwrap();
            assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");

            let result = model.feature_importances().len();
            let expect = test.shape().1;
            assert_eq!(expect, result, "expected {expect}, got {result}.");
        }
    }


    #[test]
    fn staged_iterators_restart() {
        let train = generate(500, 3);
        let tree = DecisionTreeBuilder::new().max_depth(3).build();
        let params = UBoostParams::new(UNIFORM)
            .n_neighbors(10)
            .n_estimators(6);
        let mut booster = UBoostBDT::init(&train, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let first = model.staged_predict_score(&train)
            .unwrap()
            .collect::<Vec<_>>();
        let second = model.staged_predict_score(&train)
            .unwrap()
            .collect::<Vec<_>>();
        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
    }


    #[test]
    fn quality() {
        let test = generate(3000, 10);
        let train = generate(3000, 11);
        let tree = DecisionTreeBuilder::new()
            .min_samples_leaf(20)
            .max_depth(5)
            .build();

        for algorithm in [Algorithm::Samme, Algorithm::SammeR] {
            let params = UBoostParams::new(UNIFORM)
                .n_neighbors(10)
                .n_estimators(10)
                .algorithm(algorithm);
            let mut booster = UBoostBDT::init(&train, params).unwrap();
            let model = booster.run(&tree).unwrap();

            let proba = model.predict_proba(&test).unwrap();
            let p1 = proba.iter().map(|p| p[1]).collect::<Vec<_>>();
            let auc = roc_auc_score(test.target(), &p1).unwrap();
            assert!(auc > 0.7, "{algorithm:?}: quality is awful, AUC = {auc}.");

            let predictions = model.predict(&test).unwrap();
            let accuracy = accuracy_score(test.target(), &predictions)
                .unwrap();
            println!("{algorithm:?}: Accuracy = {accuracy:.3}");
        }
    }


    #[test]
    fn end_to_end() {
        let sample = generate(1000, 42);
        let tree = DecisionTreeBuilder::new()
            .max_depth(6)
            .min_samples_leaf(10)
            .build();
        let params = UBoostParams::new(UNIFORM)
            .target_efficiency(0.5)
            .n_neighbors(20)
            .n_estimators(20)
            .algorithm(Algorithm::Samme);

        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let result = model.score_cuts().len();
        let expect = 20;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
        assert_eq!(model.n_estimators(), 20);
        assert_eq!(model.target_efficiency(), 0.5);
    }


    #[test]
    fn idempotent_prediction() {
        let sample = generate(600, 5);
        let tree = DecisionTreeBuilder::new().max_depth(4).build();
        let params = UBoostParams::new(UNIFORM)
            .n_neighbors(15)
            .n_estimators(8)
            .algorithm(Algorithm::SammeR);
        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let first = model.predict_score(&sample).unwrap();
        let second = model.predict_score(&sample).unwrap();
        assert_eq!(first, second);
    }


    #[test]
    fn invalid_configuration() {
        let sample = generate(100, 7);
        let cases = [
            UBoostParams::new(UNIFORM).n_neighbors(51),
            UBoostParams::new(UNIFORM).target_efficiency(0.0),
            UBoostParams::new(UNIFORM).target_efficiency(1.2),
            UBoostParams::new(["no_such_column"]).n_neighbors(5),
        ];
        for params in cases {
            let result = UBoostBDT::<DecisionTreeClassifier>::init(&sample, params);
            assert!(
                matches!(result, Err(UBoostError::InvalidConfiguration { .. })),
                "expected `InvalidConfiguration`."
            );
        }
    }


    #[test]
    fn shape_mismatch() {
        let sample = generate(300, 8);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();
        let params = UBoostParams::new(UNIFORM)
            .n_neighbors(10)
            .n_estimators(3);
        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let narrow = SampleGenerator::new(300).n_features(9)
            .generate()
            .unwrap();
        let result = model.predict_score(&narrow);
        assert!(matches!(result, Err(UBoostError::ShapeMismatch { .. })));
        let result = model.predict_proba(&narrow);
        assert!(matches!(result, Err(UBoostError::ShapeMismatch { .. })));
    }


    #[test]
    fn background_uniformity() {
        let sample = generate(800, 9);
        let tree = DecisionTreeBuilder::new().max_depth(3).build();
        let params = UBoostParams::new(UNIFORM)
            .uniform_label(UniformLabel::Background)
            .target_efficiency(0.3)
            .n_neighbors(20)
            .n_estimators(10);
        let mut booster = UBoostBDT::init(&sample, params).unwrap();
        let model = booster.run(&tree).unwrap();

        let background = sample.indices_of(0.0);
        let scores = model.predict_score(&sample).unwrap();
        let passed = (background.len() as f64 * 0.3).round() as usize;
        let upper = background.iter()
            .filter(|&&i| scores[i] < model.score_cut() + 1e-7)
            .count();
        let lower = background.iter()
            .filter(|&&i| scores[i] < model.score_cut() - 1e-7)
            .count();
        assert!(
            lower <= passed && passed <= upper,
            "expected {lower} <= {passed} <= {upper}."
        );
    }
}
