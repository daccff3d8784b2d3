use uboost::prelude::*;


fn generate(n_sample: usize, seed: u64) -> Sample {
    SampleGenerator::new(n_sample)
        .n_features(10)
        .distance(0.6)
        .seed(seed)
        .generate()
        .unwrap()
}


/// Tests for `UBoostClassifier`.
#[cfg(test)]
pub mod uboost_classifier_tests {
    use super::*;

    #[test]
    fn probas() {
        let train = generate(1000, 1);
        let test = generate(1000, 2);
        let tree = DecisionTreeBuilder::new().max_depth(5).build();

        for algorithm in [Algorithm::Samme, Algorithm::SammeR] {
            for aggregation in [Aggregation::Vote, Aggregation::MeanProbability] {
                let params = UBoostParams::new(["column0"])
                    .n_neighbors(10)
                    .n_estimators(10)
                    .algorithm(algorithm);
                let mut booster = UBoostClassifier::init(&train, params)
                    .unwrap()
                    .efficiency_steps(3)
                    .aggregation(aggregation);
                let model = booster.run(&tree).unwrap();
                assert_eq!(model.ensembles().len(), 3);
                assert_eq!(model.efficiencies().len(), 3);

                let proba = model.predict_proba(&test).unwrap();
                let stages = model.staged_predict_proba(&test)
                    .unwrap()
                    .collect::<Vec<_>>();
                assert_eq!(stages.len(), 10);

                let last = stages.last().unwrap();
                for (p, q) in proba.iter().zip(last) {
                    assert!(
                        (p[1] - q[1]).abs() < 1e-3,
                        "{algorithm:?}, {aggregation:?}: expected {}, got {}.",
                        p[1], q[1],
                    );
                }

                let result = model.feature_importances().len();
                let expect = 10;
                assert_eq!(expect, result, "expected {expect}, got {result}.");
            }
        }
    }


    #[test]
    fn quality() {
        let test = generate(3000, 20);
        let train = generate(3000, 21);
        let tree = DecisionTreeBuilder::new()
            .min_samples_leaf(20)
            .max_depth(5)
            .build();

        for algorithm in [Algorithm::Samme, Algorithm::SammeR] {
            let params = UBoostParams::new(["column0"])
                .n_neighbors(10)
                .n_estimators(10)
                .algorithm(algorithm);
            let mut booster = UBoostClassifier::init(&train, params)
                .unwrap()
                .efficiency_steps(5);
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
    fn explicit_efficiencies() {
        let train = generate(400, 4);
        let tree = DecisionTreeBuilder::new().max_depth(3).build();
        let params = UBoostParams::new(["column0"])
            .n_neighbors(10)
            .n_estimators(4);
        let mut booster = UBoostClassifier::init(&train, params)
            .unwrap()
            .efficiencies(vec![0.2, 0.8]);
        let model = booster.run(&tree).unwrap();

        let result = model.ensembles()
            .iter()
            .map(|m| m.target_efficiency())
            .collect::<Vec<_>>();
        let expect = vec![0.2, 0.8];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
    }


    #[test]
    fn shape_mismatch() {
        let train = generate(300, 6);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();
        let params = UBoostParams::new(["column0"])
            .n_neighbors(10)
            .n_estimators(2);
        let mut booster = UBoostClassifier::init(&train, params)
            .unwrap()
            .efficiency_steps(2);
        let model = booster.run(&tree).unwrap();

        let other = SampleGenerator::new(300).n_features(11)
            .generate()
            .unwrap();
        let result = model.predict_proba(&other);
        assert!(matches!(result, Err(UBoostError::ShapeMismatch { .. })));
    }
}
