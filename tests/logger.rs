use uboost::prelude::*;
use uboost::research::Logger;

use std::fs;


fn auc<S: StagedClassifier>(sample: &Sample, f: &S) -> f64 {
    let proba = f.predict_proba(sample).unwrap();
    let p1 = proba.iter().map(|p| p[1]).collect::<Vec<_>>();
    roc_auc_score(sample.target(), &p1).unwrap()
}


/// Tests for `Logger`.
#[cfg(test)]
pub mod logger_tests {
    use super::*;

    #[test]
    fn uboost_log() {
        let train = SampleGenerator::new(400).seed(1).generate().unwrap();
        let test = SampleGenerator::new(400).seed(2).generate().unwrap();

        let params = UBoostParams::new(["column0"])
            .n_neighbors(10)
            .n_estimators(5);
        let booster = UBoostBDT::init(&train, params).unwrap();
        let tree = DecisionTreeBuilder::new().max_depth(2).build();

        let path = std::env::temp_dir().join("uboost_logger_test_uboost.csv");
        let model = Logger::new(
                booster,
                tree,
                auc::<UBoostModel<DecisionTreeClassifier>>,
                &train,
                &test,
            )
            .print_every(1)
            .run(&path)
            .unwrap();
        assert_eq!(model.score_cuts().len(), 5);

        let log = fs::read_to_string(&path).unwrap();
        let lines = log.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Round,ScoreCut,Train,Test,Time");
        assert_eq!(lines.len(), 6);

        // The cut column holds the cut of each round.
        for (line, cut) in lines[1..].iter().zip(model.score_cuts()) {
            let cols = line.split(',').collect::<Vec<_>>();
            assert_eq!(cols.len(), 5);
            let result = cols[1].parse::<f64>().unwrap();
            assert_eq!(*cut, result, "expected {cut}, got {result}.");
        }
        fs::remove_file(&path).unwrap();
    }


    #[test]
    fn adaboost_log() {
        let train = SampleGenerator::new(300).seed(3).generate().unwrap();
        let test = SampleGenerator::new(300).seed(4).generate().unwrap();

        let booster = AdaBoost::init(&train).n_estimators(4);
        let tree = DecisionTreeBuilder::new().max_depth(2).build();

        let path = std::env::temp_dir().join("uboost_logger_test_adaboost.csv");
        let f = Logger::new(
                booster,
                tree,
                auc::<WeightedMajority<DecisionTreeClassifier>>,
                &train,
                &test,
            )
            .print_every(usize::MAX)
            .run(&path)
            .unwrap();
        assert_eq!(f.n_estimators(), 4);

        let log = fs::read_to_string(&path).unwrap();
        let lines = log.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        // AdaBoost has no cut.
        assert!(lines[1].starts_with("1,,"));
        fs::remove_file(&path).unwrap();
    }
}
