use colored::Colorize;

use crate::{
    Sample,
    Booster,
    WeakLearner,
};
use crate::error::{Result, UBoostError};

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Instant;
use std::ops::ControlFlow;

const DEFAULT_ROUND: usize = 100;
const WIDTH: usize = 8;
const PREC_WIDTH: usize = 5;
const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;
const HEADER: &str = "Round,ScoreCut,Train,Test,Time\n";


/// Implementing this trait allows you to use [`Logger`] to
/// log algorithm's behavor.
pub trait CurrentHypothesis {
    /// The hypothesis at the current state.
    type Output;

    /// Returns the combined hypothesis at current state.
    fn current_hypothesis(&self) -> Result<Self::Output>;

    /// Returns the score cut of the latest round, if any.
    fn current_score_cut(&self) -> Option<f64> {
        None
    }
}


/// Struct `Logger` provides a generic function that
/// logs the score cut, train/test metric, and running time
/// for each step of boosting.
///
/// ```no_run
/// use uboost::prelude::*;
/// use uboost::research::Logger;
///
/// let train = SampleGenerator::new(1000).seed(1).generate().unwrap();
/// let test = SampleGenerator::new(1000).seed(2).generate().unwrap();
///
/// let booster = UBoostBDT::init(&train, UBoostParams::new(["column0"]))
///     .unwrap();
/// let tree = DecisionTreeBuilder::new().max_depth(3).build();
///
/// let auc = |sample: &Sample, f: &UBoostModel<DecisionTreeClassifier>| {
///     let proba = f.predict_proba(sample).unwrap();
///     let p1 = proba.iter().map(|p| p[1]).collect::<Vec<_>>();
///     roc_auc_score(sample.target(), &p1).unwrap()
/// };
///
/// let model = Logger::new(booster, tree, auc, &train, &test)
///     .print_every(10)
///     .run("uboost.csv")
///     .unwrap();
/// ```
pub struct Logger<'a, B, W, G> {
    booster: B,
    weak_learner: W,
    metric: G,
    train: &'a Sample,
    test: &'a Sample,
    round: usize,
}


impl<'a, B, W, G> Logger<'a, B, W, G> {
    /// Create a new instance of `Logger`.
    pub fn new(
        booster: B,
        weak_learner: W,
        metric: G,
        train: &'a Sample,
        test: &'a Sample,
    ) -> Self
    {
        Self {
            booster,
            weak_learner,
            metric,
            train,
            test,
            round: DEFAULT_ROUND,
        }
    }


    /// Set the interval to print the current status.
    /// By default, the method `run` prints its status every `100` rounds.
    /// If you don't want to print the log,
    /// set `usize::MAX`.
    #[inline(always)]
    pub fn print_every(mut self, round: usize) -> Self {
        self.round = round;
        self
    }


    /// Returns the booster.
    pub fn booster(&self) -> &B {
        &self.booster
    }
}


impl<H, B, W, G, O, S> Logger<'_, B, W, G>
    where B: Booster<H, Output = O> + CurrentHypothesis<Output = S>,
          W: WeakLearner<Hypothesis = H>,
          G: Fn(&Sample, &S) -> f64,
{
    #[inline(always)]
    fn print_log_header(&self) {
        println!(
            "      {:>WIDTH$}\t\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}",
            "".bold().red(),
            "SCORE".bold().blue(),
            "TRAIN".bold().green(),
            "TEST".bold().yellow(),
            "ACC.".bold().cyan(),
        );
        println!(
            "      {:>WIDTH$}\t\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\n",
            "ROUND".bold().red(),
            "CUT".bold().blue(),
            "METRIC".bold().green(),
            "METRIC".bold().yellow(),
            "TIME".bold().cyan(),
        );
    }


    /// print current settings.
    #[inline(always)]
    fn print_stats(&self) {
        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "STATS".bold(), "",
        );
        println!(
            "\n{header}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
            "Booster".bold(),
            self.booster.name().bold().green(),
        );
        if let Some(info) = self.booster.info() {
            println!("{}", info_lines(info));
        }

        println!(
            "+ {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
            "Weak Learner".bold(),
            self.weak_learner.name().bold().green(),
        );
        if let Some(info) = self.weak_learner.info() {
            println!("{}", info_lines(info));
        }
        println!("{:=^FULL_WIDTH$}\n", "".bold());
    }


    /// Run the given boosting algorithm with logging.
    /// Note that this method is almost the same as `Booster::run`.
    /// This method measures running time per iteration.
    pub fn run<P: AsRef<Path>>(&mut self, filename: P) -> Result<O> {
        // Open file
        let mut file = File::create(filename)?;

        // Write header to the file
        file.write_all(HEADER.as_bytes())?;

        // ---------------------------------------------------------------------
        // Pre-processing
        self.booster.preprocess()?;
        let verbose = self.round != usize::MAX;
        if verbose {
            self.print_stats();
            self.print_log_header();
        }

        // Cumulative time
        let mut time_acc = 0;

        // ---------------------------------------------------------------------
        // Boosting step
        let flow = (1..).try_for_each(|iter| {
            // Start measuring time
            let now = Instant::now();

            let flow = match self.booster.boost(&self.weak_learner, iter) {
                Ok(flow) => flow,
                Err(e) => return ControlFlow::Break(Err(e)),
            };

            // Stop measuring and convert `Duration` to Milliseconds.
            let time = now.elapsed().as_millis();

            // Update the cumulative time
            time_acc += time;

            // The booster may stop before producing a new hypothesis.
            if matches!(flow, ControlFlow::Break(it) if it < iter) {
                return ControlFlow::Break(Ok(()));
            }

            let f = match self.booster.current_hypothesis() {
                Ok(f) => f,
                Err(e) => return ControlFlow::Break(Err(e)),
            };
            let cut = self.booster.current_score_cut()
                .map(|c| c.to_string())
                .unwrap_or_default();
            let train = (self.metric)(self.train, &f);
            let test = (self.metric)(self.test, &f);

            // Write the results to `file`.
            let line = format!("{iter},{cut},{train},{test},{time_acc}\n");
            if let Err(e) = file.write_all(line.as_bytes()) {
                return ControlFlow::Break(Err(UBoostError::from(e)));
            }

            let cut = self.booster.current_score_cut().unwrap_or(f64::NAN);
            if verbose && iter % self.round == 0 {
                println!(
                    "{} {}\t\t{}\t{}\t{}\t{}",
                    "[LOG]".bold().magenta(),
                    format!("{:>WIDTH$}", iter).red(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", cut).blue(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", train).green(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", test).yellow(),
                    time_format(time_acc).bold().cyan(),
                );
            }

            if flow.is_break() {
                if verbose {
                    println!(
                        "{} {}\t\t{}\t{}\t{}\t{}\n",
                        "[FIN]".bold().bright_green(),
                        format!("{:>WIDTH$}", iter).red(),
                        format!("{:>WIDTH$.PREC_WIDTH$}", cut).bold().blue(),
                        format!("{:>WIDTH$.PREC_WIDTH$}", train).bold().green(),
                        format!("{:>WIDTH$.PREC_WIDTH$}", test).bold().yellow(),
                        time_format(time_acc).bold().cyan(),
                    );
                }
                return ControlFlow::Break(Ok(()));
            }
            ControlFlow::Continue(())
        });

        if let ControlFlow::Break(Err(e)) = flow {
            return Err(e);
        }

        self.booster.postprocess()
    }
}


fn info_lines(info: Vec<(&str, String)>) -> String {
    info.into_iter()
        .map(|(key, val)| {
            format!(
                "    + {:<STAT_WIDTH$}\t{:>width$}",
                key,
                val.bold().yellow(),
                width = STAT_WIDTH - 8
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}


fn time_format(millisec: u128) -> String {
    if millisec < 1_000 {
        return format!("  0.{:0>3}s", millisec);
    }
    let sec = millisec / 1_000;
    let millisec = millisec % 1_000;
    if sec < 60 {
        return format!(" {:0>2}.{:0>3}s", sec, millisec);
    }
    let min = sec / 60;
    let sec = sec % 60;
    if min < 60 {
        return format!(" {:0>2}m {:0>2}s", min, sec);
    }
    let hours = min / 60;
    let min = min % 60;
    format!(" {:0>2}h {:0>2}m", hours, min)
}
