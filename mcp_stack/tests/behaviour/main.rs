//! Behavioural tests for the deployment pipeline using `rstest-bdd`.
//!
//! [`fixtures`] holds the scenario state and a recording synthesizer,
//! [`steps`] drives the pipeline and [`scenarios`] binds the feature file.

mod fixtures;
mod scenarios;
mod steps;
