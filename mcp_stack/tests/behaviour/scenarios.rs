//! Binds the deployment feature file to rstest-bdd scenarios.

use crate::fixtures::{StackState, stack_state};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/deployment.feature",
    fixtures = [stack_state: StackState]
);
