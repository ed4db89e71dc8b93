//! Scenario state and collaborators shared by the deployment steps.

use mcp_stack::config::ConfigOverrides;
use mcp_stack::env::MapEnv;
use mcp_stack::{DeploymentUnit, SynthesisError, Synthesizer};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Synthesizer that keeps every unit it receives.
#[derive(Debug, Default)]
pub struct RecordingSynthesizer {
    pub units: Vec<DeploymentUnit>,
}

impl Synthesizer for RecordingSynthesizer {
    fn synthesize(&mut self, unit: DeploymentUnit) -> Result<(), SynthesisError> {
        self.units.push(unit);
        Ok(())
    }
}

/// Inputs and outcome of one scenario.
#[derive(Default, ScenarioState)]
pub struct StackState {
    pub env: Slot<MapEnv>,
    pub overrides: Slot<ConfigOverrides>,
    pub without_default_prefix: Slot<bool>,
    pub synthesized: Slot<Vec<DeploymentUnit>>,
    pub failure: Slot<String>,
}

/// Fresh state for every scenario.
#[fixture]
pub fn stack_state() -> StackState {
    StackState::default()
}
