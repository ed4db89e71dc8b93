//! Step definitions driving the deployment pipeline.
#![expect(
    clippy::shadow_reuse,
    reason = "rstest-bdd step macros rebind placeholders during expansion"
)]
#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd step macros require owned capture values"
)]

use anyhow::{Result, anyhow, ensure};
use mcp_stack::config::{ConfigDefaults, ConfigOverrides, ConfigResolver};
use mcp_stack::env::MapEnv;
use mcp_stack::{DeploymentUnit, StackApp};
use rstest_bdd_macros::{given, then, when};

use crate::fixtures::{RecordingSynthesizer, StackState};

fn update_overrides(state: &StackState, apply: impl FnOnce(&mut ConfigOverrides)) {
    let mut overrides = state.overrides.take().unwrap_or_default();
    apply(&mut overrides);
    state.overrides.set(overrides);
}

fn with_unit<T>(state: &StackState, read: impl FnOnce(&DeploymentUnit) -> T) -> Result<T> {
    state
        .synthesized
        .with_ref(|units| units.first().map(read))
        .flatten()
        .ok_or_else(|| anyhow!("the stack must be synthesized before it is inspected"))
}

#[given("an empty environment")]
fn empty_environment(#[from(stack_state)] state: &StackState) {
    state.env.set(MapEnv::new());
}

#[given("the environment contains {key:string} = {value:string}")]
fn environment_contains(
    #[from(stack_state)] state: &StackState,
    key: String,
    value: String,
) -> Result<()> {
    ensure!(!key.trim().is_empty(), "environment variable key must not be empty");
    let mut env = state.env.take().unwrap_or_default();
    env.set(key, value);
    state.env.set(env);
    Ok(())
}

#[given("the project prefix {prefix:string} is passed explicitly")]
fn explicit_prefix(#[from(stack_state)] state: &StackState, prefix: String) {
    update_overrides(state, |overrides| overrides.project_prefix = Some(prefix));
}

#[given("the region {region:string} is passed explicitly")]
fn explicit_region(#[from(stack_state)] state: &StackState, region: String) {
    update_overrides(state, |overrides| overrides.aws_region = Some(region));
}

#[given("no default project prefix is compiled in")]
fn no_default_prefix(#[from(stack_state)] state: &StackState) {
    state.without_default_prefix.set(true);
}

#[when("the stack is run")]
fn run_stack(#[from(stack_state)] state: &StackState) {
    let env = state.env.take().unwrap_or_default();
    let overrides = state.overrides.take().unwrap_or_default();
    let defaults = if state.without_default_prefix.take().unwrap_or(false) {
        ConfigDefaults::without_project_prefix()
    } else {
        ConfigDefaults::default()
    };

    let mut recorder = RecordingSynthesizer::default();
    let resolver = ConfigResolver::new(&env).with_defaults(defaults);
    let outcome = StackApp::new(resolver, &env, &mut recorder).run(&overrides);
    if let Err(err) = outcome {
        state.failure.set(err.to_string());
    }
    state.synthesized.set(recorder.units);
}

#[then("the stack id is {expected:string}")]
fn stack_id_is(#[from(stack_state)] state: &StackState, expected: String) -> Result<()> {
    let actual = with_unit(state, |unit| unit.id().to_owned())?;
    ensure!(actual == expected, "unexpected stack id {actual:?}");
    Ok(())
}

#[then("the target region is {expected:string}")]
fn region_is(#[from(stack_state)] state: &StackState, expected: String) -> Result<()> {
    let actual = with_unit(state, |unit| unit.env().region().to_owned())?;
    ensure!(actual == expected, "unexpected region {actual:?}");
    Ok(())
}

#[then("the target account is {expected:string}")]
fn account_is(#[from(stack_state)] state: &StackState, expected: String) -> Result<()> {
    let actual = with_unit(state, |unit| unit.env().account().map(str::to_owned))?;
    ensure!(
        actual.as_deref() == Some(expected.as_str()),
        "unexpected account {actual:?}"
    );
    Ok(())
}

#[then("the target account is absent")]
fn account_is_absent(#[from(stack_state)] state: &StackState) -> Result<()> {
    let actual = with_unit(state, |unit| unit.env().account().map(str::to_owned))?;
    ensure!(actual.is_none(), "expected no account, found {actual:?}");
    Ok(())
}

#[then("the stack tag {key:string} is {expected:string}")]
fn tag_is(
    #[from(stack_state)] state: &StackState,
    key: String,
    expected: String,
) -> Result<()> {
    let actual = with_unit(state, |unit| unit.tag(&key).map(str::to_owned))?;
    ensure!(
        actual.as_deref() == Some(expected.as_str()),
        "unexpected value {actual:?} for tag {key}"
    );
    Ok(())
}

#[then("the run fails naming {field:string}")]
fn run_fails_naming(#[from(stack_state)] state: &StackState, field: String) -> Result<()> {
    let message = state
        .failure
        .take()
        .ok_or_else(|| anyhow!("expected the run to fail"))?;
    ensure!(message.contains(&field), "error {message:?} does not name {field}");
    Ok(())
}

#[then("nothing was synthesized")]
fn nothing_synthesized(#[from(stack_state)] state: &StackState) -> Result<()> {
    let count = state
        .synthesized
        .with_ref(Vec::len)
        .ok_or_else(|| anyhow!("the stack must be run first"))?;
    ensure!(count == 0, "expected no synthesized stacks, found {count}");
    Ok(())
}
