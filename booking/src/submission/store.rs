//! Store for the submission flow.
//!
//! Owns the submission state behind a lock, runs the reducer, and
//! executes the effects it returns, awaiting futures and feeding any
//! produced actions back through the reducer until the queue drains.
//! The reducer runs under the write lock, so the in-flight guard in
//! `Submit` is race-free; effects execute outside the lock.

use crate::submission::actions::SubmissionAction;
use crate::submission::environment::SubmissionEnvironment;
use crate::submission::reducer::SubmissionReducer;
use crate::submission::types::SubmissionState;
use cabanamar_core::effect::Effect;
use cabanamar_core::reducer::Reducer;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Store driving the submission reducer.
pub struct SubmissionStore {
    state: RwLock<SubmissionState>,
    reducer: SubmissionReducer,
    env: SubmissionEnvironment,
}

impl SubmissionStore {
    /// Create a new store in the idle state.
    #[must_use]
    pub fn new(env: SubmissionEnvironment) -> Self {
        Self {
            state: RwLock::new(SubmissionState::new()),
            reducer: SubmissionReducer::new(),
            env,
        }
    }

    /// Dispatch an action and run every effect it (transitively)
    /// produces to completion.
    pub async fn dispatch(&self, action: SubmissionAction) {
        let mut actions = VecDeque::from([action]);
        while let Some(action) = actions.pop_front() {
            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.env)
            };
            self.run_effects(effects, &mut actions).await;
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SubmissionState {
        self.state.read().await.clone()
    }

    /// Executes an effect tree, pushing produced actions onto the
    /// dispatch queue. Parallel and sequential groups both run in
    /// order here; this flow has no concurrency inside one dispatch.
    async fn run_effects(
        &self,
        effects: impl IntoIterator<Item = Effect<SubmissionAction>>,
        actions: &mut VecDeque<SubmissionAction>,
    ) {
        let mut pending: VecDeque<Effect<SubmissionAction>> = effects.into_iter().collect();
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::None => {}
                Effect::Parallel(group) | Effect::Sequential(group) => {
                    for (i, e) in group.into_iter().enumerate() {
                        pending.insert(i, e);
                    }
                }
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    actions.push_back(*action);
                }
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        actions.push_back(action);
                    }
                }
            }
        }
    }
}
