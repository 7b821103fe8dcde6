//! Monitored Execution Loop (C5) — the core algorithm.
//!
//! Drives the inner execution collaborator one cycle at a time, consulting
//! the cognitive-load monitor between cycles and acting on its
//! recommendation. See §4.5.

use std::collections::VecDeque;

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::core::ActionTag;
use crate::core::ActivationMap;
use crate::core::AgentStateSnapshot;
use crate::core::ComplexityLevel;
use crate::core::Decision;
use crate::core::LoadAction;
use crate::core::LoadFlags;
use crate::core::LoadRecommendation;
use crate::core::LoopResult;
use crate::core::ProcessingMode;
use crate::core::TerminationReason;
use crate::interfaces::AgentState;
use crate::interfaces::ArtifactsDelta;
use crate::interfaces::CognitiveLoadMonitor;
use crate::interfaces::ExecutableDag;
use crate::interfaces::MemoryHandle;
use crate::interfaces::OodaLoop;
use crate::runtime::cancellation::CancellationToken;
use crate::runtime::config::ObserverEngineConfig;
use crate::runtime::downgrade;

/// Collaborator handles the monitored loop needs.
pub struct LoopCollaborators<'a> {
    /// The inner execution loop's single-cycle primitive.
    pub ooda: &'a dyn OodaLoop,
    /// The cognitive-load monitor consulted after every cycle.
    pub monitor: &'a dyn CognitiveLoadMonitor,
}

/// Everything the monitored loop needs to start running.
pub struct LoopInputs {
    /// The objective the inner loop pursues this invocation.
    pub objective: String,
    /// The inner loop's initial agent state.
    pub initial_state: AgentState,
    /// Short-term memory handle passed to every `runCycle` call.
    pub memory: MemoryHandle,
    /// The activation map selected by Gate-In (may be downgraded mid-loop).
    pub activation_map: ActivationMap,
    /// The processing mode selected by Gate-In; governs the EMERGENCY override.
    pub mode: ProcessingMode,
}

/// Bounded deque that drops the oldest entry once `window` is exceeded.
fn push_bounded<T>(deque: &mut VecDeque<T>, window: usize, value: T) {
    deque.push_back(value);
    while deque.len() > window.max(1) {
        deque.pop_front();
    }
}

/// Full outcome of a completed (or terminated) monitored execution.
pub struct LoopOutcome {
    /// The synthesized summary handed to the mode dispatcher.
    pub loop_result: LoopResult,
    /// The activation map in effect at termination (possibly downgraded).
    pub final_activation_map: ActivationMap,
    /// Set if at least one SIMPLIFY downgrade occurred.
    pub was_simplified: bool,
    /// Set if the loop terminated via ESCALATE (directly, or a promoted SIMPLIFY/REPLAN).
    pub was_escalated: bool,
    /// Set if the loop terminated via ABORT (directly, cycle failure, or cancellation).
    pub was_aborted: bool,
    /// The last `recent_decisions_window` decisions, for diagnostics.
    pub recent_decisions: VecDeque<Decision>,
    /// The last `recent_decisions_window` emitted output snippets.
    pub recent_outputs: VecDeque<String>,
}

/// Resolves the cycle budget for this loop: the activation map's template
/// cap, clamped to `emergency_max_cycles` when `mode == Emergency`.
fn resolve_max_cycles(activation_map: &ActivationMap, mode: ProcessingMode, config: &ObserverEngineConfig) -> u32 {
    let template_cap = activation_map.template.max_cycles.max(1);
    if mode == ProcessingMode::Emergency {
        template_cap.min(config.emergency_max_cycles.max(1))
    } else {
        template_cap
    }
}

/// Runs the monitored execution loop to termination.
///
/// `active_dag` is fixed for the lifetime of the loop — FULL mode supplies
/// the synthesized DAG, FAST/STANDARD/EMERGENCY supply an empty one.
pub async fn run_monitored_loop(
    inputs: LoopInputs,
    active_dag: &ExecutableDag,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &LoopCollaborators<'_>,
) -> LoopOutcome {
    let LoopInputs {
        objective,
        mut initial_state,
        memory,
        mut activation_map,
        mode,
    } = inputs;

    let max_cycles = resolve_max_cycles(&activation_map, mode, config);
    let window = config.recent_decisions_window;

    let mut recent_decisions: VecDeque<Decision> = VecDeque::new();
    let mut recent_outputs: VecDeque<String> = VecDeque::new();
    let mut artifacts: Vec<String> = Vec::new();
    let mut total_tokens: u64 = 0;
    let mut consecutive_simplify: u32 = 0;
    let mut was_simplified = false;
    let mut was_escalated = false;
    let mut was_aborted = false;
    let mut final_state_snapshot = AgentStateSnapshot::default();
    let mut cycles_run: u32 = 0;

    let termination_reason = 'cycles: loop {
        let cycle_number = cycles_run + 1;

        if cancellation.is_cancelled() {
            warn!(cycle_number, "cancellation observed before cycle started; promoting to ABORT");
            was_aborted = true;
            break 'cycles TerminationReason::Aborted;
        }

        let cycle_result = collaborators
            .ooda
            .run_cycle(initial_state.clone(), &memory, active_dag, &objective)
            .await;

        let (updated_state, decision, telemetry, delta) = match cycle_result {
            Ok(tuple) => tuple,
            Err(failure) => {
                error!(cycle_number, %failure, "runCycle failed; treating as ABORT-equivalent termination");
                was_aborted = true;
                break 'cycles TerminationReason::Aborted;
            }
        };

        cycles_run = cycle_number;
        initial_state = updated_state.clone();
        final_state_snapshot = AgentStateSnapshot(updated_state.0);
        total_tokens += telemetry.tokens_consumed;

        push_bounded(&mut recent_decisions, window, decision.clone());
        for output in &delta.emitted {
            push_bounded(&mut recent_outputs, window, output.clone());
        }
        artifacts.extend(delta.emitted);

        if decision.action == ActionTag::Complete {
            info!(cycle_number, "inner loop reported COMPLETE");
            break 'cycles if was_simplified {
                TerminationReason::SimplifiedComplete
            } else {
                TerminationReason::Completed
            };
        }
        if decision.action == ActionTag::Park {
            info!(cycle_number, "inner loop reported PARK");
            break 'cycles TerminationReason::Parked;
        }
        if decision.action == ActionTag::Sleep {
            info!(cycle_number, "inner loop reported SLEEP");
            break 'cycles TerminationReason::Slept;
        }
        if mode == ProcessingMode::Emergency && decision.action == ActionTag::Replan {
            warn!(cycle_number, "REPLAN in EMERGENCY mode terminates the loop");
            was_escalated = true;
            break 'cycles TerminationReason::Escalated;
        }

        let recommendation = collaborators
            .monitor
            .monitor(&activation_map, &telemetry, recent_decisions.make_contiguous(), recent_outputs.make_contiguous(), &objective)
            .await;

        let recommendation = match recommendation {
            Ok(rec) => {
                consecutive_simplify = if rec.action == LoadAction::Simplify { consecutive_simplify } else { 0 };
                rec
            }
            Err(failure) => {
                warn!(cycle_number, %failure, "cognitive-load monitor failed; fail-open to CONTINUE");
                LoadRecommendation {
                    action: LoadAction::Continue,
                    reasoning: "monitor failure; fail-open".to_owned(),
                    flags: LoadFlags::default(),
                }
            }
        };

        match recommendation.action {
            LoadAction::Continue => {}
            LoadAction::Simplify => {
                if mode == ProcessingMode::Emergency {
                    warn!(cycle_number, "SIMPLIFY disabled in EMERGENCY mode; promoting to ABORT");
                    was_aborted = true;
                    break 'cycles TerminationReason::Aborted;
                }
                if consecutive_simplify >= config.simplify_max_steps {
                    warn!(cycle_number, consecutive_simplify, "simplify_max_steps exceeded; promoting to ESCALATE");
                    was_escalated = true;
                    break 'cycles TerminationReason::Escalated;
                }
                let already_trivial = activation_map.complexity == ComplexityLevel::Trivial;
                match downgrade::downgrade(&activation_map) {
                    Ok(downgraded) if already_trivial => {
                        warn!(cycle_number, "SIMPLIFY at TRIVIAL cannot downgrade further; promoting to ESCALATE");
                        activation_map = downgraded;
                        was_simplified = true;
                        was_escalated = true;
                        break 'cycles TerminationReason::Escalated;
                    }
                    Ok(downgraded) => {
                        info!(cycle_number, from = ?activation_map.complexity, to = ?downgraded.complexity, "SIMPLIFY downgraded activation map");
                        activation_map = downgraded;
                        was_simplified = true;
                        consecutive_simplify += 1;
                    }
                    Err(_critical_rejected) => {
                        warn!(cycle_number, "downgrader rejected a CRITICAL map; promoting SIMPLIFY to ESCALATE");
                        was_escalated = true;
                        break 'cycles TerminationReason::Escalated;
                    }
                }
            }
            LoadAction::Escalate => {
                warn!(cycle_number, reasoning = %recommendation.reasoning, "load monitor recommended ESCALATE");
                was_escalated = true;
                break 'cycles TerminationReason::Escalated;
            }
            LoadAction::Abort => {
                warn!(cycle_number, reasoning = %recommendation.reasoning, flags = ?recommendation.flags, "load monitor recommended ABORT");
                was_aborted = true;
                break 'cycles TerminationReason::Aborted;
            }
        }

        if cycle_number >= max_cycles {
            info!(cycle_number, max_cycles, "cycle budget exhausted");
            break 'cycles TerminationReason::BudgetExhausted;
        }
    };

    let loop_result = LoopResult {
        total_cycles: cycles_run,
        termination_reason,
        final_state: final_state_snapshot,
        total_tokens,
        artifacts,
    };

    LoopOutcome {
        loop_result,
        final_activation_map: activation_map,
        was_simplified,
        was_escalated,
        was_aborted,
        recent_decisions,
        recent_outputs,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use super::LoopCollaborators;
    use super::LoopInputs;
    use super::run_monitored_loop;
    use crate::core::ActionTag;
    use crate::core::ComplexityLevel;
    use crate::core::CycleTelemetry;
    use crate::core::Decision;
    use crate::core::LoadAction;
    use crate::core::LoadFlags;
    use crate::core::LoadRecommendation;
    use crate::core::ProcessingMode;
    use crate::core::TerminationReason;
    use crate::interfaces::AgentState;
    use crate::interfaces::ArtifactsDelta;
    use crate::interfaces::CognitiveLoadMonitor;
    use crate::interfaces::ExecutableDag;
    use crate::interfaces::ExecutionError;
    use crate::interfaces::MemoryHandle;
    use crate::interfaces::MonitorError;
    use crate::interfaces::OodaLoop;
    use crate::runtime::cancellation::CancellationToken;
    use crate::runtime::config::ObserverEngineConfig;
    use crate::runtime::downgrade::pipeline_template_for;
    use crate::core::ActivationMap;

    fn map_at(level: ComplexityLevel) -> ActivationMap {
        ActivationMap {
            name: "test".to_owned(),
            complexity: level,
            template: pipeline_template_for(level),
            pressure_downgraded: false,
        }
    }

    fn telemetry(cycle_number: u32) -> CycleTelemetry {
        CycleTelemetry {
            cycle_number,
            tokens_consumed: 10,
            duration_ms: 100,
            active_module_count: 1,
            total_cycles_budget: 10,
            total_tokens_budget: 1000,
        }
    }

    struct ScriptedOoda {
        actions: Mutex<Vec<ActionTag>>,
    }

    #[async_trait]
    impl OodaLoop for ScriptedOoda {
        async fn run_cycle(
            &self,
            state: AgentState,
            _memory: &MemoryHandle,
            _dag: &ExecutableDag,
            _objective: &str,
        ) -> Result<(AgentState, Decision, CycleTelemetry, ArtifactsDelta), ExecutionError> {
            let mut actions = self.actions.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            let action = actions.remove(0);
            let cycle_number = u32::try_from(10 - actions.len()).unwrap_or(0);
            Ok((
                state,
                Decision {
                    action,
                    reasoning: "scripted".to_owned(),
                    target_node_ids: vec![],
                    replan: None,
                },
                telemetry(cycle_number),
                ArtifactsDelta { emitted: vec![format!("out-{cycle_number}")] },
            ))
        }
    }

    struct AlwaysContinueMonitor;

    #[async_trait]
    impl CognitiveLoadMonitor for AlwaysContinueMonitor {
        async fn monitor(
            &self,
            _map: &ActivationMap,
            _telemetry: &CycleTelemetry,
            _decisions: &[Decision],
            _outputs: &[String],
            _objective: &str,
        ) -> Result<LoadRecommendation, MonitorError> {
            Ok(LoadRecommendation {
                action: LoadAction::Continue,
                reasoning: "nominal".to_owned(),
                flags: LoadFlags::default(),
            })
        }
    }

    #[tokio::test]
    async fn completes_on_cycle_one_without_consulting_monitor() {
        let ooda = ScriptedOoda {
            actions: Mutex::new(vec![ActionTag::Complete]),
        };
        let monitor = AlwaysContinueMonitor;
        let config = ObserverEngineConfig::default();
        let cancellation = CancellationToken::new();
        let collaborators = LoopCollaborators { ooda: &ooda, monitor: &monitor };
        let dag = ExecutableDag::empty();

        let outcome = run_monitored_loop(
            LoopInputs {
                objective: "respond".to_owned(),
                initial_state: AgentState::default(),
                memory: MemoryHandle::default(),
                activation_map: map_at(ComplexityLevel::Simple),
                mode: ProcessingMode::Fast,
            },
            &dag,
            &config,
            &cancellation,
            &collaborators,
        )
        .await;

        assert_eq!(outcome.loop_result.total_cycles, 1);
        assert_eq!(outcome.loop_result.termination_reason, TerminationReason::Completed);
        assert!(!outcome.was_simplified);
    }

    struct SimplifyThenContinueThenCompleteMonitor {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl CognitiveLoadMonitor for SimplifyThenContinueThenCompleteMonitor {
        async fn monitor(
            &self,
            _map: &ActivationMap,
            _telemetry: &CycleTelemetry,
            _decisions: &[Decision],
            _outputs: &[String],
            _objective: &str,
        ) -> Result<LoadRecommendation, MonitorError> {
            let mut calls = self.calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            *calls += 1;
            let action = if *calls == 1 { LoadAction::Simplify } else { LoadAction::Continue };
            Ok(LoadRecommendation {
                action,
                reasoning: "scripted".to_owned(),
                flags: LoadFlags::default(),
            })
        }
    }

    #[tokio::test]
    async fn simplify_then_complete_sets_simplified_complete() {
        let ooda = ScriptedOoda {
            actions: Mutex::new(vec![ActionTag::Continue, ActionTag::Continue, ActionTag::Complete]),
        };
        let monitor = SimplifyThenContinueThenCompleteMonitor { calls: Mutex::new(0) };
        let config = ObserverEngineConfig::default();
        let cancellation = CancellationToken::new();
        let collaborators = LoopCollaborators { ooda: &ooda, monitor: &monitor };
        let dag = ExecutableDag::empty();

        let outcome = run_monitored_loop(
            LoopInputs {
                objective: "do work".to_owned(),
                initial_state: AgentState::default(),
                memory: MemoryHandle::default(),
                activation_map: map_at(ComplexityLevel::Complex),
                mode: ProcessingMode::Full,
            },
            &dag,
            &config,
            &cancellation,
            &collaborators,
        )
        .await;

        assert!(outcome.was_simplified);
        assert_eq!(outcome.loop_result.termination_reason, TerminationReason::SimplifiedComplete);
        assert_eq!(outcome.final_activation_map.complexity, ComplexityLevel::Moderate);
    }

    struct AlwaysAbortMonitor;

    #[async_trait]
    impl CognitiveLoadMonitor for AlwaysAbortMonitor {
        async fn monitor(
            &self,
            _map: &ActivationMap,
            _telemetry: &CycleTelemetry,
            _decisions: &[Decision],
            _outputs: &[String],
            _objective: &str,
        ) -> Result<LoadRecommendation, MonitorError> {
            Ok(LoadRecommendation {
                action: LoadAction::Abort,
                reasoning: "oscillation detected".to_owned(),
                flags: LoadFlags {
                    oscillation_detected: true,
                    ..LoadFlags::default()
                },
            })
        }
    }

    #[tokio::test]
    async fn abort_preserves_partial_artifacts() {
        let ooda = ScriptedOoda {
            actions: Mutex::new(vec![ActionTag::Continue, ActionTag::Continue]),
        };
        let monitor = AlwaysAbortMonitor;
        let config = ObserverEngineConfig::default();
        let cancellation = CancellationToken::new();
        let collaborators = LoopCollaborators { ooda: &ooda, monitor: &monitor };
        let dag = ExecutableDag::empty();

        let outcome = run_monitored_loop(
            LoopInputs {
                objective: "do work".to_owned(),
                initial_state: AgentState::default(),
                memory: MemoryHandle::default(),
                activation_map: map_at(ComplexityLevel::Complex),
                mode: ProcessingMode::Full,
            },
            &dag,
            &config,
            &cancellation,
            &collaborators,
        )
        .await;

        assert!(outcome.was_aborted);
        assert_eq!(outcome.loop_result.termination_reason, TerminationReason::Aborted);
        assert_eq!(outcome.loop_result.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn emergency_mode_clamps_cycles_and_disables_simplify() {
        let ooda = ScriptedOoda {
            actions: Mutex::new(vec![ActionTag::Continue, ActionTag::Continue, ActionTag::Continue, ActionTag::Continue]),
        };
        struct AlwaysSimplifyMonitor;
        #[async_trait]
        impl CognitiveLoadMonitor for AlwaysSimplifyMonitor {
            async fn monitor(
                &self,
                _map: &ActivationMap,
                _telemetry: &CycleTelemetry,
                _decisions: &[Decision],
                _outputs: &[String],
                _objective: &str,
            ) -> Result<LoadRecommendation, MonitorError> {
                Ok(LoadRecommendation {
                    action: LoadAction::Simplify,
                    reasoning: "scripted".to_owned(),
                    flags: LoadFlags::default(),
                })
            }
        }
        let monitor = AlwaysSimplifyMonitor;
        let mut config = ObserverEngineConfig::default();
        config.emergency_max_cycles = 2;
        let cancellation = CancellationToken::new();
        let collaborators = LoopCollaborators { ooda: &ooda, monitor: &monitor };
        let dag = ExecutableDag::empty();

        let outcome = run_monitored_loop(
            LoopInputs {
                objective: "stabilize".to_owned(),
                initial_state: AgentState::default(),
                memory: MemoryHandle::default(),
                activation_map: map_at(ComplexityLevel::Critical),
                mode: ProcessingMode::Emergency,
            },
            &dag,
            &config,
            &cancellation,
            &collaborators,
        )
        .await;

        assert!(outcome.loop_result.total_cycles <= 2);
        assert!(outcome.was_aborted);
    }
}
