//! The control-plane engine: Signal Tag Builder (C2), Pipeline Downgrader
//! (C3), Gate-In (C4), Monitored Execution Loop (C5), Mode Dispatchers (C6),
//! Gate-Out (C7), and the Orchestrator Entry (C8) that composes them.

pub mod cancellation;
pub mod config;
pub mod downgrade;
pub mod gate_in;
pub mod gate_out;
pub mod mode_dispatch;
pub mod monitored_loop;
pub mod orchestrator;
pub mod signal_tags;

pub use cancellation::CancellationToken;
pub use config::LoadThresholds;
pub use config::ObserverEngineConfig;
pub use config::PhaseTimeouts;
pub use downgrade::DowngradeError;
pub use gate_in::GateInCollaborators;
pub use gate_in::GateInError;
pub use gate_in::GateInOutcome;
pub use gate_in::GateInResult;
pub use gate_out::GateOutCollaborators;
pub use gate_out::GateOutPass;
pub use mode_dispatch::DispatchOutcome;
pub use mode_dispatch::ExecuteCollaborators;
pub use mode_dispatch::ExecuteResult;
pub use monitored_loop::LoopCollaborators;
pub use monitored_loop::LoopInputs;
pub use monitored_loop::LoopOutcome;
pub use orchestrator::Observer;
pub use orchestrator::ObserverCollaborators;
pub use orchestrator::ObserverError;
