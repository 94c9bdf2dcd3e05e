//! Session services.
//!
//! Each component owns its own state machine; [`AssuranceSession`] wires them
//! to one backend and one license gate.

pub mod artifact_retriever;
pub mod generation_manager;
pub mod history_browser;
pub mod license_gate;
pub mod result_presenter;
pub mod session;
pub mod test_runner;

pub use artifact_retriever::ArtifactRetriever;
pub use generation_manager::GenerationRequestManager;
pub use history_browser::HistoryBrowser;
pub use license_gate::LicenseGate;
pub use result_presenter::{Presentation, ResultPresenter, Section};
pub use session::AssuranceSession;
pub use test_runner::TestRunService;
