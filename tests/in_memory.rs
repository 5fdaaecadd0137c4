//! In-memory adapter integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `renewal_workflow_tests`: Workflow creation and completion chains
//! - `legacy_data_tests`: Template-keyed references and mixed spellings

mod in_memory {
    pub mod helpers;

    mod legacy_data_tests;
    mod renewal_workflow_tests;
}
