//! Editorial domain types shared by the access and workflow crates
//!
//! This crate provides the canonical models for manuscript handling:
//! - Article: a submitted manuscript with its status and workflow notes
//! - Journal: the publication scope articles belong to
//! - ScreeningChecklist: the editorial pre-check filled in before peer review
//! - ReviewAssignment, Review: peer review invitations and their outcomes
//! - Wire shapes exchanged with the external article store

pub mod article;
pub mod ids;
pub mod journal;
pub mod note;
pub mod plagiarism;
pub mod review;
pub mod screening;
pub mod status;

pub use article::*;
pub use ids::*;
pub use journal::*;
pub use note::*;
pub use plagiarism::*;
pub use review::*;
pub use screening::*;
pub use status::*;
