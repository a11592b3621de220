//! Detection heuristics: best-effort classifiers over static evidence
//!
//! Every detector is a pure function with a strict precedence chain and
//! a safe default, so behavior stays deterministic and explainable.

pub mod compose;
pub mod package_manager;
pub mod ports;
pub mod scripts;
