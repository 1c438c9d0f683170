pub mod mhs;

pub use mhs::{ProbeReport, ProbeRunner, ProbeSelection, ReportRenderer};
