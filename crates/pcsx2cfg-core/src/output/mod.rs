//! Parsers for the plain-text output of external tools.
//!
//! The configurator never links against the tools it drives; it runs them as
//! subprocesses and matches lines in their standard output.  Keeping those
//! string rules here, away from the process plumbing, lets them be tested
//! against captured output samples.

pub mod svn;
