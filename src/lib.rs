pub mod analyzer;
pub mod cli;
pub mod diagnostics;
pub mod fixes;
pub mod rules;
pub mod runner;
pub mod sarif;
pub mod scan;
pub mod template;
pub mod util;
