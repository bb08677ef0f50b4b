pub mod probes;
pub mod report;
pub mod scanner;

pub use scanner::run;
